//! Build strategies for call-graph construction.
//!
//! A strategy decides which methods are externally entered (roots) and which edges a
//! method contributes (callsites). The graph builder is otherwise strategy-agnostic, so
//! the difference between a monomorphic-only graph and a sound over-approximation is
//! entirely contained here.

use rustc_hash::FxHashSet;

use crate::{
    analysis::{
        callgraph::site::{CallSite, InvokeLocator},
        overrides::{build_override_graph, non_true_virtuals, OverrideGraph},
        resolver::{resolve_method, ResolverCache, SearchKind},
    },
    metadata::{Method, MethodId, MethodRef, Scope},
};

/// The capability set a call-graph build strategy provides.
///
/// Strategies are consulted once per method during the construction worklist; they do not
/// observe the graph being built.
pub trait BuildStrategy {
    /// Returns the externally-entered methods the traversal starts from.
    fn roots(&self) -> Vec<MethodId>;

    /// Returns the out-edges contributed by one method.
    fn callsites(&self, caller: MethodId) -> Vec<CallSite>;
}

/// Iterates a method body's invoke instructions as `(locator, search kind, reference)`.
fn invokes_of(method: &Method) -> impl Iterator<Item = (InvokeLocator, SearchKind, &MethodRef)> {
    method
        .body()
        .into_iter()
        .flat_map(|body| body.instructions().enumerate())
        .filter_map(|(position, insn)| {
            let search = SearchKind::from_opcode(insn.opcode())?;
            let reference = insn.method_ref()?;
            Some((InvokeLocator::new(position), search, reference))
        })
}

/// Strategy recording only provably monomorphic call targets.
///
/// Roots are the methods outside code could enter dispatchably or directly: true-virtual
/// methods (any external caller may dispatch into them), methods marked as entry points,
/// and class static initializers. Callsites skip unresolved references and any resolved
/// target that is true-virtual, then record the single concrete target.
///
/// The result is a conservative graph in which every recorded edge is guaranteed to be
/// the unique runtime target of its invoke. True-virtual methods consequently appear only
/// as roots, never as callees.
pub struct SingleCalleeStrategy<'a> {
    scope: &'a Scope,
    non_virtual: FxHashSet<MethodId>,
    resolved_refs: ResolverCache,
}

impl<'a> SingleCalleeStrategy<'a> {
    /// Builds the strategy, deriving the non-true-virtual set from the override graph.
    #[must_use]
    pub fn new(scope: &'a Scope) -> Self {
        let override_graph = build_override_graph(scope);
        SingleCalleeStrategy {
            scope,
            non_virtual: non_true_virtuals(&override_graph, scope),
            resolved_refs: ResolverCache::new(),
        }
    }

    /// A declared-virtual method that is not provably monomorphic.
    fn is_definitely_virtual(&self, method: MethodId) -> bool {
        self.scope.method(method).is_virtual() && !self.non_virtual.contains(&method)
    }
}

impl BuildStrategy for SingleCalleeStrategy<'_> {
    fn roots(&self) -> Vec<MethodId> {
        self.scope
            .methods_with_code()
            .filter(|&(id, method)| {
                self.is_definitely_virtual(id) || method.rstate().is_root() || method.is_clinit()
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn callsites(&self, caller: MethodId) -> Vec<CallSite> {
        let method = self.scope.method(caller);
        let mut callsites = Vec::new();
        for (locator, search, reference) in invokes_of(method) {
            let Some(callee) = resolve_method(
                self.scope,
                reference,
                search,
                &self.resolved_refs,
                Some(caller),
            ) else {
                continue;
            };
            if self.is_definitely_virtual(callee) {
                continue;
            }
            if self.scope.method(callee).is_concrete() {
                callsites.push(CallSite::new(callee, locator));
            }
        }
        callsites
    }
}

/// Strategy recording every possible runtime dispatch target.
///
/// Roots are every entry-point method and class static initializer. For each invoke the
/// strategy records the nominal resolved target (when concrete) and, in addition, every
/// method that transitively overrides it, all labeled with the same invoke locator. The
/// resulting graph soundly over-approximates runtime call behavior.
pub struct CompleteCallGraphStrategy<'a> {
    scope: &'a Scope,
    method_override_graph: OverrideGraph,
    resolved_refs: ResolverCache,
}

impl<'a> CompleteCallGraphStrategy<'a> {
    /// Builds the strategy and its backing override graph.
    #[must_use]
    pub fn new(scope: &'a Scope) -> Self {
        CompleteCallGraphStrategy {
            scope,
            method_override_graph: build_override_graph(scope),
            resolved_refs: ResolverCache::new(),
        }
    }
}

impl BuildStrategy for CompleteCallGraphStrategy<'_> {
    fn roots(&self) -> Vec<MethodId> {
        self.scope
            .methods()
            .filter(|(_, method)| method.rstate().is_root() || method.is_clinit())
            .map(|(id, _)| id)
            .collect()
    }

    fn callsites(&self, caller: MethodId) -> Vec<CallSite> {
        let method = self.scope.method(caller);
        let mut callsites = Vec::new();
        for (locator, search, reference) in invokes_of(method) {
            let Some(callee) = resolve_method(
                self.scope,
                reference,
                search,
                &self.resolved_refs,
                Some(caller),
            ) else {
                continue;
            };
            if self.scope.method(callee).is_concrete() {
                callsites.push(CallSite::new(callee, locator));
            }
            for overriding in self.method_override_graph.overriding(callee) {
                callsites.push(CallSite::new(overriding, locator));
            }
        }
        callsites
    }
}
