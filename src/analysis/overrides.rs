//! Method-override graph construction.
//!
//! For every virtual method this module records which methods in subclasses directly
//! override it, and derives the set of methods that are provably *non-true-virtual*:
//! declared virtual, but admitting exactly one runtime target. Devirtualization and the
//! single-callee call-graph strategy both consume that set.
//!
//! A virtual method is **true-virtual** when runtime dispatch could reach more than one
//! target: it has at least one override within the scope, or its owner class can be
//! subclassed by code outside the scope, or the method itself is an external entry point
//! (outside callers may dispatch through any subclass they create).

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::metadata::{MethodId, Scope};

/// The method-override graph of a scope.
///
/// Maps each method to the methods that directly override it in immediate subclasses, and
/// each overriding method back to its nearest overridden ancestor. Immutable once built;
/// both lookups are O(1) per key.
#[derive(Debug, Default)]
pub struct OverrideGraph {
    children: FxHashMap<MethodId, Vec<MethodId>>,
    parents: FxHashMap<MethodId, MethodId>,
}

impl OverrideGraph {
    /// Returns the methods that directly override `method` in immediate subclasses.
    #[must_use]
    pub fn children(&self, method: MethodId) -> &[MethodId] {
        self.children.get(&method).map_or(&[], Vec::as_slice)
    }

    /// Returns the nearest ancestor method that `method` overrides, if any.
    ///
    /// `None` means `method` is the root of its override chain, either genuinely or
    /// because its superclass hierarchy dangles out of the scope.
    #[must_use]
    pub fn parent(&self, method: MethodId) -> Option<MethodId> {
        self.parents.get(&method).copied()
    }

    /// Returns `true` if any method in the scope overrides `method`.
    #[must_use]
    pub fn is_overridden(&self, method: MethodId) -> bool {
        !self.children(method).is_empty()
    }

    /// Returns every method that transitively overrides `method`.
    ///
    /// The result never contains `method` itself. Order is unspecified.
    #[must_use]
    pub fn overriding(&self, method: MethodId) -> Vec<MethodId> {
        let mut result = Vec::new();
        let mut worklist: Vec<MethodId> = self.children(method).to_vec();
        let mut seen: FxHashSet<MethodId> = worklist.iter().copied().collect();

        while let Some(current) = worklist.pop() {
            result.push(current);
            for &child in self.children(current) {
                if seen.insert(child) {
                    worklist.push(child);
                }
            }
        }
        result
    }
}

/// Builds the override graph in a single pass over the class hierarchy.
///
/// For each virtual method, the nearest ancestor class declaring a virtual method with the
/// same name and proto receives the override edge. Dangling superclass references simply
/// terminate the search: the method becomes its own chain root.
///
/// Deterministic given the scope's class order.
#[must_use]
pub fn build_override_graph(scope: &Scope) -> OverrideGraph {
    let mut graph = OverrideGraph::default();

    for (_, class) in scope.classes() {
        for &method_id in class.virtual_methods() {
            let method = scope.method(method_id);

            let mut ancestor_ty = class.super_class().cloned();
            while let Some(ty) = ancestor_ty {
                let Some(ancestor_id) = scope.class_of_type(&ty) else {
                    // Superclass not in scope; treat the method as a chain root.
                    break;
                };
                if let Some(parent) =
                    scope.find_virtual_method(ancestor_id, method.name(), method.proto())
                {
                    graph.children.entry(parent).or_default().push(method_id);
                    graph.parents.insert(method_id, parent);
                    break;
                }
                ancestor_ty = scope.class(ancestor_id).super_class().cloned();
            }
        }
    }

    debug!(
        "override graph: {} overridden methods, {} overriding methods",
        graph.children.len(),
        graph.parents.len()
    );
    graph
}

/// Returns the declared-virtual methods that admit exactly one runtime target.
///
/// These are the devirtualization candidates: virtual in declaration, but with no override
/// in scope, an owner class that unseen code cannot subclass, and no external entry-point
/// marking.
#[must_use]
pub fn non_true_virtuals(graph: &OverrideGraph, scope: &Scope) -> FxHashSet<MethodId> {
    let mut result = FxHashSet::default();

    for (method_id, method) in scope.methods() {
        if !method.is_virtual() {
            continue;
        }
        let externally_subclassable = scope
            .class_of_type(method.owner())
            .is_some_and(|c| scope.class(c).is_externally_subclassable());
        let true_virtual = graph.is_overridden(method_id)
            || externally_subclassable
            || method.rstate().is_root();
        if !true_virtual {
            result.insert(method_id);
        }
    }
    result
}
