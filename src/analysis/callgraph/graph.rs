//! Call-graph representation and construction.
//!
//! The graph is stored in the generic [`DirectedGraph`] substrate: nodes and edges owned
//! by index vectors, adjacency in both directions. Node payloads distinguish the two
//! ghost singletons from method nodes; edge payloads carry the invoke locator (absent on
//! ghost edges). Releasing the graph is a single deallocation because all
//! cross-references are indices.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    analysis::callgraph::{
        site::InvokeLocator,
        strategy::{BuildStrategy, CompleteCallGraphStrategy, SingleCalleeStrategy},
    },
    metadata::{MethodId, Scope},
    utils::graph::{
        DirectedGraph, EdgeId, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
    },
};

/// Node payload of the call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallNode {
    /// The distinguished source all roots hang off.
    GhostEntry,
    /// The distinguished sink all leaves flow into.
    GhostExit,
    /// A reachable method.
    Method(MethodId),
}

impl CallNode {
    /// Returns `true` for the two ghost singletons.
    #[must_use]
    pub const fn is_ghost(self) -> bool {
        matches!(self, CallNode::GhostEntry | CallNode::GhostExit)
    }

    /// Returns the method this node represents, or `None` for ghosts.
    #[must_use]
    pub const fn method(self) -> Option<MethodId> {
        match self {
            CallNode::Method(method) => Some(method),
            _ => None,
        }
    }
}

/// The whole-program call graph.
///
/// One node per reachable method plus the ghost entry and exit singletons. Edges are
/// directed caller→callee and labeled with the invoke locator that produced them; edges
/// incident to a ghost node carry no locator. Parallel edges between the same method pair
/// are expected - one per invoke site.
///
/// # Invariants
///
/// - Every non-ghost node is reachable from [`entry`](Self::entry).
/// - Every method with no callsites under the strategy has an edge to
///   [`exit`](Self::exit).
/// - No edge connects the two ghost nodes, and no `(caller, callee, locator)` triple
///   appears twice. Both are construction-time programmer errors and fail fast.
///
/// # Determinism
///
/// The node and edge *sets* are a function of the strategy and the scope. The order in
/// which `successors`/`predecessors` yield neighbors is an artifact of worklist order and
/// is not part of the contract.
///
/// # Example
///
/// ```rust,ignore
/// use dexscope::analysis::build_single_callee_graph;
/// use dexscope::utils::graph::algorithms::compute_dominators;
///
/// let graph = build_single_callee_graph(&scope);
/// // The graph is rooted at the ghost entry, so dominators run on it directly.
/// let doms = compute_dominators(&graph);
/// assert_eq!(doms.idom(graph.entry()), Some(graph.entry()));
/// ```
#[derive(Debug)]
pub struct CallGraph {
    graph: DirectedGraph<CallNode, Option<InvokeLocator>>,
    method_to_node: FxHashMap<MethodId, NodeId>,
    entry: NodeId,
    exit: NodeId,
}

/// Builds the call graph that records only provably monomorphic targets.
#[must_use]
pub fn build_single_callee_graph(scope: &Scope) -> CallGraph {
    CallGraph::build(&SingleCalleeStrategy::new(scope))
}

/// Builds the call graph that records every possible runtime dispatch target.
#[must_use]
pub fn build_complete_call_graph(scope: &Scope) -> CallGraph {
    CallGraph::build(&CompleteCallGraphStrategy::new(scope))
}

impl CallGraph {
    /// Builds a call graph under the given strategy.
    ///
    /// Construction follows a fixed protocol: allocate the ghost nodes, connect the ghost
    /// entry to every root, then drain a worklist seeded with the roots - each popped
    /// method contributes its callsites as edges and pushes its callees. Methods without
    /// callsites are connected to the ghost exit. The worklist is explicit so deep call
    /// chains cannot overflow the stack.
    ///
    /// # Panics
    ///
    /// Panics if a strategy produces a duplicate `(caller, callee, locator)` triple; that
    /// indicates a bug in the strategy, not bad input.
    #[must_use]
    pub fn build<S: BuildStrategy>(strategy: &S) -> Self {
        let mut graph = DirectedGraph::new();
        let entry = graph.add_node(CallNode::GhostEntry);
        let exit = graph.add_node(CallNode::GhostExit);
        let mut call_graph = CallGraph {
            graph,
            method_to_node: FxHashMap::default(),
            entry,
            exit,
        };

        let mut recorded: FxHashSet<(NodeId, NodeId, Option<InvokeLocator>)> =
            FxHashSet::default();

        let roots = strategy.roots();
        for &root in &roots {
            let root_node = call_graph.ensure_node(root);
            call_graph.add_edge_checked(entry, root_node, None, &mut recorded);
        }

        let mut visited: FxHashSet<MethodId> = FxHashSet::default();
        let mut worklist: Vec<MethodId> = roots;
        while let Some(caller) = worklist.pop() {
            if !visited.insert(caller) {
                continue;
            }
            let caller_node = call_graph.ensure_node(caller);
            let callsites = strategy.callsites(caller);
            if callsites.is_empty() {
                call_graph.add_edge_checked(caller_node, call_graph.exit, None, &mut recorded);
                continue;
            }
            for site in callsites {
                let callee_node = call_graph.ensure_node(site.callee);
                call_graph.add_edge_checked(
                    caller_node,
                    callee_node,
                    Some(site.locator),
                    &mut recorded,
                );
                worklist.push(site.callee);
            }
        }

        debug!(
            "call graph: {} nodes, {} edges, {} roots",
            call_graph.node_count(),
            call_graph.edge_count(),
            call_graph.successors(call_graph.entry).count()
        );
        call_graph
    }

    /// Returns the node for a method, creating it on first sight.
    fn ensure_node(&mut self, method: MethodId) -> NodeId {
        if let Some(&node) = self.method_to_node.get(&method) {
            return node;
        }
        let node = self.graph.add_node(CallNode::Method(method));
        self.method_to_node.insert(method, node);
        node
    }

    /// Adds an edge, enforcing the structural invariants.
    fn add_edge_checked(
        &mut self,
        caller: NodeId,
        callee: NodeId,
        locator: Option<InvokeLocator>,
        recorded: &mut FxHashSet<(NodeId, NodeId, Option<InvokeLocator>)>,
    ) {
        let caller_ghost = self.graph.node(caller).is_some_and(|n| n.is_ghost());
        let callee_ghost = self.graph.node(callee).is_some_and(|n| n.is_ghost());
        assert!(
            !(caller_ghost && callee_ghost),
            "ghost nodes must never be connected to each other"
        );
        assert!(
            recorded.insert((caller, callee, locator)),
            "duplicate call edge {caller} -> {callee} at {locator:?}"
        );
        // Endpoints were produced by this graph, so the insertion cannot fail.
        let _ = self.graph.add_edge(caller, callee, locator);
    }

    /// Returns the ghost entry node.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the ghost exit node.
    #[must_use]
    pub fn exit(&self) -> NodeId {
        self.exit
    }

    /// Returns an iterator over all nodes, ghosts included.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    /// Returns the number of nodes, ghosts included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, ghost edges included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the method a node represents, or `None` for the ghosts (and for
    /// identifiers that are not nodes of this graph).
    #[must_use]
    pub fn method_of(&self, node: NodeId) -> Option<MethodId> {
        self.graph.node(node).copied().and_then(CallNode::method)
    }

    /// Returns the node payload.
    #[must_use]
    pub fn call_node(&self, node: NodeId) -> Option<CallNode> {
        self.graph.node(node).copied()
    }

    /// Returns the node representing a method, if the method is in the graph.
    #[must_use]
    pub fn node_of(&self, method: MethodId) -> Option<NodeId> {
        self.method_to_node.get(&method).copied()
    }

    /// Returns an iterator over a node's successor nodes.
    ///
    /// Parallel edges yield their target once per edge.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Successors::successors(&self.graph, node)
    }

    /// Returns an iterator over a node's predecessor nodes.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Predecessors::predecessors(&self.graph, node)
    }

    /// Returns an iterator over the identifiers of a node's outgoing edges.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.outgoing_edges(node)
    }

    /// Returns an iterator over the identifiers of a node's incoming edges.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.incoming_edges(node)
    }

    /// Returns the invoke locator recorded on an edge.
    ///
    /// `None` for ghost edges and for identifiers that are not edges of this graph.
    #[must_use]
    pub fn invoke_locator(&self, edge: EdgeId) -> Option<InvokeLocator> {
        self.graph.edge(edge).copied().flatten()
    }

    /// Returns the `(caller, callee)` endpoints of an edge.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.graph.edge_endpoints(edge)
    }

    /// Returns the distinct methods a method calls, ghosts excluded.
    #[must_use]
    pub fn callees(&self, method: MethodId) -> Vec<MethodId> {
        let Some(node) = self.node_of(method) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        self.successors(node)
            .filter_map(|n| self.method_of(n))
            .filter(|&m| seen.insert(m))
            .collect()
    }

    /// Returns the distinct methods that call a method, ghosts excluded.
    #[must_use]
    pub fn callers(&self, method: MethodId) -> Vec<MethodId> {
        let Some(node) = self.node_of(method) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        self.predecessors(node)
            .filter_map(|n| self.method_of(n))
            .filter(|&m| seen.insert(m))
            .collect()
    }

    /// Returns aggregate statistics about the graph.
    #[must_use]
    pub fn stats(&self) -> CallGraphStats {
        CallGraphStats {
            method_count: self.node_count() - 2,
            edge_count: self.edge_count(),
            root_count: self.successors(self.entry).count(),
            leaf_count: self.predecessors(self.exit).count(),
        }
    }
}

impl GraphBase for CallGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl Successors for CallGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        Successors::successors(&self.graph, node)
    }
}

impl Predecessors for CallGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        Predecessors::predecessors(&self.graph, node)
    }
}

impl RootedGraph for CallGraph {
    fn entry(&self) -> NodeId {
        self.entry
    }
}

/// Aggregate metrics of a call graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallGraphStats {
    /// Number of method nodes (ghosts excluded).
    pub method_count: usize,
    /// Number of edges, ghost edges included.
    pub edge_count: usize,
    /// Number of roots (successors of the ghost entry).
    pub root_count: usize,
    /// Number of leaves (predecessors of the ghost exit).
    pub leaf_count: usize,
}
