//! Trait definitions for graph abstractions.
//!
//! This module defines the capability traits that graph algorithms are written against.
//! Algorithms require only the capabilities they use, so they can run on
//! [`DirectedGraph`](crate::utils::graph::DirectedGraph), on the call graph, or on any
//! client-supplied graph shape (a control-flow graph, for instance) without modification.
//!
//! # Architecture
//!
//! The trait hierarchy is minimal and composable:
//!
//! - [`GraphBase`] - Node count and node iteration
//! - [`Successors`] - Forward edge traversal
//! - [`Predecessors`] - Backward edge traversal
//! - [`RootedGraph`] - Graphs with a designated entry node (required by the dominator engine)
//!
//! All adjacency queries return iterators rather than collections, so simple traversals do
//! not allocate.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::utils::graph::{DirectedGraph, GraphBase};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// graph.add_node("A");
/// graph.add_node("B");
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.node_ids().count(), 2);
/// ```
pub trait GraphBase {
    /// Returns the number of nodes in the graph, connected or not.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in the graph.
    ///
    /// The iteration order is typically the order in which nodes were added (ascending
    /// `NodeId` index), but algorithms must not rely on it.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `v` is a successor of `u`. If parallel edges
    /// exist, the same successor may be yielded more than once.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// For a directed edge `(u, v)`, node `u` is a predecessor of `v`. If parallel edges
    /// exist, the same predecessor may be yielded more than once.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry (root) node.
///
/// This is the capability set the dominator engine requires: an entry point plus traversal
/// in both directions. Typical implementors are control-flow graphs (entry is the first
/// basic block) and call graphs (entry is the ghost entry node).
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry node of the graph.
    ///
    /// Every node relevant to rooted-graph algorithms is expected to be reachable from this
    /// node; unreachable nodes are tolerated but excluded from results.
    fn entry(&self) -> NodeId;
}
