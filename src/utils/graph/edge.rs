//! Edge identifier implementation for directed graphs.
//!
//! This module provides the [`EdgeId`] type, a strongly-typed identifier for edges within a
//! directed graph, mirroring [`NodeId`](crate::utils::graph::NodeId) for the edge index space.

use std::fmt;

/// A strongly-typed identifier for edges within a directed graph.
///
/// `EdgeId` wraps a `usize` index. Edge IDs are assigned sequentially starting from 0 as
/// edges are added to a graph. Because parallel edges between the same pair of nodes are
/// permitted, the edge ID (not the endpoint pair) is the canonical identity of an edge.
///
/// # Usage
///
/// Edge IDs are created by [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge)
/// and are used to:
///
/// - Look up edge data and endpoints
/// - Store analysis results indexed by edge
///
/// # Thread Safety
///
/// `EdgeId` is [`Copy`], [`Send`], and [`Sync`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new `EdgeId` from a raw index value.
    ///
    /// Primarily intended for tests; normal usage obtains IDs from
    /// [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge).
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw 0-based index of this edge identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    fn from(index: usize) -> Self {
        EdgeId(index)
    }
}

impl From<EdgeId> for usize {
    #[inline]
    fn from(edge: EdgeId) -> Self {
        edge.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_roundtrip() {
        let edge = EdgeId::new(4);
        assert_eq!(edge.index(), 4);
        assert_eq!(usize::from(edge), 4);
        assert_eq!(EdgeId::from(4usize), edge);
    }

    #[test]
    fn test_edge_id_formatting() {
        let edge = EdgeId::new(9);
        assert_eq!(format!("{edge}"), "e9");
        assert_eq!(format!("{edge:?}"), "EdgeId(9)");
    }
}
