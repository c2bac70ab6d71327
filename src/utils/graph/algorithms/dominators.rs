//! Dominator tree computation using the iterative reverse-postorder method.
//!
//! This module computes immediate dominators for rooted directed graphs. Dominator trees
//! feed devirtualization decisions, loop analysis, and any pass that needs to know which
//! program points are unavoidable on the way to another.
//!
//! # Theory
//!
//! A node `d` **dominates** a node `n` if every path from the entry node to `n` passes
//! through `d`. The **immediate dominator** of `n` is the unique strict dominator of `n`
//! that is dominated by every other dominator of `n`. Making each node's immediate
//! dominator its parent yields the dominator tree, rooted at the entry.
//!
//! # Algorithm
//!
//! This is the iterative "engineered" algorithm of Cooper, Harvey and Kennedy: number the
//! nodes in reverse postorder, then repeatedly recompute each node's immediate dominator as
//! the intersection of its already-processed predecessors (a two-finger walk up the
//! partially built tree) until a full pass changes nothing. The worst case is quadratic but
//! the common case is a small constant number of passes, and on the modestly sized graphs
//! produced per method it consistently beats the bookkeeping-heavy Lengauer-Tarjan variant.

use crate::utils::graph::{NodeId, Predecessors, RootedGraph, Successors};

use super::traversal::reverse_postorder;

/// Result of dominator tree computation.
///
/// Each node reachable from the entry has a defined immediate dominator; the entry is its
/// own immediate dominator. Queries on unreachable or out-of-range nodes return `None`,
/// the fixed "undefined" convention of this engine.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::utils::graph::{algorithms::compute_dominators_from, DirectedGraph, NodeId};
///
/// // 0 -> 1 -> 2
/// let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// let n0 = graph.add_node(());
/// let n1 = graph.add_node(());
/// let n2 = graph.add_node(());
/// graph.add_edge(n0, n1, ())?;
/// graph.add_edge(n1, n2, ())?;
///
/// let doms = compute_dominators_from(&graph, n0);
/// assert_eq!(doms.idom(n0), Some(n0));
/// assert_eq!(doms.idom(n2), Some(n1));
/// # Ok::<(), dexscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominatorTree {
    /// The entry (root) node of the dominator tree
    entry: NodeId,
    /// Immediate dominator per node index; `None` for unreachable nodes
    idom: Vec<Option<NodeId>>,
}

impl DominatorTree {
    /// Returns the entry (root) node of the dominator tree.
    #[must_use]
    #[inline]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the immediate dominator of a node.
    ///
    /// The entry node is its own immediate dominator: `idom(entry) == Some(entry)`.
    /// Nodes unreachable from the entry, and node identifiers outside the graph's index
    /// space, yield `None`.
    #[must_use]
    pub fn idom(&self, node: NodeId) -> Option<NodeId> {
        self.idom.get(node.index()).copied().flatten()
    }

    /// Checks if node `a` dominates node `b`.
    ///
    /// A node dominates itself. Returns `false` if `b` is unreachable.
    ///
    /// # Complexity
    ///
    /// O(depth of `b` in the dominator tree).
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return self.idom(b).is_some();
        }

        let mut current = b;
        while let Some(idom) = self.idom(current) {
            if idom == a {
                return true;
            }
            if idom == current {
                // Reached the entry without meeting `a`.
                return false;
            }
            current = idom;
        }
        false
    }

    /// Checks if node `a` strictly dominates node `b` (dominates it and `a != b`).
    #[must_use]
    #[inline]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over all dominators of a node, from the node itself up to and
    /// including the entry node. Empty for unreachable nodes.
    #[must_use]
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: if self.idom(node).is_some() {
                Some(node)
            } else {
                None
            },
        }
    }

    /// Returns the depth of a reachable node in the dominator tree.
    ///
    /// The entry node has depth 0; unreachable nodes yield `None`.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = node;
        while current != self.entry {
            current = self.idom(current)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Returns the number of node slots covered by this tree (reachable or not).
    #[must_use]
    #[inline]
    pub fn node_count(&self) -> usize {
        self.idom.len()
    }
}

/// Iterator over dominators of a node, from the node up to the entry.
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = if current == self.tree.entry {
            None
        } else {
            self.tree.idom(current)
        };
        Some(current)
    }
}

/// Computes the dominator tree of a rooted graph.
///
/// Equivalent to [`compute_dominators_from`] with `graph.entry()` as the root.
pub fn compute_dominators<G>(graph: &G) -> DominatorTree
where
    G: RootedGraph,
{
    compute_dominators_from(graph, graph.entry())
}

/// Computes immediate dominators for every node reachable from `entry`.
///
/// # Arguments
///
/// * `graph` - Any graph supporting forward and backward traversal
/// * `entry` - The root node; it becomes its own immediate dominator
///
/// # Determinism
///
/// The resulting `idom` assignment is a function of the graph alone: it does not depend on
/// the iteration order of successor or predecessor lists.
///
/// # Complexity
///
/// O(V + E) per pass; the number of passes is bounded by the loop-nesting depth plus two
/// and is almost always 2 in practice.
pub fn compute_dominators_from<G>(graph: &G, entry: NodeId) -> DominatorTree
where
    G: Successors + Predecessors,
{
    let node_count = graph.node_count();
    let mut idom: Vec<Option<NodeId>> = vec![None; node_count];

    if entry.index() >= node_count {
        return DominatorTree { entry, idom };
    }

    let order = reverse_postorder(graph, entry);

    // Reverse-postorder numbering drives the two-finger intersection walk.
    let mut rpo_number = vec![usize::MAX; node_count];
    for (number, &node) in order.iter().enumerate() {
        rpo_number[node.index()] = number;
    }

    idom[entry.index()] = Some(entry);

    let mut changed = true;
    while changed {
        changed = false;

        // The entry is first in reverse postorder; skip it.
        for &node in order.iter().skip(1) {
            let mut new_idom: Option<NodeId> = None;
            for pred in graph.predecessors(node) {
                // Predecessors unreachable from the entry, or not yet processed in this
                // sweep, contribute nothing to the intersection.
                if pred.index() >= node_count || idom[pred.index()].is_none() {
                    continue;
                }
                new_idom = Some(match new_idom {
                    None => pred,
                    Some(current) => intersect(&idom, &rpo_number, pred, current),
                });
            }

            if let Some(new_idom) = new_idom {
                if idom[node.index()] != Some(new_idom) {
                    idom[node.index()] = Some(new_idom);
                    changed = true;
                }
            }
        }
    }

    DominatorTree { entry, idom }
}

/// Two-finger walk: the nearest common ancestor of `a` and `b` in the partial tree.
fn intersect(
    idom: &[Option<NodeId>],
    rpo_number: &[usize],
    mut a: NodeId,
    mut b: NodeId,
) -> NodeId {
    while a != b {
        while rpo_number[a.index()] > rpo_number[b.index()] {
            a = idom[a.index()].expect("intersection walks only processed nodes");
        }
        while rpo_number[b.index()] > rpo_number[a.index()] {
            b = idom[b.index()].expect("intersection walks only processed nodes");
        }
    }
    a
}
