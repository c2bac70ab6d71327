//! Depth-first traversal orders.
//!
//! Provides iterative postorder and reverse-postorder computation over any graph
//! implementing [`Successors`]. Reverse postorder is the canonical iteration order for
//! forward data-flow problems: every node is visited after all of its non-back-edge
//! predecessors.

use crate::utils::graph::{NodeId, Successors};

/// Computes the depth-first postorder of all nodes reachable from `root`.
///
/// The traversal is iterative with an explicit stack, so arbitrarily deep graphs do not
/// overflow the call stack. Nodes unreachable from `root` do not appear in the result.
///
/// Successor iteration order influences which postorder is produced, but every result is a
/// valid postorder of the reachable subgraph.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::utils::graph::{algorithms::postorder, DirectedGraph};
///
/// let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// graph.add_edge(a, b, ())?;
///
/// assert_eq!(postorder(&graph, a), vec![b, a]);
/// # Ok::<(), dexscope::Error>(())
/// ```
pub fn postorder<G: Successors>(graph: &G, root: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    let mut order = Vec::new();
    if root.index() >= node_count {
        return order;
    }

    let mut visited = vec![false; node_count];
    visited[root.index()] = true;

    // Each frame holds a node, its successor list, and the next successor to try.
    let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> =
        vec![(root, graph.successors(root).collect(), 0)];

    loop {
        let descend = {
            let Some((_, succs, cursor)) = stack.last_mut() else {
                break;
            };
            let mut found = None;
            while *cursor < succs.len() {
                let next = succs[*cursor];
                *cursor += 1;
                if next.index() < node_count && !visited[next.index()] {
                    visited[next.index()] = true;
                    found = Some(next);
                    break;
                }
            }
            found
        };

        match descend {
            Some(next) => {
                stack.push((next, graph.successors(next).collect(), 0));
            }
            None => {
                if let Some((node, _, _)) = stack.pop() {
                    order.push(node);
                }
            }
        }
    }

    order
}

/// Computes the reverse postorder of all nodes reachable from `root`.
///
/// The root is always first; every other node appears after all of its predecessors that
/// are not reached through back edges.
pub fn reverse_postorder<G: Successors>(graph: &G, root: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, root);
    order.reverse();
    order
}
