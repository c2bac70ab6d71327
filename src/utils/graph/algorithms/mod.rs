//! Graph algorithms for program analysis.
//!
//! The algorithms are written against the capability traits in
//! [`crate::utils::graph`], so they run on any graph shape that implements the
//! required capabilities.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`postorder`] - Depth-first postorder from a root
//! - [`reverse_postorder`] - Reverse postorder (the iteration order for forward
//!   data-flow problems)
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] / [`compute_dominators_from`] - Immediate dominators for a
//!   rooted graph, via the iterative reverse-postorder method
//! - [`DominatorTree`] - The query structure produced by dominator computation
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | Postorder/RPO | O(V + E) | Data-flow iteration order |
//! | Dominators | O(V·E) worst case, near-linear in practice | Devirtualization, loop and flow analysis |

mod dominators;
mod traversal;

pub use dominators::{compute_dominators, compute_dominators_from, DominatorIterator, DominatorTree};
pub use traversal::{postorder, reverse_postorder};
