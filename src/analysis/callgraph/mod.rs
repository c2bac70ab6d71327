//! Whole-program call graph construction.
//!
//! The call graph is a directed graph over reachable methods plus two distinguished ghost
//! nodes. A single ghost entry node points at every root (externally-entered) method, and
//! every sink method points at a single ghost exit node, so graph algorithms that require
//! a rooted graph (reachability, dominators) run on the call graph directly.
//!
//! # Architecture
//!
//! Construction is parameterized by a [`BuildStrategy`], which answers exactly two
//! questions: which methods are roots, and what are a method's callsites. Two strategies
//! ship with the crate:
//!
//! - [`SingleCalleeStrategy`] records only provably monomorphic call targets, skipping
//!   every dispatchable call. Suitable for optimizations that must know the unique callee.
//! - [`CompleteCallGraphStrategy`] records the nominal target of every resolvable call
//!   plus every method that transitively overrides it: a sound over-approximation of all
//!   runtime dispatch targets.
//!
//! # Components
//!
//! - [`CallGraph`] - The graph itself, with ghost nodes and the query surface
//! - [`CallNode`] - Node payload: ghost entry, ghost exit, or a method
//! - [`CallSite`] / [`InvokeLocator`] - One out-edge of a method and its position
//! - [`build_single_callee_graph`] / [`build_complete_call_graph`] - Entry points
//!
//! # Example
//!
//! ```rust,ignore
//! use dexscope::analysis::{build_complete_call_graph, CallGraph};
//!
//! let graph = build_complete_call_graph(&scope);
//! for node in graph.nodes() {
//!     if let Some(method) = graph.method_of(node) {
//!         println!("{} callees: {}", method, graph.successors(node).count());
//!     }
//! }
//! ```

mod graph;
mod site;
mod strategy;

pub use graph::{build_complete_call_graph, build_single_callee_graph, CallGraph, CallGraphStats, CallNode};
pub use site::{CallSite, InvokeLocator};
pub use strategy::{BuildStrategy, CompleteCallGraphStrategy, SingleCalleeStrategy};
