//! Whole-program static analyses over the DEX IR.
//!
//! # Architecture
//!
//! The analyses layer bottom-up:
//!
//! 1. [`overrides`] builds the method-override graph: which methods override which, and
//!    which declared-virtual methods are provably monomorphic.
//! 2. [`resolver`] turns symbolic invoke references into method definitions, memoized
//!    through a [`ResolverCache`].
//! 3. [`callgraph`] combines the two under a pluggable build strategy to produce the
//!    whole-program call graph with ghost entry/exit nodes.
//!
//! The dominator engine lives in [`crate::utils::graph::algorithms`] and runs on call
//! graphs and client control-flow graphs alike.

pub mod callgraph;
pub mod overrides;
pub mod resolver;

pub use callgraph::{
    build_complete_call_graph, build_single_callee_graph, BuildStrategy, CallGraph, CallNode,
    CallSite, CompleteCallGraphStrategy, InvokeLocator, SingleCalleeStrategy,
};
pub use overrides::{build_override_graph, non_true_virtuals, OverrideGraph};
pub use resolver::{resolve_method, ResolverCache, SearchKind};
