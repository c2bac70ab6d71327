//! # dexscope Prelude
//!
//! Convenient re-exports of the most commonly used types and functions. Import this
//! module to get quick access to the essentials for whole-program analysis.
//!
//! ```rust,ignore
//! use dexscope::prelude::*;
//!
//! let graph = build_complete_call_graph(&scope);
//! let doms = compute_dominators(&graph);
//! ```

// Core types and error handling

/// The main error type for all dexscope operations
pub use crate::Error;

/// The result type used throughout dexscope
pub use crate::Result;

// Metadata layer

/// The whole program under analysis
pub use crate::metadata::Scope;

/// Class definitions and identity
pub use crate::metadata::{ClassAccess, ClassId, DexClass, DexType};

/// Method definitions, identity, and symbolic references
pub use crate::metadata::{Method, MethodAccess, MethodId, MethodRef, RenderState};

/// The instruction-level code model
pub use crate::metadata::{Instruction, MethodBody, Opcode};

// Analysis layer

/// Call-graph construction and queries
pub use crate::analysis::{
    build_complete_call_graph, build_single_callee_graph, BuildStrategy, CallGraph, CallNode,
    CallSite, CompleteCallGraphStrategy, InvokeLocator, SingleCalleeStrategy,
};

/// Override-graph construction and devirtualization candidates
pub use crate::analysis::{build_override_graph, non_true_virtuals, OverrideGraph};

/// Symbolic method-reference resolution
pub use crate::analysis::{resolve_method, ResolverCache, SearchKind};

// Graph layer

/// Graph identifiers and capability traits
pub use crate::utils::graph::{
    DirectedGraph, EdgeId, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
};

/// Dominator computation
pub use crate::utils::graph::algorithms::{
    compute_dominators, compute_dominators_from, DominatorTree,
};

// Boundary collaborators

/// Inliner configuration population
pub use crate::config::InlinerConfig;

/// Asset-directory management
pub use crate::apk::ApkManager;
