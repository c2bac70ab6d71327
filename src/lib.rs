// Copyright 2025-2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # dexscope
//!
//! Whole-program static analysis for an Android-DEX-shaped intermediate representation.
//! `dexscope` consumes a fully loaded program scope - classes, fields, methods, and typed
//! instruction streams - and produces the analyses a bytecode optimizer's passes consume:
//! the method-override graph, resolved invoke targets, whole-program call graphs, and
//! dominator trees.
//!
//! # Architecture
//!
//! The library is organized into layers that build on one another:
//!
//! - **Metadata Layer** ([`metadata`]): The IR data model - [`Scope`](metadata::Scope),
//!   classes, methods, and instruction streams, all identified by stable arena indices
//! - **Analysis Layer** ([`analysis`]): Override graph, memoizing method resolver, and
//!   the strategy-parameterized call-graph builder with ghost entry/exit nodes
//! - **Graph Layer** ([`utils::graph`]): The generic directed-graph substrate, capability
//!   traits, and algorithms (traversal orders, iterative dominator trees)
//! - **Boundary Collaborators** ([`config`], [`apk`]): Inliner-configuration population
//!   and asset-directory management for the surrounding optimizer
//!
//! # Key Components
//!
//! - [`metadata::Scope`] - The whole program under analysis
//! - [`analysis::build_single_callee_graph`] / [`analysis::build_complete_call_graph`] -
//!   The two call-graph construction policies
//! - [`analysis::OverrideGraph`] - Which methods override which, and the derived
//!   devirtualization candidates
//! - [`utils::graph::algorithms::compute_dominators`] - Immediate dominators over any
//!   rooted graph shape, call graphs and control-flow graphs alike
//! - [`crate::Error`] and [`crate::Result`] - Error handling
//!
//! # Usage Examples
//!
//! ## Building a call graph
//!
//! ```rust,ignore
//! use dexscope::prelude::*;
//!
//! let mut scope = Scope::new();
//! // ... load classes and methods ...
//!
//! let graph = build_complete_call_graph(&scope);
//! for node in graph.nodes() {
//!     if let Some(method) = graph.method_of(node) {
//!         println!("{}: {} callees", scope.method(method), graph.callees(method).len());
//!     }
//! }
//! ```
//!
//! ## Dominators over the call graph
//!
//! ```rust,ignore
//! use dexscope::prelude::*;
//!
//! let graph = build_single_callee_graph(&scope);
//! let doms = compute_dominators(&graph);
//! assert_eq!(doms.idom(graph.entry()), Some(graph.entry()));
//! ```
//!
//! # Threading Model
//!
//! Graph construction runs on a single control thread. Scope-walking collaborators (the
//! inliner-config per-method pass) fan out over a work-stealing pool, writing only
//! per-method atomic state. The resolver cache is the one shared-mutable structure; it is
//! a sharded concurrent map, so parallel resolution serializes writes per shard while
//! resolved entries are read without contention.

pub mod analysis;
pub mod apk;
pub mod config;
pub mod metadata;
pub mod prelude;
pub mod utils;

mod error;

pub use error::Error;

/// The result type used throughout dexscope.
pub type Result<T> = std::result::Result<T, Error>;
