//! The in-memory DEX intermediate representation.
//!
//! This module defines the data model every analysis consumes: a [`Scope`] of classes,
//! each holding direct and virtual methods, each method optionally carrying a body of
//! typed instructions.
//!
//! # Components
//!
//! - [`DexType`] - Interned type descriptor, the identity of a class
//! - [`DexClass`] / [`ClassId`] - A class definition and its index identity
//! - [`Method`] / [`MethodId`] - A method definition and its index identity
//! - [`MethodRef`] - A symbolic method reference as it appears at invoke sites
//! - [`MethodBody`], [`Instruction`], [`Opcode`] - The code model
//! - [`Scope`] - The whole program: class list, method arena, and walkers
//!
//! # Identity Model
//!
//! Classes and methods live in arenas owned by the [`Scope`] and are identified by
//! [`ClassId`] / [`MethodId`] indices. Identifiers are stable for the lifetime of the
//! scope, cheap to copy, and hashable, which makes them the currency of every analysis
//! result in this crate.

mod class;
mod code;
mod method;
mod scope;
mod ty;

pub use class::{ClassAccess, ClassId, DexClass};
pub use code::{Instruction, MethodBody, Opcode};
pub use method::{Method, MethodAccess, MethodId, MethodRef, RenderState};
pub use scope::Scope;
pub use ty::DexType;
