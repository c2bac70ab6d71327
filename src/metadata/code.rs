//! The instruction-level code model.
//!
//! Method bodies are flat instruction streams. The analysis core only needs to recognize
//! invoke instructions and read their symbolic targets, so the opcode set carried here is
//! the five invoke flavors plus enough ordinary opcodes to build realistic bodies.

use strum::Display;

use crate::metadata::method::MethodRef;

/// A DEX instruction opcode.
///
/// Only the shape relevant to whole-program analysis is modeled: which instructions are
/// invokes, and of which dispatch flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Opcode {
    /// No operation.
    Nop,
    /// Load a constant into a register.
    Const,
    /// Unconditional branch.
    Goto,
    /// Throw an exception object.
    Throw,
    /// Return from a `void` method.
    ReturnVoid,
    /// Return a value.
    Return,
    /// Dispatching call through the receiver's virtual table.
    InvokeVirtual,
    /// Call the superclass implementation of a virtual method.
    InvokeSuper,
    /// Non-dispatching call to a constructor or private method.
    InvokeDirect,
    /// Call to a static method.
    InvokeStatic,
    /// Dispatching call through an interface reference.
    InvokeInterface,
}

impl Opcode {
    /// Returns `true` if this opcode invokes a method.
    #[must_use]
    pub const fn is_invoke(self) -> bool {
        matches!(
            self,
            Opcode::InvokeVirtual
                | Opcode::InvokeSuper
                | Opcode::InvokeDirect
                | Opcode::InvokeStatic
                | Opcode::InvokeInterface
        )
    }
}

/// A single instruction in a method body.
///
/// Invoke instructions carry the symbolic [`MethodRef`] they target; all other operand
/// kinds are irrelevant to this crate's analyses and are not modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    method_ref: Option<MethodRef>,
}

impl Instruction {
    /// Creates a non-invoke instruction.
    #[must_use]
    pub fn new(opcode: Opcode) -> Self {
        debug_assert!(!opcode.is_invoke(), "invoke opcodes need a method reference");
        Instruction {
            opcode,
            method_ref: None,
        }
    }

    /// Creates an invoke instruction targeting the given symbolic reference.
    #[must_use]
    pub fn invoke(opcode: Opcode, target: MethodRef) -> Self {
        debug_assert!(opcode.is_invoke(), "{opcode} is not an invoke opcode");
        Instruction {
            opcode,
            method_ref: Some(target),
        }
    }

    /// Returns this instruction's opcode.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Returns the symbolic method reference of an invoke instruction.
    #[must_use]
    pub const fn method_ref(&self) -> Option<&MethodRef> {
        self.method_ref.as_ref()
    }
}

/// The code body of a concrete method: a flat instruction stream.
///
/// Instruction positions within the stream are the invoke locators the call graph records
/// on its edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBody {
    instructions: Vec<Instruction>,
}

impl MethodBody {
    /// Creates a body from an instruction stream.
    #[must_use]
    pub fn new(instructions: Vec<Instruction>) -> Self {
        MethodBody { instructions }
    }

    /// Returns an iterator over the instructions in stream order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Returns the number of instructions in the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the body contains no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl From<Vec<Instruction>> for MethodBody {
    fn from(instructions: Vec<Instruction>) -> Self {
        MethodBody::new(instructions)
    }
}
