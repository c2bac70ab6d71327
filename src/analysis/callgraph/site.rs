//! Callsite representation for call-graph edges.

use std::fmt;

use crate::metadata::MethodId;

/// Opaque locator of an invoke instruction within its caller's code stream.
///
/// Call-graph edges carry the locator of the invoke that produced them, so passes can map
/// an edge back to the instruction (for rewriting or reporting) without the graph knowing
/// anything about instruction encoding. Edges synthesized for ghost nodes carry no
/// locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvokeLocator(usize);

impl InvokeLocator {
    /// Creates a locator from an instruction's position in the caller's stream.
    #[must_use]
    #[inline]
    pub const fn new(position: usize) -> Self {
        InvokeLocator(position)
    }

    /// Returns the instruction position within the caller's code stream.
    #[must_use]
    #[inline]
    pub const fn position(self) -> usize {
        self.0
    }
}

impl fmt::Display for InvokeLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insn{}", self.0)
    }
}

/// One out-edge of a method as reported by a build strategy: the resolved callee and the
/// invoke instruction that reaches it.
///
/// The same locator may appear in several callsites (the complete strategy emits one
/// callsite per possible dispatch target of a single invoke).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// The resolved target method.
    pub callee: MethodId,
    /// Position of the invoke instruction within the caller.
    pub locator: InvokeLocator,
}

impl CallSite {
    /// Creates a callsite.
    #[must_use]
    pub const fn new(callee: MethodId, locator: InvokeLocator) -> Self {
        CallSite { callee, locator }
    }
}
