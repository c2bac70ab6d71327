//! Method definitions, symbolic references, and per-method analysis state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{code::MethodBody, ty::DexType};

bitflags! {
    /// DEX method access flags (`access_flags` in `encoded_method`).
    ///
    /// Only the flags the analysis core consults are given named constants; unknown bits
    /// are preserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodAccess: u32 {
        /// `ACC_PUBLIC`
        const PUBLIC = 0x0001;
        /// `ACC_PRIVATE`
        const PRIVATE = 0x0002;
        /// `ACC_PROTECTED`
        const PROTECTED = 0x0004;
        /// `ACC_STATIC`
        const STATIC = 0x0008;
        /// `ACC_FINAL`
        const FINAL = 0x0010;
        /// `ACC_NATIVE`
        const NATIVE = 0x0100;
        /// `ACC_ABSTRACT`
        const ABSTRACT = 0x0400;
        /// `ACC_SYNTHETIC`
        const SYNTHETIC = 0x1000;
        /// `ACC_CONSTRUCTOR` (`<init>` and `<clinit>`)
        const CONSTRUCTOR = 0x10000;
    }
}

/// A strongly-typed identifier for methods within a [`Scope`](crate::metadata::Scope).
///
/// Method IDs index the scope's method arena. They are assigned sequentially as methods
/// are added and remain stable for the lifetime of the scope, so every analysis in this
/// crate uses them as its method currency.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(pub(crate) usize);

impl MethodId {
    /// Creates a new `MethodId` from a raw index value.
    ///
    /// Primarily intended for tests; normal usage obtains IDs from
    /// [`Scope::add_direct_method`](crate::metadata::Scope::add_direct_method) and friends.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        MethodId(index)
    }

    /// Returns the raw 0-based index of this method identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.0)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// A symbolic method reference as it appears at an invoke site.
///
/// A reference names a method by `(owner type, name, proto)` without asserting that a
/// definition exists; resolution against the scope happens in
/// [`resolve_method`](crate::analysis::resolve_method). `proto` is the shorthand method
/// descriptor, e.g. `(ILjava/lang/String;)V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    owner: DexType,
    name: Arc<str>,
    proto: Arc<str>,
}

impl MethodRef {
    /// Creates a symbolic reference to `owner.name:proto`.
    #[must_use]
    pub fn new(owner: DexType, name: impl Into<Arc<str>>, proto: impl Into<Arc<str>>) -> Self {
        MethodRef {
            owner,
            name: name.into(),
            proto: proto.into(),
        }
    }

    /// Returns the declared receiver type of the reference.
    #[must_use]
    pub const fn owner(&self) -> &DexType {
        &self.owner
    }

    /// Returns the referenced method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the referenced method descriptor.
    #[must_use]
    pub fn proto(&self) -> &str {
        &self.proto
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.proto)
    }
}

/// Mutable per-method analysis state.
///
/// This is the "renderer state" optimization passes consult: whether the method is an
/// external entry point (`root`), and the inliner directives populated by
/// [`InlinerConfig::populate`](crate::config::InlinerConfig::populate).
///
/// The inliner flags are written from a parallel method walk while other tasks read
/// neighboring methods, so all flags are atomics behind a logically-const interface.
/// Relaxed ordering suffices: each flag is an independent boolean with no cross-flag
/// ordering requirement.
#[derive(Debug, Default)]
pub struct RenderState {
    root: AtomicBool,
    dont_inline: AtomicBool,
    force_inline: AtomicBool,
}

impl RenderState {
    /// Returns `true` if the method is an external entry point (exported, reflectively
    /// reachable, or otherwise kept).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root.load(Ordering::Relaxed)
    }

    /// Marks the method as an external entry point.
    pub fn set_root(&self) {
        self.root.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if the inliner must not inline this method.
    #[must_use]
    pub fn dont_inline(&self) -> bool {
        self.dont_inline.load(Ordering::Relaxed)
    }

    /// Forbids inlining of this method. Takes precedence over [`force_inline`](Self::force_inline).
    pub fn set_dont_inline(&self) {
        self.dont_inline.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if the inliner should inline this method wherever possible.
    #[must_use]
    pub fn force_inline(&self) -> bool {
        self.force_inline.load(Ordering::Relaxed)
    }

    /// Requests unconditional inlining of this method.
    pub fn set_force_inline(&self) {
        self.force_inline.store(true, Ordering::Relaxed);
    }
}

/// A method definition in the scope.
///
/// A method is uniquely identified by its fully-qualified signature (owner, name, proto);
/// the [`Scope`](crate::metadata::Scope) enforces that identity and hands out the stable
/// [`MethodId`]. Whether a method is virtual is determined by which of its class's method
/// lists it was added to, mirroring the positional encoding in DEX.
#[derive(Debug)]
pub struct Method {
    owner: DexType,
    name: Arc<str>,
    proto: Arc<str>,
    access: MethodAccess,
    /// Set when the method is added to a class's virtual-method list.
    pub(crate) virtual_: bool,
    body: Option<MethodBody>,
    annotations: Vec<DexType>,
    rstate: RenderState,
}

impl Method {
    /// Creates a method definition without a body.
    ///
    /// Use [`with_body`](Self::with_body) and [`with_annotations`](Self::with_annotations)
    /// to complete it before adding it to a scope.
    #[must_use]
    pub fn new(
        owner: DexType,
        name: impl Into<Arc<str>>,
        proto: impl Into<Arc<str>>,
        access: MethodAccess,
    ) -> Self {
        Method {
            owner,
            name: name.into(),
            proto: proto.into(),
            access,
            virtual_: false,
            body: None,
            annotations: Vec::new(),
            rstate: RenderState::default(),
        }
    }

    /// Attaches a code body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<MethodBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attaches annotation type descriptors.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<DexType>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Returns the class this method is declared on.
    #[must_use]
    pub const fn owner(&self) -> &DexType {
        &self.owner
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the method descriptor.
    #[must_use]
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// Returns the access flags.
    #[must_use]
    pub const fn access(&self) -> MethodAccess {
        self.access
    }

    /// Returns the code body, if the method has one.
    #[must_use]
    pub const fn body(&self) -> Option<&MethodBody> {
        self.body.as_ref()
    }

    /// Returns the annotation type descriptors attached to this method.
    #[must_use]
    pub fn annotations(&self) -> &[DexType] {
        &self.annotations
    }

    /// Returns the mutable per-method analysis state.
    #[must_use]
    pub const fn rstate(&self) -> &RenderState {
        &self.rstate
    }

    /// Returns `true` if the method dispatches through the virtual table.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.virtual_
    }

    /// Returns `true` if the method is static.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.access.contains(MethodAccess::STATIC)
    }

    /// Returns `true` if the method has a code body to analyze.
    ///
    /// Abstract and native methods are not concrete.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.body.is_some()
            && !self
                .access
                .intersects(MethodAccess::ABSTRACT | MethodAccess::NATIVE)
    }

    /// Returns `true` if the method is an instance or class constructor.
    #[must_use]
    pub const fn is_constructor(&self) -> bool {
        self.access.contains(MethodAccess::CONSTRUCTOR)
    }

    /// Returns `true` if the method is a class static initializer (`<clinit>`).
    #[must_use]
    pub fn is_clinit(&self) -> bool {
        self.access
            .contains(MethodAccess::STATIC | MethodAccess::CONSTRUCTOR)
            && &*self.name == "<clinit>"
    }

    /// Returns `true` if the method's name and proto match the given signature.
    #[must_use]
    pub fn matches_sig(&self, name: &str, proto: &str) -> bool {
        &*self.name == name && &*self.proto == proto
    }

    /// Builds the symbolic reference naming this definition.
    #[must_use]
    pub fn to_ref(&self) -> MethodRef {
        MethodRef {
            owner: self.owner.clone(),
            name: Arc::clone(&self.name),
            proto: Arc::clone(&self.proto),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.proto)
    }
}
