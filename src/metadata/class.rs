//! Class definitions for the DEX IR.

use std::fmt;

use bitflags::bitflags;

use crate::metadata::{method::MethodId, ty::DexType};

bitflags! {
    /// DEX class access flags (`access_flags` in `class_def_item`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassAccess: u32 {
        /// `ACC_PUBLIC`
        const PUBLIC = 0x0001;
        /// `ACC_FINAL`
        const FINAL = 0x0010;
        /// `ACC_INTERFACE`
        const INTERFACE = 0x0200;
        /// `ACC_ABSTRACT`
        const ABSTRACT = 0x0400;
        /// `ACC_SYNTHETIC`
        const SYNTHETIC = 0x1000;
        /// `ACC_ANNOTATION`
        const ANNOTATION = 0x2000;
        /// `ACC_ENUM`
        const ENUM = 0x4000;
    }
}

/// A strongly-typed identifier for classes within a [`Scope`](crate::metadata::Scope).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub(crate) usize);

impl ClassId {
    /// Creates a new `ClassId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        ClassId(index)
    }

    /// Returns the raw 0-based index of this class identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A class definition in the scope.
///
/// Each class carries its type identity (the descriptor doubles as the declared name), an
/// optional superclass reference, its method lists split by dispatch kind as in the DEX
/// container format, annotations, and the keep-rule marker consulted by the override
/// analysis.
#[derive(Debug)]
pub struct DexClass {
    ty: DexType,
    super_class: Option<DexType>,
    access: ClassAccess,
    direct_methods: Vec<MethodId>,
    virtual_methods: Vec<MethodId>,
    annotations: Vec<DexType>,
    externally_subclassable: bool,
}

impl DexClass {
    /// Creates an empty class definition.
    ///
    /// Methods are attached through the owning scope
    /// ([`Scope::add_direct_method`](crate::metadata::Scope::add_direct_method) /
    /// [`Scope::add_virtual_method`](crate::metadata::Scope::add_virtual_method)) so the
    /// scope's method arena stays consistent with the class lists.
    #[must_use]
    pub fn new(ty: DexType, super_class: Option<DexType>, access: ClassAccess) -> Self {
        DexClass {
            ty,
            super_class,
            access,
            direct_methods: Vec::new(),
            virtual_methods: Vec::new(),
            annotations: Vec::new(),
            externally_subclassable: false,
        }
    }

    /// Attaches annotation type descriptors.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<DexType>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Returns the type identity of this class.
    #[must_use]
    pub const fn ty(&self) -> &DexType {
        &self.ty
    }

    /// Returns the declared name of this class (its descriptor).
    #[must_use]
    pub fn name(&self) -> &str {
        self.ty.descriptor()
    }

    /// Returns the superclass reference, if any.
    ///
    /// `None` for the root of a hierarchy. A `Some` reference may still dangle if the
    /// superclass is outside the scope; analyses treat that the same as a hierarchy root.
    #[must_use]
    pub const fn super_class(&self) -> Option<&DexType> {
        self.super_class.as_ref()
    }

    /// Returns the access flags.
    #[must_use]
    pub const fn access(&self) -> ClassAccess {
        self.access
    }

    /// Returns the non-virtual (static, private, constructor) methods.
    #[must_use]
    pub fn direct_methods(&self) -> &[MethodId] {
        &self.direct_methods
    }

    /// Returns the virtually-dispatched methods.
    #[must_use]
    pub fn virtual_methods(&self) -> &[MethodId] {
        &self.virtual_methods
    }

    /// Returns the annotation type descriptors attached to this class.
    #[must_use]
    pub fn annotations(&self) -> &[DexType] {
        &self.annotations
    }

    /// Returns `true` if keep rules mark this class as subclassable from outside the scope.
    ///
    /// Virtual methods of such classes can always be overridden by unseen code, so they
    /// are true-virtual regardless of what the override graph finds within the scope.
    #[must_use]
    pub const fn is_externally_subclassable(&self) -> bool {
        self.externally_subclassable
    }

    /// Marks this class as subclassable from outside the scope.
    pub fn set_externally_subclassable(&mut self) {
        self.externally_subclassable = true;
    }

    pub(crate) fn push_direct(&mut self, method: MethodId) {
        self.direct_methods.push(method);
    }

    pub(crate) fn push_virtual(&mut self, method: MethodId) {
        self.virtual_methods.push(method);
    }
}

impl fmt::Display for DexClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_basics() {
        let cls = DexClass::new(
            DexType::new("Lcom/example/Foo;"),
            Some(DexType::new("Ljava/lang/Object;")),
            ClassAccess::PUBLIC,
        );

        assert_eq!(cls.name(), "Lcom/example/Foo;");
        assert_eq!(
            cls.super_class().map(DexType::descriptor),
            Some("Ljava/lang/Object;")
        );
        assert!(cls.direct_methods().is_empty());
        assert!(cls.virtual_methods().is_empty());
        assert!(!cls.is_externally_subclassable());
    }

    #[test]
    fn test_externally_subclassable_marker() {
        let mut cls = DexClass::new(DexType::new("LFoo;"), None, ClassAccess::PUBLIC);
        cls.set_externally_subclassable();
        assert!(cls.is_externally_subclassable());
    }

    #[test]
    fn test_class_annotations() {
        let anno = DexType::new("Lcom/example/Keep;");
        let cls = DexClass::new(DexType::new("LFoo;"), None, ClassAccess::PUBLIC)
            .with_annotations(vec![anno.clone()]);
        assert_eq!(cls.annotations(), &[anno]);
    }
}
