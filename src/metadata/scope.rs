//! The program scope: class list, method arena, and walkers.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::metadata::{
    class::{ClassAccess, ClassId, DexClass},
    method::{Method, MethodId},
    ty::DexType,
};

/// A whole program under analysis.
///
/// The scope owns an ordered list of classes and a method arena. Classes reference their
/// methods by [`MethodId`]; all analyses traffic exclusively in [`ClassId`] / [`MethodId`]
/// indices, which stay stable for the scope's lifetime.
///
/// # Mutation Model
///
/// Loaders build the scope through [`add_class`](Self::add_class) and the two
/// `add_*_method` operations; analyses take `&Scope` and never mutate the structure. The
/// only state written during analysis is the per-method
/// [`RenderState`](crate::metadata::RenderState), which is atomic and reachable through a
/// shared reference.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::metadata::{ClassAccess, DexClass, DexType, Method, MethodAccess, Scope};
///
/// let mut scope = Scope::new();
/// let object = DexType::new("Ljava/lang/Object;");
/// let cls = scope.add_class(DexClass::new(
///     DexType::new("Lcom/example/Foo;"),
///     Some(object.clone()),
///     ClassAccess::PUBLIC,
/// ));
/// let m = scope.add_virtual_method(
///     cls,
///     Method::new(DexType::new("Lcom/example/Foo;"), "run", "()V", MethodAccess::PUBLIC),
/// );
/// assert!(scope.method(m).is_virtual());
/// ```
#[derive(Debug, Default)]
pub struct Scope {
    classes: Vec<DexClass>,
    methods: Vec<Method>,
    class_index: FxHashMap<DexType, ClassId>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Scope::default()
    }

    /// Adds a class definition and returns its identifier.
    ///
    /// The class becomes the resolution target for its type identity; adding a second
    /// class with the same type keeps the first as the resolution target.
    pub fn add_class(&mut self, class: DexClass) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.class_index.entry(class.ty().clone()).or_insert(id);
        self.classes.push(class);
        id
    }

    /// Convenience wrapper: adds an empty class from its parts.
    pub fn add_class_parts(
        &mut self,
        ty: DexType,
        super_class: Option<DexType>,
        access: ClassAccess,
    ) -> ClassId {
        self.add_class(DexClass::new(ty, super_class, access))
    }

    /// Adds a method to a class's direct (non-virtual) list and returns its identifier.
    pub fn add_direct_method(&mut self, class: ClassId, method: Method) -> MethodId {
        let id = MethodId::new(self.methods.len());
        self.methods.push(method);
        self.classes[class.index()].push_direct(id);
        id
    }

    /// Adds a method to a class's virtual list and returns its identifier.
    ///
    /// The method is marked as virtually dispatched; its position in the virtual list is
    /// what makes a DEX method virtual, not an access flag.
    pub fn add_virtual_method(&mut self, class: ClassId, method: Method) -> MethodId {
        let id = MethodId::new(self.methods.len());
        let mut method = method;
        method.virtual_ = true;
        self.methods.push(method);
        self.classes[class.index()].push_virtual(id);
        id
    }

    /// Returns the class with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `class` was not produced by this scope.
    #[must_use]
    pub fn class(&self, class: ClassId) -> &DexClass {
        &self.classes[class.index()]
    }

    /// Returns a mutable reference to the class with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `class` was not produced by this scope.
    pub fn class_mut(&mut self, class: ClassId) -> &mut DexClass {
        &mut self.classes[class.index()]
    }

    /// Returns the method with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `method` was not produced by this scope.
    #[must_use]
    pub fn method(&self, method: MethodId) -> &Method {
        &self.methods[method.index()]
    }

    /// Resolves a type identity to its defining class, if the type is in scope.
    #[must_use]
    pub fn class_of_type(&self, ty: &DexType) -> Option<ClassId> {
        self.class_index.get(ty).copied()
    }

    /// Returns an iterator over all classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &DexClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId::new(i), c))
    }

    /// Returns an iterator over all methods in arena order.
    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (MethodId::new(i), m))
    }

    /// Returns an iterator over the methods that have a code body.
    pub fn methods_with_code(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods().filter(|(_, m)| m.body().is_some())
    }

    /// Applies `f` to every method through a bounded work-stealing parallel map.
    ///
    /// Tasks are independent: they may read the whole scope but should write only through
    /// the visited method's [`RenderState`](crate::metadata::RenderState).
    pub fn par_methods<F>(&self, f: F)
    where
        F: Fn(MethodId, &Method) + Sync + Send,
    {
        self.methods
            .par_iter()
            .enumerate()
            .for_each(|(i, m)| f(MethodId::new(i), m));
    }

    /// Searches a class's direct-method list for a name/proto match.
    #[must_use]
    pub fn find_direct_method(&self, class: ClassId, name: &str, proto: &str) -> Option<MethodId> {
        self.class(class)
            .direct_methods()
            .iter()
            .copied()
            .find(|&m| self.method(m).matches_sig(name, proto))
    }

    /// Searches a class's virtual-method list for a name/proto match.
    #[must_use]
    pub fn find_virtual_method(&self, class: ClassId, name: &str, proto: &str) -> Option<MethodId> {
        self.class(class)
            .virtual_methods()
            .iter()
            .copied()
            .find(|&m| self.method(m).matches_sig(name, proto))
    }

    /// Returns the number of classes in the scope.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the number of methods in the scope.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Instruction, MethodAccess, Opcode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_scope() -> (Scope, ClassId, MethodId, MethodId) {
        let mut scope = Scope::new();
        let foo = DexType::new("LFoo;");
        let cls = scope.add_class_parts(foo.clone(), None, ClassAccess::PUBLIC);
        let direct = scope.add_direct_method(
            cls,
            Method::new(foo.clone(), "helper", "()V", MethodAccess::STATIC)
                .with_body(vec![Instruction::new(Opcode::ReturnVoid)]),
        );
        let virt = scope.add_virtual_method(
            cls,
            Method::new(foo, "run", "()V", MethodAccess::PUBLIC),
        );
        (scope, cls, direct, virt)
    }

    #[test]
    fn test_scope_identity() {
        let (scope, cls, direct, virt) = small_scope();

        assert_eq!(scope.class_count(), 1);
        assert_eq!(scope.method_count(), 2);
        assert_eq!(scope.class_of_type(&DexType::new("LFoo;")), Some(cls));
        assert_eq!(scope.class_of_type(&DexType::new("LBar;")), None);

        assert!(!scope.method(direct).is_virtual());
        assert!(scope.method(virt).is_virtual());
        assert_eq!(scope.class(cls).direct_methods(), &[direct]);
        assert_eq!(scope.class(cls).virtual_methods(), &[virt]);
    }

    #[test]
    fn test_find_methods_by_signature() {
        let (scope, cls, direct, virt) = small_scope();

        assert_eq!(scope.find_direct_method(cls, "helper", "()V"), Some(direct));
        assert_eq!(scope.find_direct_method(cls, "helper", "(I)V"), None);
        assert_eq!(scope.find_virtual_method(cls, "run", "()V"), Some(virt));
        assert_eq!(scope.find_virtual_method(cls, "helper", "()V"), None);
    }

    #[test]
    fn test_methods_with_code() {
        let (scope, _, direct, _) = small_scope();
        let with_code: Vec<_> = scope.methods_with_code().map(|(id, _)| id).collect();
        assert_eq!(with_code, vec![direct]);
    }

    #[test]
    fn test_par_methods_visits_every_method() {
        let (scope, _, _, _) = small_scope();
        let visits = AtomicUsize::new(0);
        scope.par_methods(|_, _| {
            visits.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(visits.load(Ordering::Relaxed), scope.method_count());
    }

    #[test]
    fn test_duplicate_class_keeps_first_resolution_target() {
        let mut scope = Scope::new();
        let ty = DexType::new("LDup;");
        let first = scope.add_class_parts(ty.clone(), None, ClassAccess::PUBLIC);
        let _second = scope.add_class_parts(ty.clone(), None, ClassAccess::PUBLIC);
        assert_eq!(scope.class_of_type(&ty), Some(first));
    }
}
