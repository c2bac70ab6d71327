//! Symbolic method-reference resolution.
//!
//! Invoke instructions name their targets symbolically: `(owner type, name, proto)` plus
//! the invoke flavor. This module resolves such references to method definitions in the
//! scope, walking the superclass hierarchy as the flavor requires. Results, including
//! misses, are memoized in a [`ResolverCache`] so call-graph construction resolves each
//! distinct reference once.
//!
//! Resolution never fails loudly: a reference whose receiver type or definition is not in
//! scope resolves to `None` and is assumed to target external code.

use dashmap::DashMap;
use strum::Display;

use crate::metadata::{ClassId, MethodId, MethodRef, Opcode, Scope};

/// The search performed when resolving an invoke, determined by the invoke flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
    /// `invoke-static`: search direct methods up the hierarchy.
    Static,
    /// `invoke-direct`: search direct methods up the hierarchy.
    Direct,
    /// `invoke-virtual`: search virtual methods up the hierarchy.
    Virtual,
    /// `invoke-interface`: search virtual methods up the hierarchy.
    Interface,
    /// `invoke-super`: search virtual methods starting at the caller's direct superclass.
    Super,
}

impl SearchKind {
    /// Maps an invoke opcode to its resolution search kind.
    ///
    /// Returns `None` for non-invoke opcodes.
    #[must_use]
    pub const fn from_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::InvokeStatic => Some(SearchKind::Static),
            Opcode::InvokeDirect => Some(SearchKind::Direct),
            Opcode::InvokeVirtual => Some(SearchKind::Virtual),
            Opcode::InvokeInterface => Some(SearchKind::Interface),
            Opcode::InvokeSuper => Some(SearchKind::Super),
            _ => None,
        }
    }
}

/// Memoization cache for [`resolve_method`].
///
/// Keyed by `(reference, search kind)`; the value records the resolution outcome,
/// including misses, so unresolvable references are not re-searched. Entries are monotone
/// within an analysis run: once present they are never invalidated.
///
/// # Thread Safety
///
/// The cache mutates behind a logically-const interface. Storage is a sharded concurrent
/// map, so concurrent resolvers serialize writes per shard while reads of already-resolved
/// entries proceed without contention; single-threaded callers pay only the shard lookup.
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: DashMap<(MethodRef, SearchKind), Option<MethodId>>,
}

impl ResolverCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        ResolverCache::default()
    }

    /// Returns the number of memoized resolutions (hits and misses).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been resolved through this cache yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a symbolic method reference against the scope.
///
/// # Arguments
///
/// * `scope` - The program being analyzed
/// * `reference` - The symbolic reference from the invoke instruction
/// * `search` - The search kind derived from the invoke flavor
/// * `cache` - Memoization cache shared across resolutions
/// * `caller` - The enclosing method; required for [`SearchKind::Super`], ignored otherwise
///
/// # Returns
///
/// The resolved definition, or `None` when the receiver type, the definition, or (for
/// `Super`) the caller's superclass is not in scope. Misses are memoized too.
#[must_use]
pub fn resolve_method(
    scope: &Scope,
    reference: &MethodRef,
    search: SearchKind,
    cache: &ResolverCache,
    caller: Option<MethodId>,
) -> Option<MethodId> {
    let key = (reference.clone(), search);
    if let Some(memoized) = cache.entries.get(&key) {
        return *memoized;
    }

    let resolved = resolve_uncached(scope, reference, search, caller);
    cache.entries.insert(key, resolved);
    resolved
}

fn resolve_uncached(
    scope: &Scope,
    reference: &MethodRef,
    search: SearchKind,
    caller: Option<MethodId>,
) -> Option<MethodId> {
    match search {
        SearchKind::Static | SearchKind::Direct => {
            search_chain(scope, scope.class_of_type(reference.owner()), reference, true)
        }
        SearchKind::Virtual | SearchKind::Interface => {
            search_chain(scope, scope.class_of_type(reference.owner()), reference, false)
        }
        SearchKind::Super => {
            let caller = scope.method(caller?);
            let caller_class = scope.class_of_type(caller.owner())?;
            let parent_ty = scope.class(caller_class).super_class()?.clone();
            search_chain(scope, scope.class_of_type(&parent_ty), reference, false)
        }
    }
}

/// Walks the superclass chain from `start`, matching the reference's name and proto in the
/// direct or virtual method list of each class.
fn search_chain(
    scope: &Scope,
    start: Option<ClassId>,
    reference: &MethodRef,
    direct: bool,
) -> Option<MethodId> {
    let mut current = start;
    while let Some(class_id) = current {
        let found = if direct {
            scope.find_direct_method(class_id, reference.name(), reference.proto())
        } else {
            scope.find_virtual_method(class_id, reference.name(), reference.proto())
        };
        if found.is_some() {
            return found;
        }
        current = scope
            .class(class_id)
            .super_class()
            .and_then(|ty| scope.class_of_type(ty));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassAccess, DexType, Method, MethodAccess};

    /// `LBase;` declares virtual `f()V` and static `s()V`; `LDerived; extends LBase;`
    /// declares virtual `g()V`.
    fn fixture() -> (Scope, MethodId, MethodId, MethodId) {
        let mut scope = Scope::new();
        let base_ty = DexType::new("LBase;");
        let derived_ty = DexType::new("LDerived;");

        let base = scope.add_class_parts(base_ty.clone(), None, ClassAccess::PUBLIC);
        let derived =
            scope.add_class_parts(derived_ty.clone(), Some(base_ty.clone()), ClassAccess::PUBLIC);

        let base_f = scope.add_virtual_method(
            base,
            Method::new(base_ty.clone(), "f", "()V", MethodAccess::PUBLIC),
        );
        let base_s = scope.add_direct_method(
            base,
            Method::new(base_ty, "s", "()V", MethodAccess::PUBLIC | MethodAccess::STATIC),
        );
        let derived_g = scope.add_virtual_method(
            derived,
            Method::new(derived_ty, "g", "()V", MethodAccess::PUBLIC),
        );
        (scope, base_f, base_s, derived_g)
    }

    #[test]
    fn test_search_kind_from_opcode() {
        assert_eq!(
            SearchKind::from_opcode(Opcode::InvokeStatic),
            Some(SearchKind::Static)
        );
        assert_eq!(
            SearchKind::from_opcode(Opcode::InvokeSuper),
            Some(SearchKind::Super)
        );
        assert_eq!(SearchKind::from_opcode(Opcode::Nop), None);
    }

    #[test]
    fn test_resolve_virtual_in_declared_class() {
        let (scope, base_f, _, _) = fixture();
        let cache = ResolverCache::new();
        let reference = MethodRef::new(DexType::new("LBase;"), "f", "()V");

        assert_eq!(
            resolve_method(&scope, &reference, SearchKind::Virtual, &cache, None),
            Some(base_f)
        );
    }

    #[test]
    fn test_resolve_virtual_walks_hierarchy() {
        let (scope, base_f, _, _) = fixture();
        let cache = ResolverCache::new();
        // `f` referenced through the subclass resolves to the base definition.
        let reference = MethodRef::new(DexType::new("LDerived;"), "f", "()V");

        assert_eq!(
            resolve_method(&scope, &reference, SearchKind::Virtual, &cache, None),
            Some(base_f)
        );
    }

    #[test]
    fn test_resolve_static_ignores_virtual_list() {
        let (scope, _, base_s, _) = fixture();
        let cache = ResolverCache::new();

        let static_ref = MethodRef::new(DexType::new("LBase;"), "s", "()V");
        assert_eq!(
            resolve_method(&scope, &static_ref, SearchKind::Static, &cache, None),
            Some(base_s)
        );

        let virtual_as_static = MethodRef::new(DexType::new("LBase;"), "f", "()V");
        assert_eq!(
            resolve_method(&scope, &virtual_as_static, SearchKind::Static, &cache, None),
            None
        );
    }

    #[test]
    fn test_resolve_super_starts_at_caller_parent() {
        let (scope, base_f, _, derived_g) = fixture();
        let cache = ResolverCache::new();
        let reference = MethodRef::new(DexType::new("LBase;"), "f", "()V");

        assert_eq!(
            resolve_method(
                &scope,
                &reference,
                SearchKind::Super,
                &cache,
                Some(derived_g)
            ),
            Some(base_f)
        );
        // Without a caller there is no superclass to start from.
        assert_eq!(
            resolve_method(&scope, &reference, SearchKind::Super, &cache, None),
            None
        );
    }

    #[test]
    fn test_unknown_receiver_resolves_to_none() {
        let (scope, _, _, _) = fixture();
        let cache = ResolverCache::new();
        let reference = MethodRef::new(DexType::new("Lexternal/Type;"), "f", "()V");

        assert_eq!(
            resolve_method(&scope, &reference, SearchKind::Virtual, &cache, None),
            None
        );
        // The miss is memoized.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_memoizes_by_reference_and_kind() {
        let (scope, base_f, _, _) = fixture();
        let cache = ResolverCache::new();
        let reference = MethodRef::new(DexType::new("LBase;"), "f", "()V");

        assert!(cache.is_empty());
        let first = resolve_method(&scope, &reference, SearchKind::Virtual, &cache, None);
        assert_eq!(cache.len(), 1);
        let second = resolve_method(&scope, &reference, SearchKind::Virtual, &cache, None);
        assert_eq!(cache.len(), 1);
        assert_eq!(first, second);
        assert_eq!(first, Some(base_f));

        // A different search kind is a different cache entry.
        let _ = resolve_method(&scope, &reference, SearchKind::Static, &cache, None);
        assert_eq!(cache.len(), 2);
    }
}
