//! Inliner configuration and its scope-population pass.
//!
//! The inliner's allow/deny decisions are driven by configuration: class-name prefixes
//! that sort types into category sets, and annotation types that pin individual methods.
//! [`InlinerConfig::populate`] walks the scope once to turn the configured strings into
//! resolved type sets and per-method flags.

use log::debug;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::metadata::{DexType, Scope};

/// Configuration for the method inliner.
///
/// The string lists come from the deserialized pass configuration; the resolved type sets
/// and per-method flags are produced by [`populate`](Self::populate).
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::config::InlinerConfig;
///
/// let mut config: InlinerConfig = serde_json::from_str(r#"{
///     "blocklist": ["Landroidx/"],
///     "no_inline_annos": ["Lcom/example/DoNotInline;"]
/// }"#)?;
/// config.populate(&scope);
/// assert!(config.blocklist_types().len() > 0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InlinerConfig {
    blocklist: Vec<String>,
    caller_blocklist: Vec<String>,
    intradex_allowlist: Vec<String>,
    no_inline_annos: Vec<DexType>,
    force_inline_annos: Vec<DexType>,

    #[serde(skip)]
    populated: bool,
    #[serde(skip)]
    blocklist_types: FxHashSet<DexType>,
    #[serde(skip)]
    caller_blocklist_types: FxHashSet<DexType>,
    #[serde(skip)]
    intradex_allowlist_types: FxHashSet<DexType>,
}

impl InlinerConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        InlinerConfig::default()
    }

    /// Adds a class-name prefix whose classes must never be inlined into callers.
    pub fn add_blocklist_prefix(&mut self, prefix: impl Into<String>) {
        self.blocklist.push(prefix.into());
    }

    /// Adds a class-name prefix whose classes must never have code inlined into them.
    pub fn add_caller_blocklist_prefix(&mut self, prefix: impl Into<String>) {
        self.caller_blocklist.push(prefix.into());
    }

    /// Adds a class-name prefix allowed to participate in intra-dex inlining.
    pub fn add_intradex_allowlist_prefix(&mut self, prefix: impl Into<String>) {
        self.intradex_allowlist.push(prefix.into());
    }

    /// Adds an annotation type that forbids inlining of annotated methods or of every
    /// method of an annotated class.
    pub fn add_no_inline_annotation(&mut self, anno: DexType) {
        self.no_inline_annos.push(anno);
    }

    /// Adds an annotation type that requests unconditional inlining of annotated methods.
    pub fn add_force_inline_annotation(&mut self, anno: DexType) {
        self.force_inline_annos.push(anno);
    }

    /// Resolves the configuration against a scope.
    ///
    /// Two walks:
    ///
    /// 1. A class walk sorts each class into the category sets by name prefix, and sets
    ///    *don't-inline* on every direct and virtual method of classes carrying a
    ///    no-inline annotation.
    /// 2. A parallel method walk applies method-level annotations, with *don't-inline*
    ///    taking precedence over *force-inline*.
    ///
    /// Idempotent: invocations after the first return immediately.
    pub fn populate(&mut self, scope: &Scope) {
        if self.populated {
            return;
        }

        for (_, class) in scope.classes() {
            let name = class.name();
            if self.blocklist.iter().any(|p| name.starts_with(p.as_str())) {
                self.blocklist_types.insert(class.ty().clone());
            }
            if self
                .caller_blocklist
                .iter()
                .any(|p| name.starts_with(p.as_str()))
            {
                self.caller_blocklist_types.insert(class.ty().clone());
            }
            if self
                .intradex_allowlist
                .iter()
                .any(|p| name.starts_with(p.as_str()))
            {
                self.intradex_allowlist_types.insert(class.ty().clone());
            }
            // A no-inline annotation on the class pins every one of its methods.
            if has_any_annotation(class.annotations(), &self.no_inline_annos) {
                for &method in class
                    .direct_methods()
                    .iter()
                    .chain(class.virtual_methods())
                {
                    scope.method(method).rstate().set_dont_inline();
                }
            }
        }

        scope.par_methods(|_, method| {
            if method.rstate().dont_inline() {
                return;
            }
            if has_any_annotation(method.annotations(), &self.no_inline_annos) {
                method.rstate().set_dont_inline();
            } else if has_any_annotation(method.annotations(), &self.force_inline_annos) {
                method.rstate().set_force_inline();
            }
        });

        self.populated = true;
        debug!(
            "inliner config: {} blocked, {} caller-blocked, {} intradex-allowed types",
            self.blocklist_types.len(),
            self.caller_blocklist_types.len(),
            self.intradex_allowlist_types.len()
        );
    }

    /// Types whose methods must never be inlined into callers.
    #[must_use]
    pub fn blocklist_types(&self) -> &FxHashSet<DexType> {
        &self.blocklist_types
    }

    /// Types that must never have code inlined into them.
    #[must_use]
    pub fn caller_blocklist_types(&self) -> &FxHashSet<DexType> {
        &self.caller_blocklist_types
    }

    /// Types allowed to participate in intra-dex inlining.
    #[must_use]
    pub fn intradex_allowlist_types(&self) -> &FxHashSet<DexType> {
        &self.intradex_allowlist_types
    }
}

fn has_any_annotation(annotations: &[DexType], wanted: &[DexType]) -> bool {
    annotations.iter().any(|a| wanted.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassAccess, DexClass, Method, MethodAccess, MethodId};

    fn config() -> InlinerConfig {
        let mut config = InlinerConfig::new();
        config.add_blocklist_prefix("Landroidx/");
        config.add_caller_blocklist_prefix("Lcom/vendor/");
        config.add_intradex_allowlist_prefix("Lcom/app/");
        config.add_no_inline_annotation(DexType::new("Lcom/app/DoNotInline;"));
        config.add_force_inline_annotation(DexType::new("Lcom/app/ForceInline;"));
        config
    }

    fn scope() -> (Scope, MethodId, MethodId, MethodId, MethodId) {
        let mut scope = Scope::new();

        let androidx = scope.add_class_parts(
            DexType::new("Landroidx/core/View;"),
            None,
            ClassAccess::PUBLIC,
        );
        let plain = scope.add_direct_method(
            androidx,
            Method::new(
                DexType::new("Landroidx/core/View;"),
                "plain",
                "()V",
                MethodAccess::PUBLIC,
            ),
        );

        // A class pinned wholesale by its no-inline annotation.
        let pinned_ty = DexType::new("Lcom/app/Pinned;");
        let pinned = scope.add_class(
            DexClass::new(pinned_ty.clone(), None, ClassAccess::PUBLIC)
                .with_annotations(vec![DexType::new("Lcom/app/DoNotInline;")]),
        );
        let pinned_direct = scope.add_direct_method(
            pinned,
            Method::new(pinned_ty.clone(), "d", "()V", MethodAccess::PUBLIC),
        );
        let pinned_virtual = scope.add_virtual_method(
            pinned,
            // Force-inline on a method of a pinned class must lose to the class pin.
            Method::new(pinned_ty, "v", "()V", MethodAccess::PUBLIC)
                .with_annotations(vec![DexType::new("Lcom/app/ForceInline;")]),
        );

        let app_ty = DexType::new("Lcom/app/Main;");
        let app = scope.add_class_parts(app_ty.clone(), None, ClassAccess::PUBLIC);
        let forced = scope.add_direct_method(
            app,
            Method::new(app_ty, "hot", "()V", MethodAccess::PUBLIC)
                .with_annotations(vec![DexType::new("Lcom/app/ForceInline;")]),
        );

        (scope, plain, pinned_direct, pinned_virtual, forced)
    }

    #[test]
    fn test_prefix_category_sets() {
        let (scope, _, _, _, _) = scope();
        let mut config = config();
        config.populate(&scope);

        assert!(config
            .blocklist_types()
            .contains(&DexType::new("Landroidx/core/View;")));
        assert!(config.caller_blocklist_types().is_empty());
        assert!(config
            .intradex_allowlist_types()
            .contains(&DexType::new("Lcom/app/Main;")));
        assert!(config
            .intradex_allowlist_types()
            .contains(&DexType::new("Lcom/app/Pinned;")));
    }

    #[test]
    fn test_class_annotation_pins_all_methods() {
        let (scope, plain, pinned_direct, pinned_virtual, _) = scope();
        let mut config = config();
        config.populate(&scope);

        assert!(scope.method(pinned_direct).rstate().dont_inline());
        assert!(scope.method(pinned_virtual).rstate().dont_inline());
        assert!(!scope.method(plain).rstate().dont_inline());
    }

    #[test]
    fn test_dont_inline_takes_precedence_over_force_inline() {
        let (scope, _, _, pinned_virtual, forced) = scope();
        let mut config = config();
        config.populate(&scope);

        let pinned = scope.method(pinned_virtual).rstate();
        assert!(pinned.dont_inline());
        assert!(!pinned.force_inline());

        let hot = scope.method(forced).rstate();
        assert!(hot.force_inline());
        assert!(!hot.dont_inline());
    }

    #[test]
    fn test_populate_is_idempotent() {
        let (scope, _, _, _, _) = scope();
        let mut config = config();
        config.populate(&scope);
        let first = config.blocklist_types().clone();

        // Repeated population with the scope unchanged must be a no-op.
        config.populate(&scope);
        config.populate(&scope);
        assert_eq!(config.blocklist_types(), &first);
    }
}
