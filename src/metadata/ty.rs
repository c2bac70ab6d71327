//! Type identity for the DEX IR.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// An interned DEX type descriptor.
///
/// DEX identifies reference types by their descriptor string (`Lcom/example/Foo;`), and the
/// descriptor doubles as the class's declared name. `DexType` wraps the descriptor in an
/// [`Arc`] so clones are cheap and the value can serve as a hash-map key throughout the
/// analysis layers.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::metadata::DexType;
///
/// let ty = DexType::new("Lcom/example/Foo;");
/// assert_eq!(ty.descriptor(), "Lcom/example/Foo;");
/// assert_eq!(ty.clone(), ty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DexType(Arc<str>);

impl DexType {
    /// Creates a type identity from a descriptor string.
    #[must_use]
    pub fn new(descriptor: impl Into<Arc<str>>) -> Self {
        DexType(descriptor.into())
    }

    /// Returns the descriptor string (`Lcom/example/Foo;`).
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DexType {
    fn from(descriptor: &str) -> Self {
        DexType::new(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_identity() {
        let a = DexType::new("Lcom/example/Foo;");
        let b = DexType::from("Lcom/example/Foo;");
        let c = DexType::new("Lcom/example/Bar;");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_type_display() {
        let ty = DexType::new("Ljava/lang/Object;");
        assert_eq!(format!("{ty}"), "Ljava/lang/Object;");
        assert_eq!(ty.descriptor(), "Ljava/lang/Object;");
    }
}
