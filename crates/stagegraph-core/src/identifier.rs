//! Stage and transition identifiers.
//!
//! Workflow descriptions name stages and transitions with free-form strings.
//! Each graph copies the names it accepts into [`Id`]s, which share their text
//! through reference counting. Nothing is kept once the graph and the layouts
//! built from it are dropped, so a long-running host can lay out any number of
//! descriptions without accumulating names.

use std::{borrow::Borrow, fmt, sync::Arc};

use serde::{Serialize, Serializer};

/// Identifier of a stage or transition.
///
/// Cloning shares the underlying text. Equality, ordering and hashing follow
/// the text, and `Id` borrows as `str`, so maps keyed by `Id` can be queried
/// with plain string slices.
///
/// # Examples
///
/// ```
/// use stagegraph_core::identifier::Id;
///
/// let browse = Id::new("browse");
/// let again = browse.clone();
///
/// assert_eq!(browse, again);
/// assert_eq!(browse, "browse");
/// assert_eq!(browse.to_string(), "browse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(Arc<str>);

impl Id {
    /// Creates an `Id` holding a copy of `name`.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the identifier was created from an empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("checkout");
        let id2 = Id::new("checkout");
        let id3 = Id::new("payment");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_to_string() {
        let id = Id::new("browse_catalog");
        assert_eq!(id.to_string(), "browse_catalog");
        assert_eq!(id.as_str(), "browse_catalog");
    }

    #[test]
    fn test_str_comparison() {
        let id = Id::new("cart");
        assert!(id == "cart");
        assert!(id != "carts");
    }

    #[test]
    fn test_from_conversions() {
        let id: Id = "review".into();
        assert_eq!(id, Id::new("review"));

        let owned: Id = String::from("review").into();
        assert_eq!(owned, id);
    }

    #[test]
    fn test_is_empty() {
        assert!(Id::new("").is_empty());
        assert!(!Id::new("x").is_empty());
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Id::new("ship"), 3);

        assert_eq!(map.get("ship"), Some(&3));
        assert_eq!(map.get("deliver"), None);
    }

    #[test]
    fn test_clones_share_text() {
        let id = Id::new("pack");
        let clone = id.clone();
        assert!(Arc::ptr_eq(&id.0, &clone.0));
    }

    #[test]
    fn test_serialize_as_string() {
        let id = Id::new("ship → deliver");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ship → deliver\"");
    }
}
