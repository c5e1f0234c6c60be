use std::fmt;

use serde::{Deserialize, Serialize};

use super::name::Name;

/// A reference to a type in a field, argument, or input field position.
///
/// Two references are equal iff their wrapper structure and innermost
/// name are equal: `[User!]` differs from `[User]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of")]
pub enum TypeRef {
    Named(Name),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a named type reference.
    pub fn named(name: Name) -> Self {
        Self::Named(name)
    }

    /// Wraps `inner` in a list.
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wraps `inner` in a non-null marker.
    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Returns the innermost named type.
    pub fn base_name(&self) -> &Name {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    /// Returns true if the outermost wrapper is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(s: &str) -> TypeRef {
        TypeRef::named(Name::new(s).unwrap())
    }

    #[test]
    fn display_wrappers() {
        let t = TypeRef::non_null(TypeRef::list(TypeRef::non_null(named("User"))));
        assert_eq!(t.to_string(), "[User!]!");
        assert_eq!(named("ID").to_string(), "ID");
    }

    #[test]
    fn structural_equality() {
        let a = TypeRef::list(TypeRef::non_null(named("User")));
        let b = TypeRef::non_null(TypeRef::list(named("User")));
        assert_ne!(a, b);
        assert_eq!(a, TypeRef::list(TypeRef::non_null(named("User"))));
    }

    #[test]
    fn base_name_unwraps() {
        let t = TypeRef::non_null(TypeRef::list(named("Post")));
        assert_eq!(t.base_name().as_str(), "Post");
        assert!(t.is_non_null());
    }
}
