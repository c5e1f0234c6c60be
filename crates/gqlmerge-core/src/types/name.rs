use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// A validated GraphQL name matching `[_A-Za-z][_0-9A-Za-z]*`.
///
/// Names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Creates a new `Name`, validating the GraphQL name grammar.
    pub fn new(s: impl Into<String>) -> Result<Self, NameError> {
        let s = s.into();
        if !is_valid_name(&s) {
            return Err(NameError(s));
        }
        Ok(Self(s))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `s` is a valid GraphQL name.
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Name> for String {
    fn from(n: Name) -> String {
        n.0
    }
}

impl TryFrom<String> for Name {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["User", "_private", "a", "__typename", "Query2", "snake_case", "ID"] {
            assert!(Name::new(name).is_ok(), "expected valid: {name}");
        }
    }

    #[test]
    fn invalid_names() {
        for name in ["", "1User", "my-type", "has space", "é", "$var"] {
            assert!(Name::new(name).is_err(), "expected invalid: {name}");
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_ne!(Name::new("user").unwrap(), Name::new("User").unwrap());
    }

    #[test]
    fn compares_with_str() {
        let name = Name::new("User").unwrap();
        assert_eq!(name, "User");
        assert_eq!(name.as_str(), "User");
        assert_eq!(name.to_string(), "User");
    }

    #[test]
    fn serde_roundtrip() {
        let name = Name::new("User").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"User\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }

    #[test]
    fn serde_rejects_invalid() {
        assert!(serde_json::from_str::<Name>("\"not-a-name\"").is_err());
    }
}
