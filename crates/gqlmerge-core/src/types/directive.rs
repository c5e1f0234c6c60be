use std::fmt;

use serde::{Deserialize, Serialize};

use super::name::Name;
use super::value::Value;

/// A named argument in a directive application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
}

/// A directive application such as `@key(fields: "id")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directive {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

impl Directive {
    /// Creates a directive application without arguments.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            arguments: Vec::new(),
        }
    }

    /// Creates a directive application with arguments.
    pub fn with_arguments(name: Name, arguments: Vec<Argument>) -> Self {
        Self { name, arguments }
    }

    /// Looks up an argument value by name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|a| a.name.as_str() == name)
            .map(|a| &a.value)
    }

    /// Returns true if both applications have the same name and the same
    /// arguments, in any order.
    pub fn same_application(&self, other: &Directive) -> bool {
        self.name == other.name
            && self.arguments.len() == other.arguments.len()
            && self
                .arguments
                .iter()
                .all(|a| other.argument(a.name.as_str()) == Some(&a.value))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", arg.name, arg.value)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// How directive applications from a later contribution join an earlier list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveUnion {
    /// An application is skipped only when one with the same name and
    /// arguments, in any order, is already present.
    ByApplication,
    /// An application is skipped when any application of the same name is
    /// already present.
    ByName,
}

/// Appends the applications in `incoming` that `existing` does not already
/// carry, keeping first-seen order.
pub fn union_directives(existing: &mut Vec<Directive>, incoming: &[Directive], mode: DirectiveUnion) {
    for directive in incoming {
        let present = match mode {
            DirectiveUnion::ByApplication => {
                existing.iter().any(|d| d.same_application(directive))
            }
            DirectiveUnion::ByName => existing.iter().any(|d| d.name == directive.name),
        };
        if !present {
            existing.push(directive.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn deprecated(reason: &str) -> Directive {
        Directive::with_arguments(
            name("deprecated"),
            vec![Argument {
                name: name("reason"),
                value: Value::String(reason.into()),
            }],
        )
    }

    #[test]
    fn display_without_arguments() {
        assert_eq!(Directive::new(name("external")).to_string(), "@external");
    }

    #[test]
    fn display_with_arguments() {
        assert_eq!(deprecated("old").to_string(), r#"@deprecated(reason: "old")"#);
    }

    #[test]
    fn argument_lookup() {
        let d = deprecated("old");
        assert_eq!(d.argument("reason"), Some(&Value::String("old".into())));
        assert_eq!(d.argument("missing"), None);
    }

    #[test]
    fn union_by_application_collapses_identical() {
        let mut existing = vec![deprecated("a")];
        union_directives(
            &mut existing,
            &[deprecated("a"), deprecated("b")],
            DirectiveUnion::ByApplication,
        );
        assert_eq!(existing, vec![deprecated("a"), deprecated("b")]);
    }

    #[test]
    fn union_by_application_ignores_argument_order() {
        let arg = |n: &str, v: &str| Argument {
            name: name(n),
            value: Value::Int(v.into()),
        };
        let ab = Directive::with_arguments(name("k"), vec![arg("a", "1"), arg("b", "2")]);
        let ba = Directive::with_arguments(name("k"), vec![arg("b", "2"), arg("a", "1")]);
        let other = Directive::with_arguments(name("k"), vec![arg("a", "1"), arg("b", "3")]);

        let mut existing = vec![ab.clone()];
        union_directives(&mut existing, &[ba, other.clone()], DirectiveUnion::ByApplication);
        assert_eq!(existing, vec![ab, other]);
    }

    #[test]
    fn union_by_name_keeps_first_application() {
        let mut existing = vec![deprecated("a")];
        union_directives(
            &mut existing,
            &[deprecated("b"), Directive::new(name("tag"))],
            DirectiveUnion::ByName,
        );
        assert_eq!(existing, vec![deprecated("a"), Directive::new(name("tag"))]);
    }
}
