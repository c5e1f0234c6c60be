use serde::{Deserialize, Serialize};

use super::description::Description;
use super::directive::Directive;
use super::name::Name;
use super::type_ref::TypeRef;
use super::value::Value;

/// An argument definition or an input object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValueDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl InputValueDefinition {
    /// Creates an input value with no description, default, or directives.
    pub fn new(name: Name, ty: TypeRef) -> Self {
        Self {
            description: None,
            name,
            ty,
            default_value: None,
            directives: Vec::new(),
        }
    }
}

/// A field on an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValueDefinition>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// Creates a field with no arguments, description, or directives.
    pub fn new(name: Name, ty: TypeRef) -> Self {
        Self {
            description: None,
            name,
            arguments: Vec::new(),
            ty,
            directives: Vec::new(),
        }
    }

    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|a| a.name.as_str() == name)
    }

    /// Returns true if both argument lists declare the same `(name, type)`
    /// pairs, regardless of order.
    pub fn same_signature(&self, other: &FieldDefinition) -> bool {
        same_argument_signature(&self.arguments, &other.arguments)
    }
}

/// Compares two argument lists as sets of `(name, type)` pairs.
pub fn same_argument_signature(a: &[InputValueDefinition], b: &[InputValueDefinition]) -> bool {
    a.len() == b.len()
        && a.iter().all(|arg| {
            b.iter()
                .any(|other| other.name == arg.name && other.ty == arg.ty)
        })
}

/// A value in an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

impl EnumValueDefinition {
    pub fn new(name: Name) -> Self {
        Self {
            description: None,
            name,
            directives: Vec::new(),
        }
    }
}
