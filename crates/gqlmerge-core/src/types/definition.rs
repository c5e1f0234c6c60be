use std::fmt;

use serde::{Deserialize, Serialize};

use super::description::Description;
use super::directive::Directive;
use super::field::{EnumValueDefinition, FieldDefinition, InputValueDefinition};
use super::location::{DirectiveLocation, OperationType};
use super::name::Name;

/// `scalar Name @directives`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// The body of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Name>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// Interfaces share the object body layout.
pub type InterfaceType = ObjectType;

impl ObjectType {
    /// Creates an empty type body.
    pub fn new(name: Name) -> Self {
        Self {
            description: None,
            name,
            interfaces: Vec::new(),
            directives: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name.as_str() == name)
    }
}

/// `union Name = A | B`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub members: Vec<Name>,
}

/// `enum Name { A B }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub values: Vec<EnumValueDefinition>,
}

impl EnumType {
    /// Looks up an enum value by name.
    pub fn value(&self, name: &str) -> Option<&EnumValueDefinition> {
        self.values.iter().find(|v| v.name.as_str() == name)
    }
}

/// `input Name { field: Type = default }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputObjectType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub fields: Vec<InputValueDefinition>,
}

impl InputObjectType {
    /// Looks up an input field by name.
    pub fn field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.iter().find(|f| f.name.as_str() == name)
    }
}

/// `directive @name(args) repeatable on LOCATION | LOCATION`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValueDefinition>,
    #[serde(default)]
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

/// `query: Query` inside a `schema` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOperation {
    pub operation: OperationType,
    pub named_type: Name,
}

/// The anonymous `schema { … }` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub root_operations: Vec<RootOperation>,
}

impl SchemaDefinition {
    /// Returns the type mapped to `operation`, if any.
    pub fn root(&self, operation: OperationType) -> Option<&Name> {
        self.root_operations
            .iter()
            .find(|r| r.operation == operation)
            .map(|r| &r.named_type)
    }
}

/// One top-level declaration in an SDL document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "definition", rename_all = "snake_case")]
pub enum Definition {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
    Directive(DirectiveDefinition),
    Schema(SchemaDefinition),
    /// `extend …`; wraps the body of the extended kind. Never wraps a
    /// directive definition or another extension.
    Extension(Box<Definition>),
}

impl Definition {
    /// Returns the kind of this definition, looking through extensions.
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Scalar(_) => DefinitionKind::Scalar,
            Self::Object(_) => DefinitionKind::Object,
            Self::Interface(_) => DefinitionKind::Interface,
            Self::Union(_) => DefinitionKind::Union,
            Self::Enum(_) => DefinitionKind::Enum,
            Self::InputObject(_) => DefinitionKind::InputObject,
            Self::Directive(_) => DefinitionKind::Directive,
            Self::Schema(_) => DefinitionKind::Schema,
            Self::Extension(inner) => inner.kind(),
        }
    }

    /// Returns the name of this definition; `None` for schema blocks.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Scalar(d) => Some(&d.name),
            Self::Object(d) | Self::Interface(d) => Some(&d.name),
            Self::Union(d) => Some(&d.name),
            Self::Enum(d) => Some(&d.name),
            Self::InputObject(d) => Some(&d.name),
            Self::Directive(d) => Some(&d.name),
            Self::Schema(_) => None,
            Self::Extension(inner) => inner.name(),
        }
    }

    pub fn description(&self) -> Option<&Description> {
        match self {
            Self::Scalar(d) => d.description.as_ref(),
            Self::Object(d) | Self::Interface(d) => d.description.as_ref(),
            Self::Union(d) => d.description.as_ref(),
            Self::Enum(d) => d.description.as_ref(),
            Self::InputObject(d) => d.description.as_ref(),
            Self::Directive(d) => d.description.as_ref(),
            Self::Schema(d) => d.description.as_ref(),
            Self::Extension(_) => None,
        }
    }

    /// Returns true for `extend …` definitions.
    pub fn is_extension(&self) -> bool {
        matches!(self, Self::Extension(_))
    }

    /// Returns the index key this definition groups under.
    pub fn key(&self) -> DefinitionKey {
        let type_key = |name: &Name| DefinitionKey::Type {
            kind: self.kind(),
            name: name.clone(),
        };
        match self {
            Self::Scalar(d) => type_key(&d.name),
            Self::Object(d) | Self::Interface(d) => type_key(&d.name),
            Self::Union(d) => type_key(&d.name),
            Self::Enum(d) => type_key(&d.name),
            Self::InputObject(d) => type_key(&d.name),
            Self::Directive(d) => DefinitionKey::Directive(d.name.clone()),
            Self::Schema(_) => DefinitionKey::Schema,
            Self::Extension(inner) => inner.key(),
        }
    }
}

/// The closed set of definition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Directive,
    Schema,
}

impl DefinitionKind {
    /// Returns the SDL keyword introducing this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "type",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input",
            Self::Directive => "directive",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The identity under which contributions are grouped.
///
/// Named types and directive definitions live in separate namespaces; the
/// schema block is a singleton.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DefinitionKey {
    Type { kind: DefinitionKind, name: Name },
    Directive(Name),
    Schema,
}

impl DefinitionKey {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Type { kind, .. } => *kind,
            Self::Directive(_) => DefinitionKind::Directive,
            Self::Schema => DefinitionKind::Schema,
        }
    }

    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Type { name, .. } | Self::Directive(name) => Some(name),
            Self::Schema => None,
        }
    }
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { kind, name } => write!(f, "{kind} {name}"),
            Self::Directive(name) => write!(f, "directive @{name}"),
            Self::Schema => f.write_str("schema"),
        }
    }
}
