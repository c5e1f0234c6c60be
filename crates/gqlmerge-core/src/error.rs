use std::fmt;

use crate::types::{DefinitionKind, OperationType};

/// A string that does not match the GraphQL name grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameError(pub String);

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid name '{}': must match [_A-Za-z][_0-9A-Za-z]*",
            self.0
        )
    }
}

impl std::error::Error for NameError {}

/// An irreconcilable difference between contributions to one definition.
///
/// Every variant names the definition's kind, its name (`None` only for the
/// schema block), and the sources that contributed the conflicting parts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeConflict {
    /// The same member was declared with a different type or argument list.
    FieldConflict {
        kind: DefinitionKind,
        type_name: String,
        field: String,
        detail: String,
        sources: Vec<String>,
    },

    /// Two directive definitions with the same name disagree.
    DirectiveConflict {
        name: String,
        detail: String,
        sources: Vec<String>,
    },

    /// Two schema blocks map one root operation to different types.
    SchemaConflict {
        operation: OperationType,
        types: Vec<String>,
        sources: Vec<String>,
    },

    /// An extension has no base definition anywhere in the inputs.
    DanglingExtension {
        kind: DefinitionKind,
        name: String,
        sources: Vec<String>,
    },

    /// One type name is declared as more than one kind.
    KindConflict {
        name: String,
        kinds: Vec<DefinitionKind>,
        sources: Vec<String>,
    },
}

impl MergeConflict {
    /// Returns the kind of the conflicting definition.
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::FieldConflict { kind, .. } | Self::DanglingExtension { kind, .. } => *kind,
            Self::DirectiveConflict { .. } => DefinitionKind::Directive,
            Self::SchemaConflict { .. } => DefinitionKind::Schema,
            Self::KindConflict { kinds, .. } => kinds.first().copied().unwrap_or(DefinitionKind::Object),
        }
    }

    /// Returns the name of the conflicting definition.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FieldConflict { type_name, .. } => Some(type_name),
            Self::DirectiveConflict { name, .. } | Self::KindConflict { name, .. } => Some(name),
            Self::DanglingExtension { name, .. } => (!name.is_empty()).then_some(name.as_str()),
            Self::SchemaConflict { .. } => None,
        }
    }

    /// Returns the names of the contributing sources.
    pub fn sources(&self) -> &[String] {
        match self {
            Self::FieldConflict { sources, .. }
            | Self::DirectiveConflict { sources, .. }
            | Self::SchemaConflict { sources, .. }
            | Self::DanglingExtension { sources, .. }
            | Self::KindConflict { sources, .. } => sources,
        }
    }

    /// A short machine-readable label for this conflict class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldConflict { .. } => "field_conflict",
            Self::DirectiveConflict { .. } => "directive_conflict",
            Self::SchemaConflict { .. } => "schema_conflict",
            Self::DanglingExtension { .. } => "dangling_extension",
            Self::KindConflict { .. } => "kind_conflict",
        }
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldConflict {
                kind,
                type_name,
                field,
                detail,
                sources,
            } => write!(
                f,
                "field conflict on {kind} {type_name}.{field}: {detail} (in {})",
                sources.join(", ")
            ),
            Self::DirectiveConflict {
                name,
                detail,
                sources,
            } => write!(
                f,
                "directive conflict on @{name}: {detail} (in {})",
                sources.join(", ")
            ),
            Self::SchemaConflict {
                operation,
                types,
                sources,
            } => write!(
                f,
                "schema conflict: {operation} is mapped to {} (in {})",
                types.join(" and "),
                sources.join(", ")
            ),
            Self::DanglingExtension {
                kind,
                name,
                sources,
            } => {
                write!(f, "dangling extension: extend {kind}")?;
                if !name.is_empty() {
                    write!(f, " {name}")?;
                }
                write!(f, " has no base definition (in {})", sources.join(", "))
            }
            Self::KindConflict {
                name,
                kinds,
                sources,
            } => {
                let kinds: Vec<&str> = kinds.iter().map(DefinitionKind::keyword).collect();
                write!(
                    f,
                    "kind conflict: '{name}' is declared as {} (in {})",
                    kinds.join(" and "),
                    sources.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for MergeConflict {}
