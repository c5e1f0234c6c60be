use std::fmt;

/// A byte-offset span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Converts the start offset into a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = self.start.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors that occur while lexing or parsing one SDL document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdlError {
    /// The lexer met a character no token rule accepts.
    InvalidToken { span: Span },

    /// A `"` string ran into a line break or the end of input.
    UnterminatedString { span: Span },

    /// A `"""` block string never closed.
    UnterminatedBlockString { span: Span },

    /// A string contains an escape sequence GraphQL does not define.
    InvalidEscape { sequence: String, span: Span },

    /// The parser encountered an unexpected token.
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    /// The parser reached the end of input when more tokens were expected.
    UnexpectedEndOfInput { expected: String, span: Span },

    /// An executable definition appeared in a type-system document.
    UnsupportedOperation { keyword: String, span: Span },

    /// A member name repeats inside one definition.
    DuplicateMember {
        member: &'static str,
        name: String,
        owner: String,
        span: Span,
    },

    /// A second `schema` block appeared in the same document.
    DuplicateSchema { span: Span },

    /// A directive definition names a location that does not exist.
    UnknownDirectiveLocation { name: String, span: Span },

    /// An enum value is spelled `true`, `false` or `null`.
    ReservedEnumValue { name: String, span: Span },

    /// List types or values nest deeper than the parser allows.
    NestingTooDeep { limit: usize, span: Span },
}

impl SdlError {
    /// Returns the source span this error points at.
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidToken { span }
            | Self::UnterminatedString { span }
            | Self::UnterminatedBlockString { span }
            | Self::InvalidEscape { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::UnsupportedOperation { span, .. }
            | Self::DuplicateMember { span, .. }
            | Self::DuplicateSchema { span }
            | Self::UnknownDirectiveLocation { span, .. }
            | Self::ReservedEnumValue { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    /// A short hint for diagnostics, where one helps.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedOperation { .. } => {
                Some("only type-system definitions can be merged; move operations to a separate file")
            }
            Self::DuplicateSchema { .. } => {
                Some("use `extend schema` to add to an existing schema block")
            }
            Self::UnterminatedBlockString { .. } => Some("close the block string with \"\"\""),
            Self::ReservedEnumValue { .. } => Some("rename the enum value"),
            Self::NestingTooDeep { .. } => Some("flatten the nested list type or value"),
            _ => None,
        }
    }
}

impl fmt::Display for SdlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { span } => write!(f, "invalid token at {span}"),
            Self::UnterminatedString { span } => write!(f, "unterminated string at {span}"),
            Self::UnterminatedBlockString { span } => {
                write!(f, "unterminated block string at {span}")
            }
            Self::InvalidEscape { sequence, span } => {
                write!(f, "invalid escape sequence '{sequence}' at {span}")
            }
            Self::UnexpectedToken {
                expected,
                found,
                span,
            } => {
                write!(
                    f,
                    "unexpected token at {span}: expected {expected}, found {found}"
                )
            }
            Self::UnexpectedEndOfInput { expected, .. } => {
                write!(f, "unexpected end of input: expected {expected}")
            }
            Self::UnsupportedOperation { keyword, span } => {
                write!(f, "operations are not supported: found '{keyword}' at {span}")
            }
            Self::DuplicateMember {
                member,
                name,
                owner,
                span,
            } => {
                write!(f, "duplicate {member} '{name}' in {owner} at {span}")
            }
            Self::DuplicateSchema { span } => {
                write!(f, "more than one schema definition in this document at {span}")
            }
            Self::UnknownDirectiveLocation { name, span } => {
                write!(f, "unknown directive location '{name}' at {span}")
            }
            Self::ReservedEnumValue { name, span } => {
                write!(f, "enum value '{name}' at {span} is reserved")
            }
            Self::NestingTooDeep { limit, span } => {
                write!(f, "nesting deeper than {limit} levels at {span}")
            }
        }
    }
}

impl std::error::Error for SdlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_is_one_based() {
        let source = "type A\n  b: Int\n";
        assert_eq!(Span::new(0, 4).line_col(source), (1, 1));
        assert_eq!(Span::new(9, 10).line_col(source), (2, 3));
    }

    #[test]
    fn line_col_counts_characters() {
        let source = "\"é\" x";
        assert_eq!(Span::new(5, 6).line_col(source), (1, 5));
    }

    #[test]
    fn line_col_clamps_past_end() {
        assert_eq!(Span::new(100, 100).line_col("ab\nc"), (2, 2));
    }

    #[test]
    fn display_names_the_member() {
        let err = SdlError::DuplicateMember {
            member: "field",
            name: "id".into(),
            owner: "type User".into(),
            span: Span::new(3, 5),
        };
        assert_eq!(err.to_string(), "duplicate field 'id' in type User at 3..5");
        assert_eq!(err.span(), Span::new(3, 5));
    }

    #[test]
    fn unsupported_operation_has_help() {
        let err = SdlError::UnsupportedOperation {
            keyword: "query".into(),
            span: Span::default(),
        };
        assert!(err.to_string().contains("operations are not supported"));
        assert!(err.help().is_some());
    }
}
