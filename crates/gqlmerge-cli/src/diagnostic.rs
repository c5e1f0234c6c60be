use miette::{Diagnostic, NamedSource, SourceSpan};
use gqlmerge_sdl::{ParseError, SdlError, Span};

/// A diagnostic wrapping a located `SdlError` for rich miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct SdlDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

fn source_span(span: Span, source: &str) -> SourceSpan {
    let start = span.start.min(source.len());
    let len = span.end.min(source.len()).saturating_sub(start);
    (start, len).into()
}

/// Convert a `ParseError` into a miette `SdlDiagnostic`.
pub fn parse_error_to_diagnostic(error: &ParseError, source: &str) -> SdlDiagnostic {
    let named_src = NamedSource::new(&error.source, source.to_string());
    let span = source_span(error.span, source);
    let help = error.error.help().map(str::to_string);

    let (message, label, suggestion) = match &error.error {
        SdlError::InvalidToken { .. } => (
            "invalid token".to_string(),
            "unrecognized character".to_string(),
            Some("Check for typos or unsupported characters.".to_string()),
        ),

        SdlError::UnterminatedString { .. } => (
            "unterminated string".to_string(),
            "string starts here".to_string(),
            Some("Close the string with '\"' before the end of the line.".to_string()),
        ),

        SdlError::InvalidEscape { sequence, .. } => (
            format!("invalid escape sequence '{sequence}'"),
            "unknown escape".to_string(),
            Some("Use one of \\\" \\\\ \\/ \\b \\f \\n \\r \\t \\uXXXX.".to_string()),
        ),

        SdlError::UnexpectedToken {
            expected, found, ..
        } => (
            format!("unexpected token: expected {expected}, found {found}"),
            format!("expected {expected}"),
            help,
        ),

        SdlError::UnexpectedEndOfInput { expected, .. } => (
            format!("unexpected end of input: expected {expected}"),
            "input ended here".to_string(),
            Some(format!("Add {expected} to complete the definition.")),
        ),

        SdlError::UnsupportedOperation { keyword, .. } => (
            format!("'{keyword}' operations cannot be merged"),
            "executable definition".to_string(),
            help,
        ),

        SdlError::DuplicateMember {
            member,
            name,
            owner,
            ..
        } => (
            format!("duplicate {member} '{name}' in {owner}"),
            "already defined above".to_string(),
            Some("Remove the duplicate or rename one of them.".to_string()),
        ),

        SdlError::DuplicateSchema { .. } => (
            "more than one schema definition in this document".to_string(),
            "second schema block".to_string(),
            help,
        ),

        SdlError::UnknownDirectiveLocation { name, .. } => (
            format!("unknown directive location '{name}'"),
            "not a directive location".to_string(),
            Some("Locations are upper-case names such as OBJECT or FIELD_DEFINITION.".to_string()),
        ),

        // Remaining variants carry their own help text.
        other => (other.to_string(), "here".to_string(), help),
    };

    SdlDiagnostic {
        src: named_src,
        span,
        message,
        label,
        suggestion,
    }
}

/// Render parse errors using miette.
///
/// `source_of` looks up the text of the document an error belongs to.
pub fn render_diagnostics<'a>(
    errors: &[ParseError],
    source_of: impl Fn(&str) -> Option<&'a str>,
) -> Vec<miette::Report> {
    errors
        .iter()
        .map(|e| {
            let source = source_of(&e.source).unwrap_or_default();
            miette::Report::new(parse_error_to_diagnostic(e, source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlmerge_sdl::MergeError;

    fn errors_for(source: &str) -> Vec<ParseError> {
        match gqlmerge_sdl::merge("\n", &[("test.graphql", source)]) {
            Err(MergeError::Parse(errors)) => errors,
            other => panic!("expected parse errors, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_token_diagnostic() {
        let source = "type User {\n  id ID\n}";
        let errors = errors_for(source);
        let diag = parse_error_to_diagnostic(&errors[0], source);
        assert!(diag.message.contains("unexpected token"));
        assert!(diag.label.starts_with("expected"));
    }

    #[test]
    fn unexpected_end_of_input_diagnostic() {
        let source = "type User {";
        let errors = errors_for(source);
        let diag = parse_error_to_diagnostic(&errors[0], source);
        assert!(diag.message.contains("unexpected end"));
        assert!(diag.suggestion.is_some());
    }

    #[test]
    fn operation_diagnostic_carries_help() {
        let source = "query { me }";
        let errors = errors_for(source);
        let diag = parse_error_to_diagnostic(&errors[0], source);
        assert!(diag.message.contains("query"));
        assert!(diag.suggestion.as_deref().unwrap().contains("separate file"));
    }

    #[test]
    fn duplicate_member_diagnostic() {
        let source = "type User { id: ID id: ID }";
        let errors = errors_for(source);
        let diag = parse_error_to_diagnostic(&errors[0], source);
        assert!(diag.message.contains("duplicate"));
        assert!(diag.label.contains("already defined"));
    }

    #[test]
    fn span_is_clamped_to_source() {
        let span = source_span(Span::new(10, 20), "short");
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn render_diagnostics_produces_reports() {
        let source = "type {\nscalar";
        let errors = errors_for(source);
        let reports = render_diagnostics(&errors, |_| Some(source));
        assert_eq!(reports.len(), errors.len());
        assert!(!reports.is_empty());
    }
}
