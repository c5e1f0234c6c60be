use std::fmt;

use rayon::prelude::*;

use gqlmerge_core::{
    resolve, Definition, DefinitionIndex, DescriptionPolicy, MergeConflict, MergeOptions,
    MergedSchema,
};

use crate::error::{SdlError, Span};
use crate::parser::parse;
use crate::printer::{print_with, PrintOptions};

/// A syntax error located in one named input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Name of the document, as given by the caller.
    pub source: String,
    /// 1-based line of the error.
    pub line: usize,
    /// 1-based column of the error, in characters.
    pub column: usize,
    pub message: String,
    pub span: Span,
    pub error: SdlError,
}

impl ParseError {
    fn new(source: &str, text: &str, error: SdlError) -> Self {
        let span = error.span();
        let (line, column) = span.line_col(text);
        Self {
            source: source.to_string(),
            line,
            column,
            message: error.to_string(),
            span,
            error,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.source, self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Why a merge produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeError {
    /// One or more documents failed to parse; every error of every failing
    /// document is listed.
    Parse(Vec<ParseError>),

    /// The documents parsed but disagree; every conflict is listed.
    Conflicts(Vec<MergeConflict>),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(errors) => {
                write!(f, "{} parse error(s)", errors.len())?;
                for error in errors {
                    write!(f, "\n  {error}")?;
                }
                Ok(())
            }
            Self::Conflicts(conflicts) => {
                write!(f, "{} merge conflict(s)", conflicts.len())?;
                for conflict in conflicts {
                    write!(f, "\n  {conflict}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MergeError {}

/// Configurable merge engine.
///
/// Each call builds and discards its own index, so one `Merger` can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Merger {
    print: PrintOptions,
    options: MergeOptions,
    parallel: bool,
}

impl Default for Merger {
    fn default() -> Self {
        Self {
            print: PrintOptions::default(),
            options: MergeOptions::default(),
            parallel: true,
        }
    }
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text placed between top-level blocks.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.print.separator = separator.into();
        self
    }

    /// Sets the indentation width in spaces.
    pub fn indent(mut self, width: usize) -> Self {
        self.print.indent = " ".repeat(width);
        self
    }

    pub fn description_policy(mut self, policy: DescriptionPolicy) -> Self {
        self.options.description_policy = policy;
        self
    }

    /// Parses documents on the rayon pool when enabled.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Merges `(name, text)` documents and prints the result.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::Parse` if any document fails to parse, otherwise
    /// `MergeError::Conflicts` if the documents cannot be reconciled.
    pub fn merge<N, T>(&self, documents: &[(N, T)]) -> Result<String, MergeError>
    where
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let schema = self.merge_schema(documents)?;
        Ok(print_with(schema.definitions(), &self.print))
    }

    /// Merges `(name, text)` documents into the structured result.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge`].
    pub fn merge_schema<N, T>(&self, documents: &[(N, T)]) -> Result<MergedSchema, MergeError>
    where
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let parsed = self.parse_documents(documents)?;
        let index = DefinitionIndex::from_documents(parsed);
        tracing::debug!(documents = documents.len(), keys = index.len(), "indexed documents");
        resolve(&index, &self.options).map_err(MergeError::Conflicts)
    }

    /// Parses every document, keeping input order regardless of how the
    /// work was scheduled.
    fn parse_documents<N, T>(
        &self,
        documents: &[(N, T)],
    ) -> Result<Vec<(String, Vec<Definition>)>, MergeError>
    where
        N: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let parse_one = |(name, text): &(N, T)| {
            let (name, text) = (name.as_ref(), text.as_ref());
            let result = parse(text).map_err(|errors| {
                errors
                    .into_iter()
                    .map(|e| ParseError::new(name, text, e))
                    .collect::<Vec<_>>()
            });
            tracing::debug!(source = name, ok = result.is_ok(), "parsed");
            (name.to_string(), result)
        };

        // par_iter().collect() into a Vec preserves input order.
        let results: Vec<_> = if self.parallel {
            documents.par_iter().map(parse_one).collect()
        } else {
            documents.iter().map(parse_one).collect()
        };

        let mut parsed = Vec::with_capacity(results.len());
        let mut errors = Vec::new();
        for (name, result) in results {
            match result {
                Ok(definitions) => parsed.push((name, definitions)),
                Err(mut e) => errors.append(&mut e),
            }
        }

        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(MergeError::Parse(errors))
        }
    }
}

/// Merges `(name, text)` documents with default settings, joining the
/// printed blocks with `separator`.
///
/// # Errors
///
/// See [`Merger::merge`].
///
/// # Example
///
/// ```
/// let merged = gqlmerge_sdl::merge(
///     "\n",
///     &[
///         ("a.graphql", "type User { id: ID }"),
///         ("b.graphql", "type User { name: String }"),
///     ],
/// )
/// .unwrap();
/// assert_eq!(merged, "type User {\n  id: ID\n  name: String\n}\n");
/// ```
pub fn merge<N, T>(separator: &str, documents: &[(N, T)]) -> Result<String, MergeError>
where
    N: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    Merger::new().separator(separator).merge(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_position() {
        let err = merge("\n", &[("ok.graphql", "scalar A"), ("bad.graphql", "type A {\n  id ID\n}")])
            .unwrap_err();
        let MergeError::Parse(errors) = err else {
            panic!("expected parse errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].source, "bad.graphql");
        assert_eq!((errors[0].line, errors[0].column), (2, 6));
        assert!(errors[0].to_string().starts_with("bad.graphql:2:6: "));
    }

    #[test]
    fn every_failing_document_is_reported() {
        let err = merge("\n", &[("a", "type {"), ("b", "scalar"), ("c", "scalar C")]).unwrap_err();
        let MergeError::Parse(errors) = err else {
            panic!("expected parse errors");
        };
        let sources: Vec<&str> = errors.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["a", "b"]);
    }

    #[test]
    fn conflicts_are_aggregated() {
        let err = merge(
            "\n",
            &[
                ("a", "type A { x: Int } type B { y: Int }"),
                ("b", "type A { x: String } type B { y: String }"),
            ],
        )
        .unwrap_err();
        match err {
            MergeError::Conflicts(conflicts) => assert_eq!(conflicts.len(), 2),
            other => panic!("expected conflicts, got {other}"),
        }
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let docs: Vec<(String, String)> = (0..32)
            .map(|i| (format!("doc{i}"), format!("type T{i} {{ f: Int }} type Shared {{ f{i}: Int }}")))
            .collect();
        let parallel = Merger::new().merge(&docs).unwrap();
        let sequential = Merger::new().parallel(false).merge(&docs).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn append_policy_joins_descriptions() {
        let merged = Merger::new()
            .description_policy(DescriptionPolicy::Append)
            .merge(&[("a", "\"first\" scalar S"), ("b", "\"second\" scalar S")])
            .unwrap();
        assert_eq!(merged, "\"first\\n\\nsecond\"\nscalar S\n");
    }

    #[test]
    fn empty_input_prints_nothing() {
        let docs: [(&str, &str); 0] = [];
        assert_eq!(merge("\n", &docs).unwrap(), "");
    }
}
