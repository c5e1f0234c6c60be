pub mod check;
pub mod completions;
pub mod merge;

use std::path::{Path, PathBuf};

use gqlmerge_sdl::ParseError;

use crate::diagnostic::render_diagnostics;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// A document read from disk: its display name and text.
pub type Document = (String, String);

/// Discover SDL files from a list of paths.
///
/// Paths can be files (used directly) or directories (searched recursively
/// for files with one of `extensions`). `exclude` is dropped from the
/// result so a merge never reads its own output.
pub fn discover_schema_files(
    paths: &[PathBuf],
    extensions: &[String],
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for extension in extensions {
                let pattern = path.join(format!("**/*.{extension}"));
                let entries = glob::glob(&pattern.to_string_lossy())
                    .map_err(|e| CliError::Other(e.to_string()))?;
                for entry in entries {
                    let entry = entry.map_err(|e| CliError::Other(e.to_string()))?;
                    files.push(entry);
                }
            }
        } else {
            return Err(CliError::NoSchemaFiles { path: path.clone() });
        }
    }

    if let Some(exclude) = exclude {
        let excluded = canonical(exclude);
        files.retain(|file| canonical(file) != excluded);
    }

    if files.is_empty() {
        let display_path = paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("schema/"));
        return Err(CliError::NoSchemaFiles { path: display_path });
    }

    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), "discovered schema files");
    Ok(files)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Read every file concurrently, keeping the order of `files`.
pub async fn read_documents(files: &[PathBuf]) -> Result<Vec<Document>, CliError> {
    let handles: Vec<_> = files
        .iter()
        .cloned()
        .map(|path| {
            tokio::spawn(async move {
                let result = tokio::fs::read_to_string(&path).await;
                (path, result)
            })
        })
        .collect();

    let mut documents = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, result) = handle
            .await
            .map_err(|e| CliError::Other(format!("read task failed: {e}")))?;
        let text = result.map_err(|e| CliError::Io {
            path: path.clone(),
            source: e,
        })?;
        documents.push((path.display().to_string(), text));
    }
    Ok(documents)
}

/// Render parse errors for the documents they came from.
///
/// JSON output is left to `CliError::to_json`.
pub fn report_parse_errors(errors: &[ParseError], documents: &[Document], output: &OutputContext) {
    let source_of = |name: &str| {
        documents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    };
    match output.mode {
        OutputMode::Human => {
            for report in render_diagnostics(errors, source_of) {
                eprintln!("{report:?}");
            }
        }
        OutputMode::Plain => {
            for err in errors {
                eprintln!("{}\t{}\t{}\terror\t{}", err.source, err.line, err.column, err.message);
            }
        }
        OutputMode::Json => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["graphql".into(), "gql".into()]
    }

    #[test]
    fn discover_nonexistent_path() {
        let result = discover_schema_files(&[PathBuf::from("/nonexistent/path")], &extensions(), None);
        assert!(matches!(result, Err(CliError::NoSchemaFiles { .. })));
    }

    #[test]
    fn discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_schema_files(&[dir.path().to_path_buf()], &extensions(), None);
        assert!(result.is_err());
    }

    #[test]
    fn discover_filters_by_extension_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("a.graphql"), "scalar A").unwrap();
        std::fs::write(dir.path().join("nested/b.gql"), "scalar B").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let files = discover_schema_files(&[dir.path().to_path_buf()], &extensions(), None).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.graphql"), dir.path().join("nested/b.gql")]
        );
    }

    #[test]
    fn discover_accepts_direct_file_with_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.txt");
        std::fs::write(&path, "scalar A").unwrap();
        let files = discover_schema_files(std::slice::from_ref(&path), &extensions(), None).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn discover_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.graphql");
        std::fs::write(&path, "scalar A").unwrap();
        let files = discover_schema_files(
            &[path.clone(), dir.path().to_path_buf()],
            &extensions(),
            None,
        )
        .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn discover_excludes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.graphql"), "scalar A").unwrap();
        let out = dir.path().join("merged.graphql");
        std::fs::write(&out, "scalar A").unwrap();
        let files =
            discover_schema_files(&[dir.path().to_path_buf()], &extensions(), Some(&out)).unwrap();
        assert_eq!(files, vec![dir.path().join("a.graphql")]);
    }

    #[tokio::test]
    async fn read_documents_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("{i}.graphql"));
                std::fs::write(&path, format!("scalar S{i}")).unwrap();
                path
            })
            .collect();
        let documents = read_documents(&paths).await.unwrap();
        let texts: Vec<&str> = documents.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["scalar S0", "scalar S1", "scalar S2", "scalar S3", "scalar S4"]);
        assert_eq!(documents[0].0, paths[0].display().to_string());
    }

    #[tokio::test]
    async fn read_documents_reports_missing_file() {
        let result = read_documents(&[PathBuf::from("/nonexistent/a.graphql")]).await;
        assert!(matches!(result, Err(CliError::Io { .. })));
    }
}
