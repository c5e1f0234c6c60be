use std::path::PathBuf;

use gqlmerge_core::MergeConflict;
use gqlmerge_sdl::{MergeError, ParseError};

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage or configuration error
/// - 3: parse error in an input document
/// - 4: the inputs parsed but could not be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ParseError = 3,
    ConflictError = 4,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// One or more input documents failed to parse.
    #[error("{} parse error(s)", .errors.len())]
    Parse { errors: Vec<ParseError> },

    /// The inputs disagree in ways the merge cannot reconcile.
    #[error("{} merge conflict(s)", .conflicts.len())]
    Conflicts { conflicts: Vec<MergeConflict> },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// User declined to overwrite the output file.
    #[error("operation cancelled")]
    Cancelled,

    /// No SDL files were found under a path.
    #[error("no schema files found in {path}")]
    NoSchemaFiles { path: PathBuf },

    /// Non-TTY requires --force to overwrite an existing output file.
    #[error("output file '{path}' exists (use --force to overwrite in non-interactive mode)")]
    RequiresForce { path: PathBuf },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<MergeError> for CliError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::Parse(errors) => Self::Parse { errors },
            MergeError::Conflicts(conflicts) => Self::Conflicts { conflicts },
            other => Self::Other(other.to_string()),
        }
    }
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Parse { .. } => ExitCode::ParseError,
            Self::Conflicts { .. } => ExitCode::ConflictError,
            Self::Config { .. } | Self::NoSchemaFiles { .. } => ExitCode::InvalidArguments,
            Self::Io { .. } | Self::Cancelled | Self::RequiresForce { .. } | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Parse { errors } => {
                let error_list: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "file": e.source,
                            "line": e.line,
                            "column": e.column,
                            "message": e.message,
                        })
                    })
                    .collect();
                serde_json::json!({
                    "error": "parse_error",
                    "errors": error_list,
                })
            }
            Self::Conflicts { conflicts } => {
                let conflict_list: Vec<serde_json::Value> = conflicts
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "code": c.code(),
                            "kind": c.kind().keyword(),
                            "name": c.name(),
                            "sources": c.sources(),
                            "message": c.to_string(),
                        })
                    })
                    .collect();
                serde_json::json!({
                    "error": "merge_conflict",
                    "conflicts": conflict_list,
                })
            }
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
