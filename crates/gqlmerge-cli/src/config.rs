use std::path::{Path, PathBuf};

use gqlmerge_core::DescriptionPolicy;
use gqlmerge_sdl::Merger;
use serde::{Deserialize, Serialize};

use crate::cli::MergeArgs;
use crate::error::CliError;

/// CLI configuration loaded from gqlmerge.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub merge: MergeSettings,
    #[serde(default)]
    pub cli: CliSettings,
}

/// Defaults for the merge engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub description_policy: DescriptionPolicy,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            indent: default_indent(),
            description_policy: DescriptionPolicy::default(),
            parallel: default_parallel(),
        }
    }
}

/// CLI-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_schema_dir")]
    pub default_schema_dir: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_schema_dir: default_schema_dir(),
            extensions: default_extensions(),
            output: None,
        }
    }
}

fn default_separator() -> String {
    "\n".to_string()
}

fn default_indent() -> usize {
    2
}

fn default_parallel() -> bool {
    true
}

fn default_schema_dir() -> String {
    "schema/".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["graphql".into(), "graphqls".into(), "gql".into()]
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit)
/// 2. `GQLMERGE_CONFIG` env var
/// 3. `./gqlmerge.toml` (project-local)
/// 4. `$XDG_CONFIG_HOME/gqlmerge/gqlmerge.toml`
/// 5. `~/.config/gqlmerge/gqlmerge.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    if let Ok(env_path) = std::env::var("GQLMERGE_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    let local = PathBuf::from("gqlmerge.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("gqlmerge/gqlmerge.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/gqlmerge/gqlmerge.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "loaded config");
    toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

/// Merge parameters after combining config values and CLI flags.
#[derive(Debug, Clone)]
pub struct MergeParams {
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub separator: String,
    pub indent: usize,
    pub description_policy: DescriptionPolicy,
    pub parallel: bool,
    pub extensions: Vec<String>,
}

impl MergeParams {
    /// Builds the engine configured by these parameters.
    pub fn merger(&self) -> Merger {
        Merger::new()
            .separator(self.separator.clone())
            .indent(self.indent)
            .description_policy(self.description_policy)
            .parallel(self.parallel)
    }
}

/// Resolve merge parameters from config + CLI overrides.
///
/// CLI flags take precedence over config file values.
pub fn resolve_merge_params(config: &CliConfig, args: &MergeArgs) -> MergeParams {
    MergeParams {
        paths: input_paths(config, &args.paths),
        output: args.output.clone().or_else(|| config.cli.output.clone()),
        separator: args
            .separator
            .as_deref()
            .map(expand_escapes)
            .unwrap_or_else(|| config.merge.separator.clone()),
        indent: args.indent.unwrap_or(config.merge.indent),
        description_policy: if args.append_descriptions {
            DescriptionPolicy::Append
        } else {
            config.merge.description_policy
        },
        parallel: !args.sequential && config.merge.parallel,
        extensions: config.cli.extensions.clone(),
    }
}

/// Returns `paths`, or the configured schema directory when none were given.
pub fn input_paths(config: &CliConfig, paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(&config.cli.default_schema_dir)]
    } else {
        paths.to_vec()
    }
}

/// Expands `\n`, `\t` and `\\` in a separator typed on the command line.
fn expand_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_args() -> MergeArgs {
        MergeArgs {
            paths: Vec::new(),
            output: None,
            separator: None,
            indent: None,
            append_descriptions: false,
            sequential: false,
            force: false,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = CliConfig::default();
        assert_eq!(config.merge.separator, "\n");
        assert_eq!(config.merge.indent, 2);
        assert_eq!(config.merge.description_policy, DescriptionPolicy::FirstWins);
        assert!(config.merge.parallel);
        assert_eq!(config.cli.default_schema_dir, "schema/");
        assert_eq!(config.cli.extensions, vec!["graphql", "graphqls", "gql"]);
        assert!(config.cli.output.is_none());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
[merge]
indent = 4
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.merge.indent, 4);
        assert_eq!(config.merge.separator, "\n");
        assert_eq!(config.cli.default_schema_dir, "schema/");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[merge]
separator = "\n\n"
indent = 4
description_policy = "append"
parallel = false

[cli]
default_schema_dir = "graphql/"
extensions = ["graphql"]
output = "build/schema.graphql"
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.merge.separator, "\n\n");
        assert_eq!(config.merge.description_policy, DescriptionPolicy::Append);
        assert!(!config.merge.parallel);
        assert_eq!(config.cli.default_schema_dir, "graphql/");
        assert_eq!(config.cli.extensions, vec!["graphql"]);
        assert_eq!(config.cli.output, Some(PathBuf::from("build/schema.graphql")));
    }

    #[test]
    fn unknown_policy_rejected() {
        let result: Result<CliConfig, _> = toml::from_str("[merge]\ndescription_policy = \"last\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn resolve_uses_config_defaults() {
        let params = resolve_merge_params(&CliConfig::default(), &merge_args());
        assert_eq!(params.paths, vec![PathBuf::from("schema/")]);
        assert_eq!(params.separator, "\n");
        assert_eq!(params.indent, 2);
        assert_eq!(params.description_policy, DescriptionPolicy::FirstWins);
        assert!(params.parallel);
    }

    #[test]
    fn resolve_cli_overrides() {
        let args = MergeArgs {
            paths: vec![PathBuf::from("a.graphql")],
            output: Some(PathBuf::from("out.graphql")),
            separator: Some("\\n---\\n".into()),
            indent: Some(4),
            append_descriptions: true,
            sequential: true,
            force: false,
        };
        let params = resolve_merge_params(&CliConfig::default(), &args);
        assert_eq!(params.paths, vec![PathBuf::from("a.graphql")]);
        assert_eq!(params.output, Some(PathBuf::from("out.graphql")));
        assert_eq!(params.separator, "\n---\n");
        assert_eq!(params.indent, 4);
        assert_eq!(params.description_policy, DescriptionPolicy::Append);
        assert!(!params.parallel);
    }

    #[test]
    fn expand_escapes_handles_sequences() {
        assert_eq!(expand_escapes("\\n\\t\\\\"), "\n\t\\");
        assert_eq!(expand_escapes("a\\qb"), "a\\qb");
        assert_eq!(expand_escapes("end\\"), "end\\");
        assert_eq!(expand_escapes("plain"), "plain");
    }

    #[test]
    fn load_config_from_explicit_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/gqlmerge.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_config_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlmerge.toml");
        std::fs::write(&path, "[merge]\nindent = 8\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.merge.indent, 8);
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlmerge.toml");
        std::fs::write(&path, "[merge\nindent = ").unwrap();
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(CliError::Config { .. })));
    }
}
