use std::path::Path;

use console::Term;

use crate::cli::{GlobalOpts, MergeArgs};
use crate::commands::{discover_schema_files, read_documents, report_parse_errors};
use crate::config::{load_config, resolve_merge_params};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};
use crate::progress;

/// Run the `merge` command: merge SDL files and write the result.
pub async fn run(
    args: MergeArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let params = resolve_merge_params(&config, &args);

    let files = discover_schema_files(&params.paths, &params.extensions, params.output.as_deref())?;
    if let Some(path) = &params.output {
        confirm_overwrite(path, args.force, output)?;
    }

    let documents = read_documents(&files).await?;
    tracing::info!(files = documents.len(), parallel = params.parallel, "merging");

    let spinner = output
        .show_progress()
        .then(|| progress::create_spinner(&format!("Merging {} files...", documents.len())));

    let merger = params.merger();
    let (documents, result) = tokio::task::spawn_blocking(move || {
        let result = merger.merge(&documents);
        (documents, result)
    })
    .await
    .map_err(|e| CliError::Other(format!("merge task failed: {e}")))?;

    let merged = match result {
        Ok(merged) => {
            if let Some(sp) = &spinner {
                progress::finish_spinner(sp, &format!("Merged {} files", documents.len()));
            }
            merged
        }
        Err(err) => {
            if let Some(sp) = &spinner {
                progress::abandon_spinner(sp);
            }
            let err = CliError::from(err);
            match &err {
                CliError::Parse { errors } => report_parse_errors(errors, &documents, output),
                CliError::Conflicts { conflicts } => output.print_conflicts(conflicts),
                _ => {}
            }
            return Err(err);
        }
    };

    if merged.is_empty() {
        output.warn(&format!("no definitions found in {} files", documents.len()));
    }

    match &params.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CliError::Io {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
            tokio::fs::write(path, &merged)
                .await
                .map_err(|e| CliError::Io {
                    path: path.clone(),
                    source: e,
                })?;

            match output.mode {
                OutputMode::Json => output.print_json(&serde_json::json!({
                    "files": documents.len(),
                    "output": path.display().to_string(),
                    "bytes": merged.len(),
                })),
                OutputMode::Plain => println!("{}\t{}", documents.len(), path.display()),
                OutputMode::Human => output.success(&format!(
                    "merged {} files into {}",
                    documents.len(),
                    path.display()
                )),
            }
        }
        None => match output.mode {
            OutputMode::Json => output.print_json(&serde_json::json!({
                "files": documents.len(),
                "schema": merged,
            })),
            OutputMode::Human | OutputMode::Plain => print!("{merged}"),
        },
    }

    Ok(())
}

/// Ask before replacing an existing output file.
///
/// Non-interactive sessions must pass `--force`.
fn confirm_overwrite(path: &Path, force: bool, output: &OutputContext) -> Result<(), CliError> {
    if force || !path.exists() {
        return Ok(());
    }

    if !Term::stderr().is_term() || output.mode != OutputMode::Human {
        return Err(CliError::RequiresForce {
            path: path.to_path_buf(),
        });
    }

    let confirm = dialoguer::Confirm::new()
        .with_prompt(format!("Overwrite {}?", path.display()))
        .default(false)
        .interact()
        .map_err(|_| CliError::Cancelled)?;

    if confirm {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_output() -> OutputContext {
        OutputContext {
            mode: OutputMode::Plain,
            quiet: true,
            use_color: false,
        }
    }

    #[test]
    fn overwrite_allowed_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.graphql");
        assert!(confirm_overwrite(&path, false, &quiet_output()).is_ok());
    }

    #[test]
    fn overwrite_allowed_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.graphql");
        std::fs::write(&path, "").unwrap();
        assert!(confirm_overwrite(&path, true, &quiet_output()).is_ok());
    }

    #[test]
    fn overwrite_requires_force_when_not_interactive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.graphql");
        std::fs::write(&path, "").unwrap();
        let result = confirm_overwrite(&path, false, &quiet_output());
        assert!(matches!(result, Err(CliError::RequiresForce { .. })));
    }
}
