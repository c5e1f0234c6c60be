use gqlmerge_core::MergedSchema;

use crate::cli::{CheckArgs, GlobalOpts};
use crate::commands::{discover_schema_files, read_documents, report_parse_errors};
use crate::config::{input_paths, load_config};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `check` command: parse and resolve SDL files without writing.
pub async fn run(
    args: CheckArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let paths = input_paths(&config, &args.paths);
    let files = discover_schema_files(&paths, &config.cli.extensions, None)?;
    let documents = read_documents(&files).await?;

    if args.print {
        for (name, text) in &documents {
            // Files that fail to parse are reported by the merge below.
            if let Ok(definitions) = gqlmerge_sdl::parse(text) {
                output.status(&format!("# {name}"));
                print!("{}", gqlmerge_sdl::print_all(&definitions));
            }
        }
    }

    let merger = gqlmerge_sdl::Merger::new()
        .description_policy(config.merge.description_policy)
        .parallel(config.merge.parallel);
    let (documents, result) = tokio::task::spawn_blocking(move || {
        let result = merger.merge_schema(&documents);
        (documents, result)
    })
    .await
    .map_err(|e| CliError::Other(format!("check task failed: {e}")))?;

    let schema = match result {
        Ok(schema) => schema,
        Err(err) => {
            let err = CliError::from(err);
            match &err {
                CliError::Parse { errors } => report_parse_errors(errors, &documents, output),
                CliError::Conflicts { conflicts } => output.print_conflicts(conflicts),
                _ => {}
            }
            return Err(err);
        }
    };

    match output.mode {
        OutputMode::Human => output.success(&format!(
            "{} definitions merged from {} files, 0 conflicts",
            schema.len(),
            documents.len()
        )),
        OutputMode::Json => output.print_json(&summary(&schema, documents.len())),
        OutputMode::Plain => println!("{}\t{}", documents.len(), schema.len()),
    }

    Ok(())
}

/// JSON summary listing each merged definition and where it came from.
fn summary(schema: &MergedSchema, files: usize) -> serde_json::Value {
    let definitions: Vec<serde_json::Value> = schema
        .entries()
        .iter()
        .map(|entry| {
            serde_json::json!({
                "kind": entry.definition.kind().keyword(),
                "name": entry.definition.name().map(|n| n.as_str()),
                "sources": entry.sources,
            })
        })
        .collect();
    serde_json::json!({
        "files": files,
        "definitions": definitions,
        "conflicts": 0,
    })
}
