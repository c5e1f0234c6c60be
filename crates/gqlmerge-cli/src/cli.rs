use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Merge GraphQL SDL files into a single schema.
///
/// gqlmerge reads type-system documents spread over many files, unions
/// every definition that shares a name, reports anything that cannot be
/// reconciled, and prints one canonical schema.
#[derive(Parser)]
#[command(
    name = "gqlmerge",
    version,
    about = "Merge GraphQL SDL files into a single schema",
    after_help = "Use 'gqlmerge <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: GQLMERGE_CONFIG]
    #[arg(short = 'c', long = "config", global = true, env = "GQLMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human (default), json, plain
    #[arg(
        long,
        global = true,
        default_value = "human",
        value_parser = ["human", "json", "plain"]
    )]
    pub format: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output [env: NO_COLOR]
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Merge SDL files into one schema
    Merge(MergeArgs),

    /// Parse and resolve SDL files without writing output
    Check(CheckArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for `gqlmerge merge`.
#[derive(Args)]
pub struct MergeArgs {
    /// SDL files or directories to merge (default: [cli].default_schema_dir)
    pub paths: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Text placed between top-level definitions; \n and \t are expanded
    #[arg(short = 's', long = "separator")]
    pub separator: Option<String>,

    /// Indentation width in spaces
    #[arg(short = 'i', long = "indent")]
    pub indent: Option<usize>,

    /// Append differing descriptions instead of keeping the first
    #[arg(long = "append-descriptions")]
    pub append_descriptions: bool,

    /// Parse files one at a time instead of in parallel
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Overwrite an existing output file without asking
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

/// Arguments for `gqlmerge check`.
#[derive(Args)]
pub struct CheckArgs {
    /// SDL files or directories to check (default: [cli].default_schema_dir)
    pub paths: Vec<PathBuf>,

    /// Print each file's canonical SDL
    #[arg(long = "print")]
    pub print: bool,
}

/// Arguments for `gqlmerge completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_parser = ["bash", "zsh", "fish", "powershell", "elvish"])]
    pub shell: String,
}
