use console::Term;
use gqlmerge_core::MergeConflict;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

/// Output context derived from global flags.
///
/// Merged SDL and JSON documents go to stdout; everything else goes to
/// stderr so `gqlmerge merge > schema.graphql` stays clean.
pub struct OutputContext {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    /// Construct from global CLI options.
    pub fn from_global(global: &GlobalOpts) -> Self {
        let mode = match global.format.as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        };

        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode,
            quiet: global.quiet,
            use_color,
        }
    }

    /// Print a success message to stderr (human mode only, not in quiet mode).
    pub fn success(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        if self.use_color {
            let style = console::Style::new().green().bold();
            eprintln!("{} {}", style.apply_to("ok"), msg);
        } else {
            eprintln!("ok {msg}");
        }
    }

    /// Print a warning to stderr (not in quiet mode).
    pub fn warn(&self, msg: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_color {
                    let style = console::Style::new().yellow().bold();
                    eprintln!("{} {}", style.apply_to("warning:"), msg);
                } else {
                    eprintln!("warning: {msg}");
                }
            }
            OutputMode::Json => {
                let json = serde_json::json!({ "warning": msg });
                eprintln!("{json}");
            }
            OutputMode::Plain => {
                eprintln!("warning\t{msg}");
            }
        }
    }

    /// Print an error using the appropriate output mode.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => {
                if self.use_color {
                    let style = console::Style::new().red().bold();
                    eprintln!("{} {}", style.apply_to("error:"), err);
                } else {
                    eprintln!("error: {err}");
                }
            }
            OutputMode::Json => {
                let json = err.to_json();
                eprintln!("{json}");
            }
            OutputMode::Plain => {
                eprintln!("error\t{err}");
            }
        }
    }

    /// Print each merge conflict on its own line to stderr.
    ///
    /// JSON mode prints nothing here; the conflicts are part of the error
    /// object.
    pub fn print_conflicts(&self, conflicts: &[MergeConflict]) {
        match self.mode {
            OutputMode::Human => {
                for conflict in conflicts {
                    if self.use_color {
                        let style = console::Style::new().red();
                        eprintln!("  {} {conflict}", style.apply_to(conflict.code()));
                    } else {
                        eprintln!("  {} {conflict}", conflict.code());
                    }
                }
            }
            OutputMode::Plain => {
                for conflict in conflicts {
                    eprintln!(
                        "conflict\t{}\t{}\t{}",
                        conflict.code(),
                        conflict.name().unwrap_or("schema"),
                        conflict.sources().join(",")
                    );
                }
            }
            OutputMode::Json => {}
        }
    }

    /// Print JSON data to stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    /// Print a status message to stderr (human mode only, not in quiet mode).
    pub fn status(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        eprintln!("{msg}");
    }

    /// Whether to show progress spinners.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.mode == OutputMode::Human && Term::stderr().is_term()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_global(format: &str, quiet: bool, no_color: bool) -> GlobalOpts {
        GlobalOpts {
            config: None,
            format: format.into(),
            verbose: 0,
            quiet,
            no_color,
        }
    }

    #[test]
    fn from_global_human_mode() {
        let ctx = OutputContext::from_global(&make_global("human", false, false));
        assert_eq!(ctx.mode, OutputMode::Human);
        assert!(!ctx.quiet);
    }

    #[test]
    fn from_global_json_mode() {
        let ctx = OutputContext::from_global(&make_global("json", false, false));
        assert_eq!(ctx.mode, OutputMode::Json);
    }

    #[test]
    fn from_global_plain_mode() {
        let ctx = OutputContext::from_global(&make_global("plain", false, false));
        assert_eq!(ctx.mode, OutputMode::Plain);
    }

    #[test]
    fn from_global_no_color_disables_color() {
        let ctx = OutputContext::from_global(&make_global("human", false, true));
        assert!(!ctx.use_color);
    }

    #[test]
    fn from_global_quiet_flag() {
        let ctx = OutputContext::from_global(&make_global("human", true, false));
        assert!(ctx.quiet);
    }

    #[test]
    fn show_progress_false_when_quiet() {
        let ctx = OutputContext {
            mode: OutputMode::Human,
            quiet: true,
            use_color: true,
        };
        assert!(!ctx.show_progress());
    }

    #[test]
    fn show_progress_false_when_json() {
        let ctx = OutputContext {
            mode: OutputMode::Json,
            quiet: false,
            use_color: true,
        };
        assert!(!ctx.show_progress());
    }
}
