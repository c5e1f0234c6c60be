use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;

/// Returns the filter directive implied by `-v` / `-q`.
pub fn default_directive(global: &GlobalOpts) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the verbosity flags.
pub fn init(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!global.no_color)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(verbose: u8, quiet: bool) -> GlobalOpts {
        GlobalOpts {
            config: None,
            format: "human".into(),
            verbose,
            quiet,
            no_color: true,
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(&global(0, false)), "warn");
        assert_eq!(default_directive(&global(1, false)), "info");
        assert_eq!(default_directive(&global(2, false)), "debug");
        assert_eq!(default_directive(&global(5, false)), "trace");
    }

    #[test]
    fn quiet_keeps_errors_only() {
        assert_eq!(default_directive(&global(0, true)), "error");
    }
}
