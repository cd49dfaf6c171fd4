//! sgen — render records from configured sources as text, one line each.
//!
//! # Usage
//!
//! ```text
//! sgen [SOURCE ...]                      render with each source's default template
//! sgen -S                                sync every configured source
//! sgen -S SOURCE ...                     sync, then render
//! sgen SOURCE ... -t '{{ name }}'        render with an ad-hoc template
//! sgen SOURCE ... -n url                 render with a named template
//! ```
//!
//! Config is read from `$SGEN_CONFIG_DIR/config.yaml` (default
//! `~/.config/sgen/config.yaml`); caches live under `$SGEN_CACHE_DIR`
//! (default: the OS cache directory plus `sgen`).

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::generate::GenerateArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sgen",
    version,
    about = "Generate text from cached data sources",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,

    /// Log cache and sync activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`. Library
/// crates log through the `log` facade, which the subscriber also captures.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.args.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
