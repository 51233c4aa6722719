//! Diagnostic logging setup
//!
//! Pipeline components emit `tracing` events (rejections, OCR failures, phase
//! changes); this module installs the subscriber that renders them on stderr.
//! `RUST_LOG` takes precedence over the verbosity flags.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Map `-q` / `-v` flags to a filter directive
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbose: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(console::colors_enabled_stderr())
        .with_target(verbose > 1)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
