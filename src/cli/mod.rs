//! Command-line interface for scan-image
//!
//! Parses arguments, loads configuration and hands a folder and a phrase to
//! the scanner. Running without a subcommand performs a scan; a missing
//! folder or phrase is asked for interactively.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

mod commands;
mod output;

pub use output::Output;

/// Scan a folder of images and detect a specific text phrase using OCR (Tesseract)
#[derive(Parser, Debug)]
#[command(name = "scan-image", author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings, errors and results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version and OCR engine information
    Version,
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default configuration to ./scan-image.toml
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the merged configuration
    Validate,
    /// Show the merged configuration
    Show,
}

/// Arguments for a scan
#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
    /// Folder path to scan
    #[arg(short, long, value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Phrase to search for (case-insensitive)
    #[arg(short, long)]
    pub phrase: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of worker threads (default: one per CPU core)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Minimum image width in pixels
    #[arg(long, value_name = "PX")]
    pub min_width: Option<u32>,

    /// Minimum image height in pixels
    #[arg(long, value_name = "PX")]
    pub min_height: Option<u32>,

    /// Edge density an image must exceed before OCR runs
    #[arg(long, value_name = "FRACTION")]
    pub edge_threshold: Option<f64>,

    /// Path to the Tesseract executable
    #[arg(long, value_name = "PATH")]
    pub tesseract_path: Option<String>,

    /// Tesseract language code(s), e.g. eng or eng+deu
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Follow symbolic links while walking the folder
    #[arg(long)]
    pub follow_symlinks: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON report with matches and statistics
    Json,
    /// Matching paths only, one per line
    Files,
}

impl ScanArgs {
    /// Config overrides for the flags that were actually given
    pub fn overrides(&self) -> Value {
        let mut scanner = Map::new();
        if let Some(workers) = self.workers {
            scanner.insert("max_threads".into(), json!(workers));
        }
        if let Some(width) = self.min_width {
            scanner.insert("min_width".into(), json!(width));
        }
        if let Some(height) = self.min_height {
            scanner.insert("min_height".into(), json!(height));
        }
        if let Some(threshold) = self.edge_threshold {
            scanner.insert("edge_density_threshold".into(), json!(threshold));
        }
        if self.follow_symlinks {
            scanner.insert("follow_symlinks".into(), json!(true));
        }

        let mut ocr = Map::new();
        if let Some(path) = &self.tesseract_path {
            ocr.insert("tesseract_path".into(), json!(path));
        }
        if let Some(lang) = &self.lang {
            ocr.insert("language".into(), json!(lang));
        }

        json!({ "scanner": scanner, "ocr": ocr })
    }
}

impl Cli {
    /// Execute the CLI command and return the process exit code
    pub fn run(self) -> Result<i32> {
        let output = Output::new(self.verbose > 0, self.quiet);

        if let Err(e) = crate::logging::init(self.verbose, self.quiet) {
            output.verbose(&e.to_string());
        }

        let config_path = self.config.as_deref();
        match self.command {
            Some(Commands::Version) => commands::version::execute(config_path, &output).map(|_| 0),
            Some(Commands::Config(cmd)) => commands::config::execute(cmd, config_path, &output),
            None => commands::scan::execute(self.scan, config_path, &output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_flags_parse() {
        let cli = Cli::try_parse_from(["scan-image", "-f", "/test/path", "-p", "hello", "--workers", "3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.scan.folder, Some(PathBuf::from("/test/path")));
        assert_eq!(cli.scan.phrase.as_deref(), Some("hello"));
        assert_eq!(cli.scan.workers, Some(3));
        assert_eq!(cli.scan.format, OutputFormat::Text);
    }

    #[test]
    fn test_subcommand_parse() {
        let cli = Cli::try_parse_from(["scan-image", "config", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(ConfigCommands::Init { force: true }))));
    }

    #[test]
    fn test_overrides_only_include_given_flags() {
        let args = ScanArgs {
            min_width: Some(80),
            lang: Some("deu".to_string()),
            ..ScanArgs::default()
        };
        let overrides = args.overrides();

        assert_eq!(overrides["scanner"]["min_width"], 80);
        assert!(overrides["scanner"].get("min_height").is_none());
        assert!(overrides["scanner"].get("follow_symlinks").is_none());
        assert_eq!(overrides["ocr"]["language"], "deu");
        assert!(overrides["ocr"].get("tesseract_path").is_none());
    }
}
