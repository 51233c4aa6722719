//! Scan command implementation
//!
//! Resolves the folder and phrase (prompting for whichever is missing),
//! runs the scanner and prints the report in the requested format.

use crate::cli::{Output, OutputFormat, ScanArgs};
use crate::config::ScanImageConfig;
use crate::scanner::types::Warning;
use crate::scanner::{ScanResult, ScanStats, Scanner, TesseractEngine};
use anyhow::{Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct JsonReport<'a> {
    matches: &'a [PathBuf],
    stats: &'a ScanStats,
    warnings: &'a [Warning],
    elapsed_seconds: f64,
}

/// Execute a scan, returning the process exit code
pub fn execute(args: ScanArgs, config_path: Option<&str>, output: &Output) -> Result<i32> {
    let config = ScanImageConfig::load(config_path, Some(args.overrides()))?;

    let folder = match args.folder {
        Some(folder) => folder,
        None => PathBuf::from(output.prompt("Enter the folder path to scan: ")?),
    };
    let folder = normalize(&folder);

    let phrase = match args.phrase {
        Some(phrase) => phrase,
        None => output.prompt("Enter the phrase to search for: ")?,
    };
    if phrase.trim().is_empty() {
        bail!("The phrase to search for must not be empty");
    }

    if !folder.is_dir() {
        output.error(&format!("The folder '{}' does not exist.", folder.display()));
        return Ok(1);
    }

    if args.format == OutputFormat::Text {
        output.info(&format!("Scanning images in '{}' for phrase '{}'...", folder.display(), phrase));
    }

    let engine = TesseractEngine::probe(&config.ocr);
    let scanner = Scanner::new(config.scanner_config(), Arc::new(engine));

    let start = Instant::now();
    let result = scanner.scan(&folder, &phrase)?;
    let elapsed = start.elapsed();

    match args.format {
        OutputFormat::Text => report_text(&result, elapsed, output),
        OutputFormat::Json => report_json(&result, elapsed)?,
        OutputFormat::Files => {
            for path in &result.matches {
                println!("{}", path.display());
            }
        }
    }

    Ok(0)
}

/// Lexically normalise a user-supplied path (drops `.` and repeated separators)
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    if normalized.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        normalized
    }
}

fn report_text(result: &ScanResult, elapsed: Duration, output: &Output) {
    for warning in &result.warnings {
        output.warning(&warning.message);
    }

    if result.matches.is_empty() {
        output.warning("No images contain the phrase.");
    } else {
        output.success(&format!(
            "Scan complete: The phrase was found in {} image(s):",
            result.matches.len()
        ));
        for path in &result.matches {
            output.list_item(&path.display().to_string());
        }
    }

    if output.is_verbose() {
        let stats = &result.stats;
        output.category("Statistics");
        output.summary_stats("Files discovered:", stats.files_discovered);
        output.summary_stats("Not valid images:", stats.rejected_invalid);
        output.summary_stats("No text detected:", stats.rejected_no_text);
        output.summary_stats("Phrase not found:", stats.phrase_not_found);
        output.summary_stats("OCR failures:", stats.ocr_failures);
        output.summary_stats("Duplicates dropped:", stats.duplicates_dropped);
        output.summary_stats("Workers:", stats.workers);
        output.blank_line();
    }

    output.info(&format!("Time taken: {:.2} seconds", elapsed.as_secs_f64()));
}

fn report_json(result: &ScanResult, elapsed: Duration) -> Result<()> {
    let report = JsonReport {
        matches: &result.matches,
        stats: &result.stats,
        warnings: &result.warnings,
        elapsed_seconds: elapsed.as_secs_f64(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
