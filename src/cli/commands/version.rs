//! Version command implementation
//!
//! Displays version information and whether Tesseract can be found.

use crate::cli::Output;
use crate::config::ScanImageConfig;
use crate::scanner::TesseractEngine;
use anyhow::Result;

/// Execute the version command
pub fn execute(config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = ScanImageConfig::load(config_path, None)?;

    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION, false);
    output.key_value("Authors:", env!("CARGO_PKG_AUTHORS"), false);

    output.category("OCR Engine");
    let engine = TesseractEngine::probe(&config.ocr);
    match engine.binary() {
        Some(binary) => {
            output.key_value("Tesseract:", &binary.display().to_string(), true);
            output.key_value("Version:", engine.version().unwrap_or("unknown"), false);
        }
        None => output.key_value("Tesseract:", "not found", false),
    }
    output.key_value("Language:", &config.ocr.language, false);

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value("Profile:", if cfg!(debug_assertions) { "debug" } else { "release" }, false);
    output.blank_line();

    Ok(())
}
