//! # scan-image - find images that contain a phrase
//!
//! Walks a directory tree, cheaply discards files that cannot contain
//! readable text, runs OCR (Tesseract) on the survivors and reports every
//! image whose text contains the target phrase. Visually identical images
//! are reported once, keyed by a perceptual hash.
//!
//! ## Pipeline
//!
//! ```text
//! enumerate ─▶ validity filter ─▶ text heuristic ─▶ OCR phrase match ─▶ fingerprint ─▶ dedup
//!   (walk)        (ext + size)       (edge density)     (tesseract)         (pHash)      (collector)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scan-image --folder ~/Pictures --phrase "invoice"
//! ```
//!
//! ```rust,no_run
//! let matches = scan_image::scan_images_for_phrase("/tmp/screens", "HELLO")?;
//! for path in matches {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod cli;
pub mod config;
pub mod logging;
pub mod parallel;
pub mod scanner;

pub use cli::{Cli, Output};
pub use config::ScanImageConfig;
pub use scanner::{Scanner, ScanResult};

/// Result type alias for scan-image operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Scan `folder` for images containing `phrase`.
///
/// Configuration is loaded with the usual layering (config files,
/// `SCAN_IMAGE_*` and `TESSERACT_PATH`) but without CLI overrides.
/// Returns the de-duplicated matching paths in completion order.
pub fn scan_images_for_phrase(folder: impl AsRef<Path>, phrase: &str) -> Result<Vec<PathBuf>> {
    let config = ScanImageConfig::load_default()?;
    let engine = scanner::ocr::TesseractEngine::probe(&config.ocr);
    let scanner = Scanner::new(config.scanner_config(), Arc::new(engine));
    Ok(scanner.scan(folder.as_ref(), phrase)?.matches)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::scanner::fixtures;
    use figment::Jail;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_scan_images_for_phrase_uses_tesseract_path() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let stub = jail.directory().join("fake-tesseract");
            fs::write(&stub, "#!/bin/sh\necho HELLO_TEST\n").unwrap();
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
            jail.set_env("TESSERACT_PATH", stub.display());

            let images = jail.directory().join("images");
            fs::create_dir(&images).unwrap();
            fixtures::write_stripes(&images.join("sample.png"), 400, 150, 8);

            let matches = scan_images_for_phrase(&images, "hello_test").unwrap();
            assert_eq!(matches, vec![images.join("sample.png")]);

            let none = scan_images_for_phrase(&images, "absent phrase").unwrap();
            assert!(none.is_empty());
            Ok(())
        });
    }
}
