//! OCR text extraction
//!
//! Recognition itself is delegated to the Tesseract command-line binary. The
//! [`OcrEngine`] trait is the seam the rest of the pipeline depends on, so
//! tests and alternative engines can stand in for Tesseract.

use crate::config::OcrSection;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Binary looked up on `PATH` when no explicit path is configured
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: '{0}' was not found")]
    EngineNotFound(String),

    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}: {stderr}")]
    Exit {
        binary: String,
        status: String,
        stderr: String,
    },

    #[error("OCR output was not valid UTF-8")]
    InvalidOutput,
}

/// Anything that can turn an image file into free-form text
pub trait OcrEngine: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError>;

    fn name(&self) -> &str;
}

/// Tesseract invoked as an external process
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    requested: String,
    binary: Option<PathBuf>,
    language: String,
    version: Option<String>,
}

impl TesseractEngine {
    /// Resolve `binary` (a bare name or a full path) without probing its version
    pub fn new(binary: &str, language: &str) -> Self {
        Self {
            requested: binary.to_string(),
            binary: which::which(binary).ok(),
            language: language.to_string(),
            version: None,
        }
    }

    /// Resolve the configured binary and log its version once.
    ///
    /// A missing engine is reported as an error diagnostic but is not fatal:
    /// the returned engine fails every extraction, which the pipeline treats
    /// as "no match".
    pub fn probe(config: &OcrSection) -> Self {
        let requested = config
            .tesseract_path
            .clone()
            .unwrap_or_else(|| DEFAULT_TESSERACT_BINARY.to_string());
        let mut engine = Self::new(&requested, &config.language);

        let probed = engine
            .binary
            .as_deref()
            .and_then(|binary| read_version(binary).map(|version| (binary.to_path_buf(), version)));

        match probed {
            Some((binary, version)) => {
                tracing::debug!("Tesseract version {} from binary: {}", version, binary.display());
                engine.version = Some(version);
            }
            None => {
                tracing::error!(
                    "Tesseract not found (looked for '{}'). Ensure TESSERACT_PATH points to the full executable path.",
                    requested
                );
            }
        }

        engine
    }

    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.binary.is_some()
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| OcrError::EngineNotFound(self.requested.clone()))?;
        let binary_name = binary.display().to_string();

        let output = Command::new(binary)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|source| OcrError::Spawn {
                binary: binary_name.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Exit {
                binary: binary_name,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| OcrError::InvalidOutput)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// First line of `tesseract --version`; older releases print it on stderr
fn read_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    [&output.stdout, &output.stderr]
        .into_iter()
        .filter_map(|stream| String::from_utf8_lossy(stream).lines().next().map(str::to_string))
        .map(|line| line.trim().trim_start_matches("tesseract").trim().to_string())
        .find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_per_call() {
        let engine = TesseractEngine::new("/nonexistent/bin/tesseract-does-not-exist", "eng");
        assert!(!engine.is_available());

        let err = engine.extract_text(Path::new("image.png")).unwrap_err();
        assert!(matches!(err, OcrError::EngineNotFound(_)));
        assert!(err.to_string().contains("tesseract-does-not-exist"));
    }

    #[test]
    fn test_probe_missing_binary_is_not_fatal() {
        let config = OcrSection {
            tesseract_path: Some("/nonexistent/tesseract".to_string()),
            language: "eng".to_string(),
        };
        let engine = TesseractEngine::probe(&config);
        assert!(engine.binary().is_none());
        assert!(engine.version().is_none());
    }

    #[test]
    fn test_probe_real_binary_when_installed() {
        if which::which(DEFAULT_TESSERACT_BINARY).is_err() {
            eprintln!("tesseract not installed, skipping");
            return;
        }
        let engine = TesseractEngine::probe(&OcrSection::default());
        assert!(engine.is_available());
        assert!(engine.version().is_some());
    }
}
