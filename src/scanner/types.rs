use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Image extensions accepted when no configuration overrides them
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

/// Configuration for the scanner pipeline
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Lowercase extensions (without the dot) that may be opened as images
    pub extensions: HashSet<String>,
    pub min_width: u32,
    pub min_height: u32,
    /// Canny hysteresis thresholds
    pub canny_low: f32,
    pub canny_high: f32,
    /// Minimum fraction of edge pixels for an image to be sent to OCR
    pub edge_density_threshold: f64,
    /// Maximum number of worker threads (0 = auto-detect)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
    pub follow_symlinks: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            min_width: 50,
            min_height: 50,
            canny_low: 100.0,
            canny_high: 200.0,
            edge_density_threshold: 0.02,
            max_threads: 0,
            thread_percentage: 100,
            follow_symlinks: false,
        }
    }
}

/// Perceptual hash of an image's pixel content.
///
/// Only meaningful within a single scan; equal fingerprints mean the images
/// are treated as the same picture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable unit of work handed to a worker
#[derive(Debug, Clone)]
pub struct ScanTask {
    pub path: PathBuf,
    pub phrase: String,
}

impl ScanTask {
    pub fn new(path: impl Into<PathBuf>, phrase: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            phrase: phrase.into(),
        }
    }
}

/// A confirmed match: the image contains the phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// Pipeline stage that produced a non-match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validity,
    TextHeuristic,
    PhraseMatch,
    Fingerprint,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validity => "validity",
            Stage::TextHeuristic => "text-heuristic",
            Stage::PhraseMatch => "phrase-match",
            Stage::Fingerprint => "fingerprint",
        };
        f.write_str(name)
    }
}

/// Result of running one [`ScanTask`] through the worker pipeline.
///
/// `Rejected` means the file legitimately did not qualify, `Failed` means a
/// decoder or the OCR engine broke on it. Both count as "no match" for the
/// scan; the distinction only feeds statistics and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Match(ScanHit),
    Rejected {
        path: PathBuf,
        stage: Stage,
        reason: String,
    },
    Failed {
        path: PathBuf,
        stage: Stage,
        cause: String,
    },
}

impl TaskOutcome {
    pub fn path(&self) -> &Path {
        match self {
            TaskOutcome::Match(hit) => &hit.path,
            TaskOutcome::Rejected { path, .. } | TaskOutcome::Failed { path, .. } => path,
        }
    }

    pub fn into_hit(self) -> Option<ScanHit> {
        match self {
            TaskOutcome::Match(hit) => Some(hit),
            _ => None,
        }
    }
}

/// Lifecycle of a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Enumerating,
    Dispatching,
    Collecting,
    Complete,
}

/// Statistics from a scanning operation
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub files_discovered: usize,
    pub rejected_invalid: usize,
    pub rejected_no_text: usize,
    pub heuristic_failures: usize,
    pub phrase_not_found: usize,
    pub ocr_failures: usize,
    pub fingerprint_failures: usize,
    pub duplicates_dropped: usize,
    pub matches: usize,
    pub workers: usize,
    pub scan_duration_ms: u64,
}

impl ScanStats {
    /// Tally one worker outcome
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Match(_) => {}
            TaskOutcome::Rejected { stage, .. } => match stage {
                Stage::Validity => self.rejected_invalid += 1,
                Stage::TextHeuristic => self.rejected_no_text += 1,
                Stage::PhraseMatch | Stage::Fingerprint => self.phrase_not_found += 1,
            },
            TaskOutcome::Failed { stage, .. } => match stage {
                Stage::Validity => self.rejected_invalid += 1,
                Stage::TextHeuristic => self.heuristic_failures += 1,
                Stage::PhraseMatch => self.ocr_failures += 1,
                Stage::Fingerprint => self.fingerprint_failures += 1,
            },
        }
    }
}

/// Warning generated during scanning
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub message: String,
}

/// Result of a scanning operation
#[derive(Debug, Serialize)]
pub struct ScanResult {
    /// Accepted paths, in the order workers completed them
    pub matches: Vec<PathBuf>,
    pub stats: ScanStats,
    pub warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_display_is_hex() {
        let fp = Fingerprint::from_bytes(&[0x00, 0xab, 0x7f]);
        assert_eq!(fp.to_string(), "00ab7f");
    }

    #[test]
    fn test_stats_record_by_stage() {
        let mut stats = ScanStats::default();
        stats.record(&TaskOutcome::Rejected {
            path: "a.png".into(),
            stage: Stage::TextHeuristic,
            reason: "low edge density".into(),
        });
        stats.record(&TaskOutcome::Failed {
            path: "b.png".into(),
            stage: Stage::PhraseMatch,
            cause: "tesseract missing".into(),
        });
        stats.record(&TaskOutcome::Rejected {
            path: "c.txt".into(),
            stage: Stage::Validity,
            reason: "unsupported extension".into(),
        });

        assert_eq!(stats.rejected_no_text, 1);
        assert_eq!(stats.ocr_failures, 1);
        assert_eq!(stats.rejected_invalid, 1);
        assert_eq!(stats.phrase_not_found, 0);
    }

    #[test]
    fn test_default_config_matches_supported_formats() {
        let config = ScannerConfig::default();
        for ext in ["png", "jpg", "jpeg", "bmp", "tiff"] {
            assert!(config.extensions.contains(ext));
        }
        assert!(!config.extensions.contains("gif"));
        assert_eq!((config.min_width, config.min_height), (50, 50));
    }
}
