pub mod core;
pub mod directory;
pub mod filters;
pub mod fingerprint;
pub mod matcher;
pub mod ocr;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export main types for easier access
pub use self::core::{MatchSet, Scanner};
pub use directory::enumerate_files;
pub use filters::{Filter, FilterDecision, TextHeuristic, ValidityFilter};
pub use fingerprint::Fingerprinter;
pub use matcher::{MatchDecision, PhraseMatcher};
pub use ocr::{OcrEngine, OcrError, TesseractEngine};
pub use types::{Fingerprint, ScanHit, ScanPhase, ScanResult, ScanStats, ScanTask, ScannerConfig, Stage, TaskOutcome};
pub use worker::Worker;
