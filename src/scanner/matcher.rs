//! Phrase search over OCR output

use super::ocr::OcrEngine;
use std::path::Path;
use std::sync::Arc;

/// Number of OCR characters echoed into debug logs
const OCR_PREVIEW_CHARS: usize = 100;

/// Outcome of looking for a phrase in one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    Matched,
    NotFound,
    /// The OCR engine could not produce text for this image
    Failed(String),
}

/// Runs OCR and performs a case-insensitive substring test
#[derive(Clone)]
pub struct PhraseMatcher {
    engine: Arc<dyn OcrEngine>,
}

impl PhraseMatcher {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub fn matches(&self, path: &Path, phrase: &str) -> MatchDecision {
        let text = match self.engine.extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("OCR failed for {}: {}", path.display(), e);
                return MatchDecision::Failed(e.to_string());
            }
        };

        let preview: String = text.chars().take(OCR_PREVIEW_CHARS).collect();
        tracing::debug!("OCR text for {}: {}...", path.display(), preview);

        if text_contains_phrase(&text, phrase) {
            MatchDecision::Matched
        } else {
            MatchDecision::NotFound
        }
    }

    /// `true` only when the phrase was found
    pub fn contains_phrase(&self, path: &Path, phrase: &str) -> bool {
        self.matches(path, phrase) == MatchDecision::Matched
    }
}

impl std::fmt::Debug for PhraseMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseMatcher")
            .field("engine", &self.engine.name())
            .finish()
    }
}

/// Case-insensitive containment
pub fn text_contains_phrase(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(&phrase.to_lowercase())
}
