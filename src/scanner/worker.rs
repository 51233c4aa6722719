//! Per-file decision: validity → text heuristic → OCR → fingerprint
//!
//! Ordered cheapest first. OCR only runs on files that passed both filters and
//! the fingerprint is only computed for confirmed matches.

use super::filters::{Filter, FilterDecision, TextHeuristic, ValidityFilter};
use super::fingerprint::Fingerprinter;
use super::matcher::{MatchDecision, PhraseMatcher};
use super::ocr::OcrEngine;
use super::types::{ScanHit, ScanTask, ScannerConfig, Stage, TaskOutcome};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Worker {
    validity: ValidityFilter,
    heuristic: TextHeuristic,
    matcher: PhraseMatcher,
    fingerprinter: Fingerprinter,
}

impl Worker {
    pub fn new(config: &ScannerConfig, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            validity: ValidityFilter::new(config.extensions.clone(), config.min_width, config.min_height),
            heuristic: TextHeuristic::new(config.canny_low, config.canny_high, config.edge_density_threshold),
            matcher: PhraseMatcher::new(engine),
            fingerprinter: Fingerprinter::new(),
        }
    }

    /// Run one task to completion. Never panics or errors on bad input.
    pub fn process(&self, task: &ScanTask) -> TaskOutcome {
        let path = task.path.as_path();

        if let Some(outcome) = gate(&self.validity, path, Stage::Validity) {
            return outcome;
        }
        if let Some(outcome) = gate(&self.heuristic, path, Stage::TextHeuristic) {
            return outcome;
        }

        match self.matcher.matches(path, &task.phrase) {
            MatchDecision::Matched => {}
            MatchDecision::NotFound => {
                return TaskOutcome::Rejected {
                    path: task.path.clone(),
                    stage: Stage::PhraseMatch,
                    reason: "phrase not found".to_string(),
                };
            }
            MatchDecision::Failed(cause) => {
                return TaskOutcome::Failed {
                    path: task.path.clone(),
                    stage: Stage::PhraseMatch,
                    cause,
                };
            }
        }

        match self.fingerprinter.compute(path) {
            Ok(fingerprint) => TaskOutcome::Match(ScanHit {
                path: task.path.clone(),
                fingerprint,
            }),
            Err(e) => {
                tracing::error!("Fingerprint failed for {}: {:#}", path.display(), e);
                TaskOutcome::Failed {
                    path: task.path.clone(),
                    stage: Stage::Fingerprint,
                    cause: format!("{e:#}"),
                }
            }
        }
    }
}

/// Map a filter decision to an early-exit outcome
fn gate(filter: &impl Filter, path: &Path, stage: Stage) -> Option<TaskOutcome> {
    match filter.filter(path) {
        FilterDecision::Accepted => None,
        FilterDecision::Rejected(reason) => {
            tracing::trace!(filter = filter.name(), path = %path.display(), %reason, "rejected");
            Some(TaskOutcome::Rejected {
                path: path.to_path_buf(),
                stage,
                reason,
            })
        }
        FilterDecision::Failed(cause) => {
            tracing::debug!(filter = filter.name(), path = %path.display(), %cause, "failed");
            Some(TaskOutcome::Failed {
                path: path.to_path_buf(),
                stage,
                cause,
            })
        }
    }
}
