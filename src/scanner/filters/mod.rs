//! Cheap gates that run before OCR
//!
//! Each filter turns a path into a [`FilterDecision`]. Filters never fail the
//! scan: problems with a single file come back as `Rejected` or `Failed`.

use std::path::Path;

pub mod text_heuristic;
pub mod validity;

pub use text_heuristic::TextHeuristic;
pub use validity::ValidityFilter;

/// Base filter trait that all pipeline gates implement
pub trait Filter {
    /// Apply the filter to the file at `path`
    fn filter(&self, path: &Path) -> FilterDecision;

    /// Get the name of this filter for debugging/logging
    fn name(&self) -> &'static str;

    /// Convenience check collapsing every non-accept to `false`
    fn accepts(&self, path: &Path) -> bool {
        self.filter(path).is_accepted()
    }
}

/// Decision for whether a file continues down the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Continue processing this file
    Accepted,
    /// The file is fine but does not qualify
    Rejected(String),
    /// The file could not be examined (decoder error, I/O error)
    Failed(String),
}

impl FilterDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accepted)
    }
}
