//! Edge-density estimate of whether an image contains text
//!
//! Rendered glyphs produce many short, high-contrast edges. Counting Canny
//! edge pixels is far cheaper than OCR and weeds out photos of blank walls,
//! solid fills and gradients. A false negative here drops the file from OCR
//! consideration entirely; a false positive only costs an extra OCR call.

use super::{Filter, FilterDecision};
use image::{GrayImage, ImageReader};
use imageproc::edges::canny;
use std::path::Path;

/// Canny edge-density gate
#[derive(Debug, Clone)]
pub struct TextHeuristic {
    low_threshold: f32,
    high_threshold: f32,
    density_threshold: f64,
}

impl TextHeuristic {
    pub fn new(low_threshold: f32, high_threshold: f32, density_threshold: f64) -> Self {
        Self {
            low_threshold,
            high_threshold,
            density_threshold,
        }
    }

    /// Fraction of pixels classified as edges
    pub fn edge_density(&self, gray: &GrayImage) -> f64 {
        let total = u64::from(gray.width()) * u64::from(gray.height());
        if total == 0 {
            return 0.0;
        }

        let edges = canny(gray, self.low_threshold, self.high_threshold);
        let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
        edge_pixels as f64 / total as f64
    }

    fn decode_gray(path: &Path) -> anyhow::Result<GrayImage> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(image.to_luma8())
    }
}

impl Filter for TextHeuristic {
    fn filter(&self, path: &Path) -> FilterDecision {
        let gray = match Self::decode_gray(path) {
            Ok(gray) => gray,
            Err(e) => {
                tracing::error!("Text heuristic failed for {}: {}", path.display(), e);
                return FilterDecision::Failed(e.to_string());
            }
        };

        let density = self.edge_density(&gray);
        tracing::trace!(path = %path.display(), density, "edge density");

        if density > self.density_threshold {
            FilterDecision::Accepted
        } else {
            FilterDecision::Rejected(format!(
                "edge density {density:.4} not above {}",
                self.density_threshold
            ))
        }
    }

    fn name(&self) -> &'static str {
        "TextHeuristic"
    }
}
