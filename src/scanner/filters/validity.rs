//! Structural image validation
//!
//! Rejects anything that is not a supported, decodable image of at least the
//! configured dimensions. The whole file is decoded, so truncated or corrupt
//! pixel data fails here rather than in a later stage.

use super::{Filter, FilterDecision};
use image::ImageReader;
use std::collections::HashSet;
use std::path::Path;

/// Extension allow-list plus minimum size check
#[derive(Debug, Clone)]
pub struct ValidityFilter {
    extensions: HashSet<String>,
    min_width: u32,
    min_height: u32,
}

impl ValidityFilter {
    pub fn new(extensions: HashSet<String>, min_width: u32, min_height: u32) -> Self {
        Self {
            extensions: extensions.into_iter().map(|ext| ext.to_lowercase()).collect(),
            min_width,
            min_height,
        }
    }

    /// Check the extension without touching the file system
    pub fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    fn read_dimensions(path: &Path) -> Result<(u32, u32), String> {
        let image = ImageReader::open(path)
            .map_err(|e| format!("cannot open: {e}"))?
            .with_guessed_format()
            .map_err(|e| format!("cannot read header: {e}"))?
            .decode()
            .map_err(|e| format!("not a valid image: {e}"))?;
        Ok((image.width(), image.height()))
    }
}

impl Filter for ValidityFilter {
    fn filter(&self, path: &Path) -> FilterDecision {
        if !self.has_supported_extension(path) {
            return FilterDecision::Rejected("unsupported extension".to_string());
        }

        let (width, height) = match Self::read_dimensions(path) {
            Ok(dimensions) => dimensions,
            Err(cause) => return FilterDecision::Failed(cause),
        };

        if width < self.min_width || height < self.min_height {
            return FilterDecision::Rejected(format!(
                "too small: {width}x{height} (minimum {}x{})",
                self.min_width, self.min_height
            ));
        }

        FilterDecision::Accepted
    }

    fn name(&self) -> &'static str {
        "ValidityFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::fixtures;
    use crate::scanner::types::ScannerConfig;
    use std::fs;
    use tempfile::TempDir;

    fn default_filter() -> ValidityFilter {
        let config = ScannerConfig::default();
        ValidityFilter::new(config.extensions, config.min_width, config.min_height)
    }

    #[test]
    fn test_valid_image_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.png");
        fixtures::write_blank(&path, 300, 300);

        assert_eq!(default_filter().filter(&path), FilterDecision::Accepted);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("SHOUTY.PNG");
        fixtures::write_blank(&path, 120, 80);

        assert!(default_filter().accepts(&path));
    }

    #[test]
    fn test_unsupported_extension_rejected_without_opening() {
        // The file does not exist: an open attempt would produce `Failed`
        let decision = default_filter().filter(Path::new("/definitely/missing/file.gif"));
        assert_eq!(decision, FilterDecision::Rejected("unsupported extension".to_string()));

        let decision = default_filter().filter(Path::new("/definitely/missing/notes"));
        assert_eq!(decision, FilterDecision::Rejected("unsupported extension".to_string()));
    }

    #[test]
    fn test_corrupt_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.jpg");
        fs::write(&path, b"this is not a jpeg at all").unwrap();

        let decision = default_filter().filter(&path);
        assert!(matches!(decision, FilterDecision::Failed(_)), "got {decision:?}");
        assert!(!default_filter().accepts(&path));
    }

    #[test]
    fn test_truncated_pixel_data_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cut.png");
        fixtures::write_stripes(&path, 400, 150, 8);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let decision = default_filter().filter(&path);
        assert!(matches!(decision, FilterDecision::Failed(_)), "got {decision:?}");
    }

    #[test]
    fn test_too_small_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let tiny = temp_dir.path().join("tiny.png");
        let narrow = temp_dir.path().join("narrow.png");
        let short = temp_dir.path().join("short.png");
        fixtures::write_blank(&tiny, 10, 10);
        fixtures::write_blank(&narrow, 49, 400);
        fixtures::write_blank(&short, 400, 49);

        let filter = default_filter();
        for path in [&tiny, &narrow, &short] {
            assert!(
                matches!(filter.filter(path), FilterDecision::Rejected(_)),
                "{} should be rejected",
                path.display()
            );
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("medium.bmp");
        fixtures::write_blank(&path, 80, 80);

        let strict = ValidityFilter::new(["bmp".to_string()].into_iter().collect(), 100, 100);
        let lenient = ValidityFilter::new(["BMP".to_string()].into_iter().collect(), 50, 50);

        assert!(!strict.accepts(&path));
        assert!(lenient.accepts(&path));
    }
}
