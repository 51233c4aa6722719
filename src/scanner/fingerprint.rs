//! Perceptual fingerprints for de-duplication
//!
//! A DCT mean hash (pHash) over the downscaled grayscale image. Re-encoding,
//! resizing or converting between formats leaves the hash unchanged in the
//! common case, so copies of one picture collapse to a single match.

use super::types::Fingerprint;
use anyhow::{Context, Result};
use image::ImageReader;
use image_hasher::{HashAlg, HasherConfig};
use std::path::Path;

/// Hash width and height in bits
const HASH_SIDE: u32 = 8;

#[derive(Debug, Clone, Default)]
pub struct Fingerprinter;

impl Fingerprinter {
    pub fn new() -> Self {
        Self
    }

    /// Decode the image at `path` and hash its pixels
    pub fn compute(&self, path: &Path) -> Result<Fingerprint> {
        let image = ImageReader::open(path)
            .with_context(|| format!("Failed to open image: {}", path.display()))?
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;

        let hasher = HasherConfig::new()
            .hash_size(HASH_SIDE, HASH_SIDE)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        let hash = hasher.hash_image(&image);
        Ok(Fingerprint::from_bytes(hash.as_bytes()))
    }
}
