//! Image fixtures for unit tests

use image::{Rgb, RgbImage};
use std::ops::Range;
use std::path::Path;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Solid white image; no edges at all
pub fn write_blank(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, WHITE)
        .save(path)
        .unwrap();
}

/// Vertical black/white bars `stripe` pixels wide; dense edges
pub fn write_stripes(path: &Path, width: u32, height: u32, stripe: u32) {
    write_stripes_in(path, width, height, stripe, 0..width);
}

/// Bars only inside `columns`, white elsewhere. Different column ranges give
/// different perceptual hashes.
pub fn write_stripes_in(path: &Path, width: u32, height: u32, stripe: u32, columns: Range<u32>) {
    RgbImage::from_fn(width, height, |x, _| {
        if columns.contains(&x) && (x / stripe) % 2 == 0 { BLACK } else { WHITE }
    })
    .save(path)
    .unwrap();
}
