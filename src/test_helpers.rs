//! Shared test utilities for the portrait-kit test suite.
//!
//! Sources are synthesized in memory so no fixture files are needed:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let front = source("front.jpg", jpeg_bytes(120, 90));
//! let broken = source("broken.jpg", corrupt_bytes());
//! ```

use crate::package::SourceFile;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Encoded sources
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A valid JPEG with a gradient.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Jpeg)
}

/// A valid RGBA PNG: first column fully transparent, everything else opaque.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x == 0 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, alpha])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// A valid RGB TIFF.
pub fn tiff_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Tiff)
}

/// Bytes no decoder will accept.
pub fn corrupt_bytes() -> Vec<u8> {
    b"this is not an image, just a text file renamed to .jpg".to_vec()
}

// =========================================================================
// Batch inputs
// =========================================================================

pub fn source(name: &str, bytes: Vec<u8>) -> SourceFile {
    SourceFile::new(name, bytes)
}
