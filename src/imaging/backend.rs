//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait covers the three pixel operations the renderer
//! needs: decode, crop-and-resize, and PNG encode. Crop planning, overlay
//! geometry and compositing stay outside the backend so they can be tested
//! without decoding anything.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::calculations::CropRegion;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Trait for image processing backends.
///
/// Implementations never mutate their inputs; every operation returns a new
/// buffer. `Sync` is required because batches render on rayon workers.
pub trait ImageBackend: Sync {
    /// Decode raw file bytes into an RGBA raster.
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError>;

    /// Cut `region` out of `image` and resample it to exactly `width`×`height`.
    fn crop_resize(&self, image: &RgbaImage, region: CropRegion, width: u32, height: u32)
    -> RgbaImage;

    /// Serialize a raster as PNG.
    fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError>;
}
