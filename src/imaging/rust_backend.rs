//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | Crop | `image::imageops::crop_imm` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA8) |

use super::backend::{BackendError, ImageBackend};
use super::calculations::CropRegion;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use std::sync::LazyLock;

/// Input formats the pipeline accepts, by file extension.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Resampling kernel. Smooth and separable, applied identically on both axes.
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, BackendError> {
        // Format comes from the content, not the filename.
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(BackendError::Decode("unrecognized image format".into()));
        }
        let img = reader
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(img.to_rgba8())
    }

    fn crop_resize(
        &self,
        image: &RgbaImage,
        region: CropRegion,
        width: u32,
        height: u32,
    ) -> RgbaImage {
        let cropped = imageops::crop_imm(
            image,
            region.left,
            region.top,
            region.width(),
            region.height(),
        )
        .to_image();
        if cropped.dimensions() == (width, height) {
            return cropped;
        }
        imageops::resize(&cropped, width, height, RESAMPLE_FILTER)
    }

    fn encode_png(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{corrupt_bytes, jpeg_bytes, png_bytes, tiff_bytes};
    use crate::imaging::Dimensions;
    use image::Rgba;

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn decode_jpeg_adds_alpha() {
        let img = RustBackend::new().decode(&jpeg_bytes(64, 48)).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn decode_png_preserves_alpha() {
        let img = RustBackend::new().decode(&png_bytes(20, 10)).unwrap();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(19, 0).0[3], 255);
    }

    #[test]
    fn decode_tiff() {
        let img = RustBackend::new().decode(&tiff_bytes(30, 40)).unwrap();
        assert_eq!(img.dimensions(), (30, 40));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let result = RustBackend::new().decode(&corrupt_bytes());
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_empty_is_decode_error() {
        assert!(matches!(
            RustBackend::new().decode(&[]),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn crop_resize_exact_dimensions() {
        let src = RgbaImage::from_pixel(400, 300, Rgba([10, 20, 30, 255]));
        let region = CropRegion {
            left: 50,
            top: 0,
            right: 350,
            bottom: 300,
        };
        let out = RustBackend::new().crop_resize(&src, region, 256, 256);
        assert_eq!(out.dimensions(), (256, 256));
    }

    #[test]
    fn crop_resize_takes_pixels_from_region() {
        // Left half red, right half blue; crop only the blue half.
        let src = RgbaImage::from_fn(100, 50, |x, _| {
            if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let region = CropRegion {
            left: 50,
            top: 0,
            right: 100,
            bottom: 50,
        };
        let out = RustBackend::new().crop_resize(&src, region, 20, 20);
        let p = out.get_pixel(10, 10).0;
        assert!(p[2] > 200 && p[0] < 50, "expected blue, got {p:?}");
    }

    #[test]
    fn crop_resize_keeps_transparency() {
        let src = RgbaImage::from_pixel(80, 80, Rgba([0, 0, 0, 0]));
        let region = CropRegion::full(Dimensions::new(80, 80));
        let out = RustBackend::new().crop_resize(&src, region, 40, 40);
        assert!(out.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn encode_png_roundtrip_dimensions() {
        let backend = RustBackend::new();
        let img = RgbaImage::from_pixel(33, 17, Rgba([1, 2, 3, 128]));
        let bytes = backend.encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (33, 17));
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
    }
}
