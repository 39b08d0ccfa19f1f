//! Artifact rendering.
//!
//! Combines the crop planner, the backend and the overlay into one
//! `(source, spec) → Artifact` transform:
//!
//! ```text
//! bytes ─decode─▶ RGBA ─plan─▶ CropRegion ─crop+resize─▶ spec-sized RGBA
//!       ─over transparent canvas─▶ [─over guide overlay─▶] ─encode─▶ PNG
//! ```
//!
//! Any failure aborts only the artifact being rendered.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{CropError, CropPlanner, CropRegion, Dimensions};
use super::overlay::guide_overlay;
use super::params::RenderOptions;
use crate::catalog::OutputSpec;
use crate::naming::artifact_name;
use image::{RgbaImage, imageops};
use serde::Serialize;
use thiserror::Error;

/// Why a single artifact could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RenderError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("{0}")]
    DegenerateCrop(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("time budget exhausted before rendering started")]
    DeadlineExceeded,
}

impl From<BackendError> for RenderError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => RenderError::Decode(msg),
            BackendError::Encode(msg) => RenderError::Encode(msg),
        }
    }
}

impl From<CropError> for RenderError {
    fn from(err: CropError) -> Self {
        RenderError::DegenerateCrop(err.to_string())
    }
}

/// One generated, named, encoded output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub spec: OutputSpec,
    /// Region of the source that was kept.
    pub crop: CropRegion,
    pub bytes: Vec<u8>,
}

/// Pixel stage of rendering: everything but decode and encode.
///
/// Returns the final composite and the crop that was applied.
pub fn compose(
    backend: &impl ImageBackend,
    planner: &dyn CropPlanner,
    source: &RgbaImage,
    spec: &OutputSpec,
    options: &RenderOptions,
) -> Result<(RgbaImage, CropRegion), RenderError> {
    let region = planner.plan(
        Dimensions::new(source.width(), source.height()),
        Dimensions::new(spec.width, spec.height),
    )?;
    let resized = backend.crop_resize(source, region, spec.width, spec.height);

    // Fully transparent canvas; alpha of the photo is carried through.
    let mut canvas = RgbaImage::new(spec.width, spec.height);
    imageops::overlay(&mut canvas, &resized, 0, 0);

    if options.show_guideline {
        let guide = guide_overlay(spec.width, spec.height, spec.category, &options.guide);
        imageops::overlay(&mut canvas, &guide, 0, 0);
    }

    Ok((canvas, region))
}

/// Render one artifact from raw source bytes.
///
/// `stem` is the already-allocated, collision-free stem for this source.
pub fn render_artifact(
    backend: &impl ImageBackend,
    planner: &dyn CropPlanner,
    bytes: &[u8],
    stem: &str,
    spec: &OutputSpec,
    options: &RenderOptions,
) -> Result<Artifact, RenderError> {
    let source = backend.decode(bytes)?;
    let (composite, crop) = compose(backend, planner, &source, spec, options)?;
    let encoded = backend.encode_png(&composite)?;

    Ok(Artifact {
        name: artifact_name(stem, spec),
        spec: *spec,
        crop,
        bytes: encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CATALOG, Category};
    use crate::imaging::Anchor;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::rust_backend::RustBackend;
    use crate::test_helpers::{corrupt_bytes, jpeg_bytes, png_bytes};
    use image::Rgba;

    fn avatar() -> OutputSpec {
        CATALOG[0]
    }

    fn hero_wide() -> OutputSpec {
        CATALOG[3]
    }

    // =========================================================================
    // Orchestration (mock backend)
    // =========================================================================

    #[test]
    fn render_runs_decode_crop_encode_in_order() {
        let backend = MockBackend::with_dimensions(4000, 3000);
        let artifact = render_artifact(
            &backend,
            &Anchor::Top,
            &[1, 2, 3, 4],
            "front",
            &avatar(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(artifact.name, "front-avatar_256x256.png");
        assert_eq!(artifact.crop.width(), 3000);
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Decode { len: 4 },
                RecordedOp::CropResize {
                    region: CropRegion {
                        left: 500,
                        top: 0,
                        right: 3500,
                        bottom: 3000
                    },
                    width: 256,
                    height: 256
                },
                RecordedOp::EncodePng {
                    width: 256,
                    height: 256
                },
            ]
        );
    }

    #[test]
    fn render_portrait_to_hero_plans_top_crop() {
        let backend = MockBackend::with_dimensions(800, 1200);
        render_artifact(
            &backend,
            &Anchor::Top,
            &[0],
            "side",
            &hero_wide(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(matches!(
            backend.get_operations()[1],
            RecordedOp::CropResize {
                region: CropRegion {
                    left: 0,
                    top: 0,
                    right: 800,
                    bottom: 491
                },
                width: 1500,
                height: 920
            }
        ));
    }

    #[test]
    fn render_uses_supplied_planner() {
        let backend = MockBackend::with_dimensions(800, 1200);
        render_artifact(
            &backend,
            &Anchor::Center,
            &[0],
            "side",
            &hero_wide(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(matches!(
            backend.get_operations()[1],
            RecordedOp::CropResize {
                region: CropRegion { top: 354, .. },
                ..
            }
        ));
    }

    #[test]
    fn decode_failure_stops_before_crop() {
        let backend = MockBackend::failing_decode();
        let err = render_artifact(
            &backend,
            &Anchor::Top,
            &[],
            "x",
            &avatar(),
            &RenderOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::Decode(_)));
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn degenerate_crop_stops_before_resize() {
        let backend = MockBackend::with_dimensions(1, 1000);
        let spec = OutputSpec::new(Category::Hero, 1500, 500).unwrap();
        let err = render_artifact(
            &backend,
            &Anchor::Top,
            &[0],
            "x",
            &spec,
            &RenderOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::DegenerateCrop(_)));
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn encode_failure_is_reported() {
        let backend = MockBackend::failing_encode(300, 300);
        let err = render_artifact(
            &backend,
            &Anchor::Top,
            &[0],
            "x",
            &avatar(),
            &RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }

    // =========================================================================
    // Compositing
    // =========================================================================

    #[test]
    fn compose_without_guide_keeps_transparent_photo_transparent() {
        let backend = RustBackend::new();
        let src = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let (out, _) =
            compose(&backend, &Anchor::Top, &src, &avatar(), &RenderOptions::default()).unwrap();
        assert_eq!(out.dimensions(), (256, 256));
        assert!(out.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn compose_with_guide_marks_border_only_over_transparent_photo() {
        let backend = RustBackend::new();
        let src = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let options = RenderOptions::with_guideline(true);
        let (out, _) = compose(&backend, &Anchor::Top, &src, &avatar(), &options).unwrap();

        let corner = out.get_pixel(0, 0).0;
        assert_eq!(&corner[..3], &[255, 255, 255]);
        assert!(corner[3].abs_diff(options.guide.border_color.0[3]) <= 1);
        assert_eq!(out.get_pixel(128, 128).0[3], 0);
    }

    #[test]
    fn compose_opaque_photo_stays_opaque_under_guide() {
        let backend = RustBackend::new();
        let src = RgbaImage::from_pixel(300, 200, Rgba([40, 80, 120, 255]));
        let options = RenderOptions::with_guideline(true);
        let (out, _) = compose(&backend, &Anchor::Top, &src, &hero_wide(), &options).unwrap();

        assert!(out.pixels().all(|p| p.0[3] >= 254));
        // Guide blended over the photo lightens the border.
        assert!(out.get_pixel(0, 0).0[0] > 100);
        let interior = out.get_pixel(700, 100).0;
        for (got, want) in interior.iter().zip([40u8, 80, 120, 255]) {
            assert!(got.abs_diff(want) <= 1, "{interior:?}");
        }
    }

    // =========================================================================
    // End-to-end with the real backend
    // =========================================================================

    #[test]
    fn every_catalog_spec_decodes_to_exact_dimensions() {
        let backend = RustBackend::new();
        let bytes = jpeg_bytes(120, 90);
        for spec in CATALOG {
            let artifact = render_artifact(
                &backend,
                &Anchor::Top,
                &bytes,
                "front",
                &spec,
                &RenderOptions::with_guideline(spec.category == Category::Hero),
            )
            .unwrap();

            let decoded = image::load_from_memory(&artifact.bytes).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                (spec.width, spec.height),
                "{spec}"
            );
            assert!(decoded.color().has_alpha());
        }
    }

    #[test]
    fn png_alpha_survives_render() {
        let backend = RustBackend::new();
        // Source whose first column is transparent.
        let artifact = render_artifact(
            &backend,
            &Anchor::Top,
            &png_bytes(256, 256),
            "logo",
            &avatar(),
            &RenderOptions::default(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 128).0[3], 0);
        assert_eq!(decoded.get_pixel(128, 128).0[3], 255);
    }

    #[test]
    fn corrupt_bytes_yield_decode_error() {
        let err = render_artifact(
            &RustBackend::new(),
            &Anchor::Top,
            &corrupt_bytes(),
            "broken",
            &avatar(),
            &RenderOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }
}
