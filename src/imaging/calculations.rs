//! Crop planning: pure functions over dimensions.
//!
//! Nothing here touches pixels. A planner receives the source and target
//! dimensions and answers with the region of the source to keep, chosen so
//! that the region has the target's aspect ratio. The subsequent resize then
//! scales both axes by the same factor and the output is never stretched.
//!
//! Aspect comparisons are done by cross-multiplication in `u64`, and rounding
//! is integer round-half-up, so a plan is identical on every platform.

use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Width and height of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel bounds into a source image: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRegion {
    /// The region covering the whole source.
    pub fn full(source: Dimensions) -> Self {
        Self {
            left: 0,
            top: 0,
            right: source.width,
            bottom: source.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error(
        "crop collapses to {crop_width}x{crop_height} for a {source_width}x{source_height} source \
         at target {target_width}x{target_height}"
    )]
    Degenerate {
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        crop_width: u32,
        crop_height: u32,
    },
}

/// A crop strategy.
///
/// Implementations must be pure: the same `(source, target)` always yields
/// the same region. The region must lie inside the source and match the
/// target aspect within one pixel of rounding.
pub trait CropPlanner: Sync {
    fn plan(&self, source: Dimensions, target: Dimensions) -> Result<CropRegion, CropError>;
}

/// Which edge of the source survives when the source is too tall.
///
/// Both policies center horizontally when the source is too wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Keep the top edge; trim from the bottom. Subjects are framed from the
    /// top, so this keeps head and shoulders.
    #[default]
    Top,
    /// Trim evenly from top and bottom.
    Center,
}

impl CropPlanner for Anchor {
    fn plan(&self, source: Dimensions, target: Dimensions) -> Result<CropRegion, CropError> {
        let degenerate = |crop_width, crop_height| CropError::Degenerate {
            source_width: source.width,
            source_height: source.height,
            target_width: target.width,
            target_height: target.height,
            crop_width,
            crop_height,
        };

        if source.width == 0 || source.height == 0 || target.width == 0 || target.height == 0 {
            return Err(degenerate(source.width, source.height));
        }

        let (crop_w, crop_h) = calculate_crop_size(source, target);
        if crop_w == 0 || crop_h == 0 {
            return Err(degenerate(crop_w, crop_h));
        }

        let left = (source.width - crop_w) / 2;
        let top = match self {
            Anchor::Top => 0,
            Anchor::Center => (source.height - crop_h) / 2,
        };

        Ok(CropRegion {
            left,
            top,
            right: left + crop_w,
            bottom: top + crop_h,
        })
    }
}

/// Plan a crop with the default top-anchored, horizontally centered policy.
pub fn plan_crop(source: Dimensions, target: Dimensions) -> Result<CropRegion, CropError> {
    Anchor::Top.plan(source, target)
}

/// Size of the largest target-aspect region that fits inside the source.
///
/// A relatively wider source keeps its full height; a relatively taller one
/// keeps its full width; an equal aspect keeps everything. The result is
/// clamped to the source and may be zero on one axis for extreme inputs.
pub fn calculate_crop_size(source: Dimensions, target: Dimensions) -> (u32, u32) {
    let (src_w, src_h) = (source.width as u64, source.height as u64);
    let (tgt_w, tgt_h) = (target.width as u64, target.height as u64);

    match (src_w * tgt_h).cmp(&(tgt_w * src_h)) {
        Ordering::Greater => {
            let w = round_div(src_h * tgt_w, tgt_h).min(src_w);
            (w as u32, source.height)
        }
        Ordering::Less => {
            let h = round_div(src_w * tgt_h, tgt_w).min(src_h);
            (source.width, h as u32)
        }
        Ordering::Equal => (source.width, source.height),
    }
}

/// `numerator / denominator` rounded half-up.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}
