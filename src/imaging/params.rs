//! Parameter types for rendering.
//!
//! These structs describe *what* to draw, not *how*. [`GuideStyle`] holds the
//! overlay constants; they are fixed for a build and not exposed through
//! configuration, so every overlay of a given size and category is identical.

use image::Rgba;

/// Geometry and colors of the guide overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideStyle {
    /// Length of one dash; the gap after it has the same length.
    pub dash_length: u32,
    /// Thickness of the dashed border, measured inward from each edge.
    pub border_stroke: u32,
    pub border_color: Rgba<u8>,
    /// Vertical position of the hero reference line as a fraction of height.
    pub line_ratio: f64,
    /// Thickness of the hero reference line, centered on its row.
    pub line_stroke: u32,
    pub line_color: Rgba<u8>,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self {
            dash_length: 5,
            border_stroke: 1,
            border_color: Rgba([255, 255, 255, 200]),
            line_ratio: 0.4,
            line_stroke: 3,
            line_color: Rgba([255, 255, 255, 220]),
        }
    }
}

/// Per-artifact switches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    /// Composite the category guide over the photo.
    pub show_guideline: bool,
    pub guide: GuideStyle,
}

impl RenderOptions {
    pub fn with_guideline(show_guideline: bool) -> Self {
        Self {
            show_guideline,
            ..Self::default()
        }
    }
}
