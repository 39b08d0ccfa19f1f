//! Guide overlay synthesis.
//!
//! An overlay is a transparent canvas of exactly the target size holding
//! only guide marks:
//!
//! ```text
//! ━ ━ ━ ━ ━ ━ ━ ━ ━ ━      dashed border on all four edges,
//! ┃                  ┃      dash and gap both `dash_length`,
//!                           phase starting at pixel 0
//! ━━━━━━━━━━━━━━━━━━━━      hero only: solid line at round(0.4 · height)
//! ┃                  ┃
//! ━ ━ ━ ━ ━ ━ ━ ━ ━ ━
//! ```
//!
//! The result depends only on `(width, height, category, style)`.

use super::params::GuideStyle;
use crate::catalog::Category;
use image::RgbaImage;

/// Build the guide overlay for one output.
pub fn guide_overlay(width: u32, height: u32, category: Category, style: &GuideStyle) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    draw_dashed_border(&mut canvas, style);
    if category == Category::Hero {
        draw_reference_line(&mut canvas, style);
    }
    canvas
}

/// Whether position `i` along an edge falls on a dash.
fn on_dash(i: u32, dash_length: u32) -> bool {
    dash_length == 0 || (i / dash_length) % 2 == 0
}

fn draw_dashed_border(canvas: &mut RgbaImage, style: &GuideStyle) {
    let (w, h) = canvas.dimensions();
    let stroke = style.border_stroke.min(w).min(h);

    for x in (0..w).filter(|&x| on_dash(x, style.dash_length)) {
        for t in 0..stroke {
            canvas.put_pixel(x, t, style.border_color);
            canvas.put_pixel(x, h - 1 - t, style.border_color);
        }
    }
    for y in (0..h).filter(|&y| on_dash(y, style.dash_length)) {
        for t in 0..stroke {
            canvas.put_pixel(t, y, style.border_color);
            canvas.put_pixel(w - 1 - t, y, style.border_color);
        }
    }
}

/// Row of the hero reference line, clamped to the canvas.
pub fn reference_line_row(height: u32, ratio: f64) -> u32 {
    let row = (height as f64 * ratio).round() as u32;
    row.min(height.saturating_sub(1))
}

fn draw_reference_line(canvas: &mut RgbaImage, style: &GuideStyle) {
    let (w, h) = canvas.dimensions();
    if h == 0 || style.line_stroke == 0 {
        return;
    }
    let center = reference_line_row(h, style.line_ratio);
    let above = (style.line_stroke - 1) / 2;
    let first = center.saturating_sub(above);
    let last = (first + style.line_stroke).min(h);

    for y in first..last {
        for x in 0..w {
            canvas.put_pixel(x, y, style.line_color);
        }
    }
}
