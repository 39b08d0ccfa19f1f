//! Image processing in pure Rust, no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Crop plan** | [`CropPlanner`], default [`Anchor::Top`] |
//! | **Crop + resize** | `crop_imm` + Lanczos3 `resize` |
//! | **Guide overlay** | [`guide_overlay`] |
//! | **Composite** | `image::imageops::overlay` (straight alpha-over) |
//! | **Encode** | PNG, RGBA8 |
//!
//! The module is split into:
//! - **Calculations**: Pure crop planning over dimensions (unit testable)
//! - **Parameters**: Overlay style and per-render switches
//! - **Overlay**: Guide raster synthesis
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`render_artifact`], combining all of the above

pub mod backend;
mod calculations;
pub mod operations;
pub mod overlay;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    Anchor, CropError, CropPlanner, CropRegion, Dimensions, calculate_crop_size, plan_crop,
};
pub use operations::{Artifact, RenderError, compose, render_artifact};
pub use overlay::guide_overlay;
pub use params::{GuideStyle, RenderOptions};
pub use rust_backend::{RustBackend, supported_input_extensions};
