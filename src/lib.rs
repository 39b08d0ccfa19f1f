//! # Portrait Kit
//!
//! Batch-converts source photographs into a fixed set of standardized avatar
//! and hero images: transparent RGBA PNGs at exact pixel sizes, cropped to the
//! target shape and optionally marked with a positioning guide, delivered as a
//! single ZIP.
//!
//! # Architecture: One Pass Per Pair
//!
//! Every `(source, size)` pair is an independent, in-memory transform:
//!
//! ```text
//! bytes → decode → plan crop → crop + resize → transparent canvas
//!       → [guide overlay] → PNG → archive entry
//! ```
//!
//! The batch driver runs pairs in parallel, restores a deterministic order
//! (sources in upload order, sizes in catalog order) and packs whatever
//! succeeded. A bad photo costs its own images and nothing else.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | The fixed table of output sizes and key lookup (`avatar_256x256`) |
//! | [`imaging`] | Crop planning, guide overlay, decode/resize/encode backend, single-artifact rendering |
//! | [`naming`] | Artifact names and per-batch stem disambiguation |
//! | [`package`] | Batch driver: ordering, parallelism, time budget, progress events, packaging |
//! | [`archive`] | ZIP writer |
//! | [`sources`] | Turns CLI file and directory arguments into in-memory sources |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Top-Anchored Crops
//!
//! Source photos are portraits of people framed from the top. When a photo is
//! taller than the target shape, the crop keeps the top of the frame and
//! trims from the bottom, so heads stay in shot. Centered cropping is
//! available as [`imaging::Anchor::Center`] for other material.
//!
//! ## Exact Integer Geometry
//!
//! Crop sizes are computed with integer cross-multiplication and
//! round-half-up division, never floating point, so the same photo yields the
//! same crop on every platform.
//!
//! ## Nothing In The Core Prints
//!
//! The library reports progress through [`package::ProcessEvent`] values sent
//! over a channel. The binary owns stdout and formats events with [`output`].

pub mod archive;
pub mod catalog;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod package;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_helpers;
