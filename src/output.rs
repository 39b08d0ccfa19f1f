//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every source leads with its positional index and display name; each size
//! rendered from it follows as an indented line naming the size and where the
//! result went. Failures name both the source and the target size so a line
//! makes sense on its own, even when copied out of a long log.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! 001 front.jpg (4 sizes)
//!     avatar 256x256 → front-avatar_256x256.png (41.2 KB)
//!         Crop: 3000x3000 at (500, 0)
//!     hero 1500x920 → front-hero_1500x920.png (1.1 MB)
//!         Crop: 4000x2453 at (0, 0)
//! 002 broken.jpg (4 sizes)
//!     FAILED broken.jpg → avatar 256x256: decode failed: ...
//!
//! Generated 4 images from 2 sources → athlete_images.zip (1.9 MB)
//! 4 failed:
//!     broken.jpg → avatar 256x256: decode failed: ...
//! ```
//!
//! ## Catalog
//!
//! ```text
//! 001 avatar 256x256 (avatar_256x256)
//! 002 avatar 500x345 (avatar_500x345)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::catalog::OutputSpec;
use crate::imaging::CropRegion;
use crate::package::{BatchResult, FailureRecord, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn crop_line(crop: &CropRegion) -> String {
    format!(
        "Crop: {}x{} at ({}, {})",
        crop.width(),
        crop.height(),
        crop.left,
        crop.top
    )
}

/// One self-contained failure description: source, target size, reason.
fn failure_line(source: &str, spec: &OutputSpec, error: &impl std::fmt::Display) -> String {
    format!("{} → {}: {}", source, spec.label(), error)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::SourceStarted {
            index,
            name,
            spec_count,
        } => {
            vec![format!(
                "{} {} ({})",
                format_index(*index),
                name,
                plural(*spec_count, "size", "sizes")
            )]
        }
        ProcessEvent::ArtifactRendered {
            name,
            spec,
            crop,
            size,
            ..
        } => vec![
            format!(
                "{}{} → {} ({})",
                indent(1),
                spec.label(),
                name,
                format_size(*size)
            ),
            format!("{}{}", indent(2), crop_line(crop)),
        ],
        ProcessEvent::ArtifactFailed {
            source,
            spec,
            error,
        } => vec![format!(
            "{}FAILED {}",
            indent(1),
            failure_line(source, spec, error)
        )],
    }
}

// ============================================================================
// Batch summary
// ============================================================================

/// List every failure, one line each.
pub fn format_failures(failures: &[FailureRecord]) -> Vec<String> {
    if failures.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("{} failed:", failures.len())];
    for f in failures {
        lines.push(format!(
            "{}{}",
            indent(1),
            failure_line(&f.source, &f.spec, &f.error)
        ));
    }
    lines
}

/// Closing summary of a `generate` run.
///
/// `archive` is the written archive path and its size in bytes.
pub fn format_batch_summary(
    result: &BatchResult,
    source_count: usize,
    archive: (&Path, usize),
) -> Vec<String> {
    let (path, bytes) = archive;
    let mut lines = vec![format!(
        "Generated {} from {} → {} ({})",
        plural(result.artifacts.len(), "image", "images"),
        plural(source_count, "source", "sources"),
        path.display(),
        format_size(bytes)
    )];
    lines.extend(format_failures(&result.failures));
    lines
}

/// Print the closing summary to stdout.
pub fn print_batch_summary(result: &BatchResult, source_count: usize, archive: (&Path, usize)) {
    println!();
    for line in format_batch_summary(result, source_count, archive) {
        println!("{}", line);
    }
}

/// Closing summary of a `preview` run: one line per written file.
pub fn format_preview_output(result: &BatchResult, dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = result
        .artifacts
        .iter()
        .map(|a| format!("{} → {}", a.spec.label(), dir.join(&a.name).display()))
        .collect();
    lines.push(format!(
        "Wrote {} to {}",
        plural(result.artifacts.len(), "image", "images"),
        dir.display()
    ));
    lines.extend(format_failures(&result.failures));
    lines
}

pub fn print_preview_output(result: &BatchResult, dir: &Path) {
    println!();
    for line in format_preview_output(result, dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// The fixed catalog, with the key to pass to `--size`.
pub fn format_catalog(specs: &[OutputSpec]) -> Vec<String> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| format!("{} {} ({})", format_index(i + 1), spec.label(), spec.key()))
        .collect()
}

pub fn print_catalog(specs: &[OutputSpec]) {
    for line in format_catalog(specs) {
        println!("{}", line);
    }
}
