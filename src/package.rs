//! Batch rendering and packaging.
//!
//! Drives the renderer over every `(source, spec)` pair and packs the
//! successes into one ZIP.
//!
//! ## Order
//!
//! Sources are visited in upload order; within a source, catalog specs are
//! visited in canonical catalog order no matter how the caller listed them,
//! followed by any non-catalog specs in the order given. That order fixes the
//! progress events, the artifact list, the failure list and the archive
//! members.
//!
//! ## Parallel Processing
//!
//! The specs of one source are rendered in parallel with
//! [rayon](https://docs.rs/rayon). Results are collected by index, so the
//! order above holds regardless of which worker finishes first.
//!
//! ## Failures
//!
//! A decode, crop or encode failure becomes a [`FailureRecord`] and never
//! stops sibling work. Only an empty input is fatal up front, and a batch in
//! which everything failed produces no archive
//! ([`PackageError::NothingGenerated`]).
//!
//! ## Time Budget
//!
//! With [`BatchOptions::time_budget`] set, pairs that have not started when
//! the budget runs out are recorded as
//! [`RenderError::DeadlineExceeded`] and the batch returns what it has.

use crate::archive::{ArchiveError, write_archive};
use crate::catalog::{OutputSpec, specs_for};
use crate::imaging::{
    Anchor, Artifact, CropPlanner, CropRegion, ImageBackend, RenderError, RenderOptions,
    RustBackend, render_artifact,
};
use crate::naming::StemAllocator;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("nothing to do: {0}")]
    EmptyBatch(&'static str),
    #[error("no images were generated ({} failed)", failures.len())]
    NothingGenerated { failures: Vec<FailureRecord> },
    #[error("archive failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// One uploaded photo: display filename plus raw file bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Batch-wide switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Composite the guide overlay onto every artifact.
    pub show_guideline: bool,
    /// Crop policy used by [`render_batch`] and [`package`].
    pub anchor: Anchor,
    pub time_budget: Option<Duration>,
}

/// A per-item failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub source: String,
    pub spec: OutputSpec,
    pub error: RenderError,
}

/// Everything one batch produced.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<FailureRecord>,
}

/// A finished archive plus the result it was built from.
#[derive(Debug)]
pub struct PackagedBatch {
    pub archive: Vec<u8>,
    pub result: BatchResult,
}

/// Progress events, sent in batch order.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    SourceStarted {
        index: usize,
        name: String,
        spec_count: usize,
    },
    ArtifactRendered {
        source: String,
        name: String,
        spec: OutputSpec,
        crop: CropRegion,
        size: usize,
    },
    ArtifactFailed {
        source: String,
        spec: OutputSpec,
        error: RenderError,
    },
}

/// Render every pair with the pure Rust backend.
pub fn render_batch(
    sources: &[SourceFile],
    specs: &[OutputSpec],
    options: &BatchOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchResult, PackageError> {
    let backend = RustBackend::new();
    render_batch_with_backend(&backend, &options.anchor, sources, specs, options, events)
}

/// Render every pair using a specific backend and crop planner (allows
/// testing with mocks and alternate policies).
pub fn render_batch_with_backend(
    backend: &impl ImageBackend,
    planner: &dyn CropPlanner,
    sources: &[SourceFile],
    specs: &[OutputSpec],
    options: &BatchOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchResult, PackageError> {
    if sources.is_empty() {
        return Err(PackageError::EmptyBatch("no source images provided"));
    }
    let specs = batch_specs(specs);
    if specs.is_empty() {
        return Err(PackageError::EmptyBatch("no output sizes selected"));
    }

    let deadline = options.time_budget.map(|budget| Instant::now() + budget);
    let render_options = RenderOptions::with_guideline(options.show_guideline);
    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    };

    let mut stems = StemAllocator::new();
    let mut result = BatchResult::default();

    for (index, source) in sources.iter().enumerate() {
        let stem = stems.allocate(&source.name);
        emit(ProcessEvent::SourceStarted {
            index: index + 1,
            name: source.name.clone(),
            spec_count: specs.len(),
        });

        let outcomes: Vec<Result<Artifact, RenderError>> = specs
            .par_iter()
            .map(|spec| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return Err(RenderError::DeadlineExceeded);
                }
                render_artifact(
                    backend,
                    planner,
                    &source.bytes,
                    &stem,
                    spec,
                    &render_options,
                )
            })
            .collect();

        for (spec, outcome) in specs.iter().zip(outcomes) {
            match outcome {
                Ok(artifact) => {
                    emit(ProcessEvent::ArtifactRendered {
                        source: source.name.clone(),
                        name: artifact.name.clone(),
                        spec: *spec,
                        crop: artifact.crop,
                        size: artifact.bytes.len(),
                    });
                    result.artifacts.push(artifact);
                }
                Err(error) => {
                    emit(ProcessEvent::ArtifactFailed {
                        source: source.name.clone(),
                        spec: *spec,
                        error: error.clone(),
                    });
                    result.failures.push(FailureRecord {
                        source: source.name.clone(),
                        spec: *spec,
                        error,
                    });
                }
            }
        }
    }

    Ok(result)
}

/// Render with the pure Rust backend and pack the successes.
pub fn package(
    sources: &[SourceFile],
    specs: &[OutputSpec],
    options: &BatchOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<PackagedBatch, PackageError> {
    let backend = RustBackend::new();
    package_with_backend(&backend, &options.anchor, sources, specs, options, events)
}

/// Render with a specific backend and planner, then pack the successes.
pub fn package_with_backend(
    backend: &impl ImageBackend,
    planner: &dyn CropPlanner,
    sources: &[SourceFile],
    specs: &[OutputSpec],
    options: &BatchOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<PackagedBatch, PackageError> {
    let result = render_batch_with_backend(backend, planner, sources, specs, options, events)?;
    if result.artifacts.is_empty() {
        return Err(PackageError::NothingGenerated {
            failures: result.failures,
        });
    }
    let archive = write_archive(&result.artifacts)?;
    Ok(PackagedBatch { archive, result })
}

/// Catalog rows in canonical order, then custom specs; no repeats.
fn batch_specs(specs: &[OutputSpec]) -> Vec<OutputSpec> {
    let mut ordered = specs_for(specs);
    for spec in specs {
        if !ordered.contains(spec) {
            ordered.push(*spec);
        }
    }
    ordered
}

// ============================================================================
// JSON report
// ============================================================================

/// Serializable summary of a batch, written by `generate --report`.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub artifacts: Vec<ArtifactEntry>,
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub spec: String,
    pub width: u32,
    pub height: u32,
    pub crop: CropRegion,
    pub bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct FailureEntry {
    pub source: String,
    pub spec: String,
    pub error: String,
}

impl BatchResult {
    pub fn report(&self) -> BatchReport {
        BatchReport {
            artifacts: self
                .artifacts
                .iter()
                .map(|a| ArtifactEntry {
                    name: a.name.clone(),
                    spec: a.spec.key(),
                    width: a.spec.width,
                    height: a.spec.height,
                    crop: a.crop,
                    bytes: a.bytes.len(),
                })
                .collect(),
            failures: self.failures.iter().map(FailureEntry::from).collect(),
        }
    }
}

impl From<&FailureRecord> for FailureEntry {
    fn from(record: &FailureRecord) -> Self {
        Self {
            source: record.source.clone(),
            spec: record.spec.key(),
            error: record.error.to_string(),
        }
    }
}
