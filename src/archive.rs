//! ZIP packaging of rendered artifacts.
//!
//! Entries are written in the order given, deflate-compressed, with the
//! zip crate's fixed default timestamp so the same artifacts always produce
//! the same archive bytes.

use crate::imaging::Artifact;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("duplicate archive entry '{0}'")]
    DuplicateEntry(String),
}

/// Serialize artifacts into an in-memory ZIP.
///
/// Entry names must be unique; a repeat is an error rather than a silent
/// overwrite.
pub fn write_archive(artifacts: &[Artifact]) -> Result<Vec<u8>, ArchiveError> {
    let mut seen = HashSet::new();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        if !seen.insert(artifact.name.as_str()) {
            return Err(ArchiveError::DuplicateEntry(artifact.name.clone()));
        }
        zip.start_file(artifact.name.as_str(), options)?;
        zip.write_all(&artifact.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
