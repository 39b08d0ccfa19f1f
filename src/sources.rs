//! Source collection for the CLI.
//!
//! Turns command-line inputs into in-memory [`SourceFile`]s, in the order the
//! batch will process them:
//!
//! - A **file** argument is always included, whatever its extension. If it is
//!   not an image it fails later as a per-item decode failure.
//! - A **directory** argument is walked recursively in file-name order. Only
//!   files with a supported image extension are picked up; hidden entries
//!   (dot-prefixed) are skipped.
//!
//! Files found by walking are named relative to the directory they were found
//! under (`team/front.jpg`), explicit files keep the path as typed.

use crate::imaging::supported_input_extensions;
use crate::package::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("input not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A resolved input: where to read it from and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    pub path: PathBuf,
    pub name: String,
}

/// Expand inputs into a flat, ordered list of files.
pub fn collect_paths(inputs: &[PathBuf]) -> Result<Vec<SourcePath>, SourceError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk_directory(input, &mut paths)?;
        } else if input.is_file() {
            paths.push(SourcePath {
                path: input.clone(),
                name: input.to_string_lossy().into_owned(),
            });
        } else {
            return Err(SourceError::NotFound(input.clone()));
        }
    }
    Ok(paths)
}

/// Collect and read every input.
pub fn load_sources(inputs: &[PathBuf]) -> Result<Vec<SourceFile>, SourceError> {
    collect_paths(inputs)?
        .into_iter()
        .map(|sp| {
            let bytes = fs::read(&sp.path).map_err(|source| SourceError::Read {
                path: sp.path.clone(),
                source,
            })?;
            Ok(SourceFile::new(sp.name, bytes))
        })
        .collect()
}

fn walk_directory(root: &Path, paths: &mut Vec<SourcePath>) -> Result<(), SourceError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_image_extension(entry.path()) {
            continue;
        }
        let name = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        paths.push(SourcePath {
            path: entry.into_path(),
            name,
        });
    }
    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn has_image_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}
