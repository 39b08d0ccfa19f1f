//! Artifact naming.
//!
//! Every artifact is named `{stem}-{category}_{width}x{height}.png`, where
//! `stem` is the source filename without directory or extension:
//!
//! - `front.jpg` + avatar 256x256 → `front-avatar_256x256.png`
//! - `shots/Side View.tiff` + hero 1500x920 → `Side View-hero_1500x920.png`
//!
//! ## Collisions
//!
//! Two uploads can share a stem (`front.jpg` and `front.png`, or two files
//! from different folders). Silently overwriting one with the other loses
//! work, so stems are made unique per batch with [`StemAllocator`]: the first
//! source keeps its stem and later ones get `-2`, `-3`, … appended. Since the
//! suffix after the stem is fixed by the output size, unique stems give unique
//! artifact names.

use crate::catalog::OutputSpec;
use std::collections::HashSet;
use std::path::Path;

/// Stem used when a filename has none (e.g. an empty display name).
pub const FALLBACK_STEM: &str = "image";

/// Filename stem: last path component, extension removed.
///
/// Both `/` and `\` count as separators since display names may come from
/// either platform.
pub fn source_stem(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Deterministic artifact name for a stem and spec.
pub fn artifact_name(stem: &str, spec: &OutputSpec) -> String {
    format!(
        "{}-{}_{}x{}.png",
        stem, spec.category, spec.width, spec.height
    )
}

/// Hands out batch-unique stems in call order.
#[derive(Debug, Default)]
pub struct StemAllocator {
    taken: HashSet<String>,
}

impl StemAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a stem for `filename`, disambiguating against earlier claims.
    pub fn allocate(&mut self, filename: &str) -> String {
        let base = source_stem(filename);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    #[test]
    fn stem_strips_extension() {
        assert_eq!(source_stem("front.jpg"), "front");
    }

    #[test]
    fn stem_strips_unix_directories() {
        assert_eq!(source_stem("shots/2024/front.tiff"), "front");
    }

    #[test]
    fn stem_strips_windows_directories() {
        assert_eq!(source_stem(r"C:\shots\side.png"), "side");
    }

    #[test]
    fn stem_keeps_inner_dots() {
        assert_eq!(source_stem("athlete.front.v2.jpg"), "athlete.front.v2");
    }

    #[test]
    fn stem_without_extension() {
        assert_eq!(source_stem("portrait"), "portrait");
    }

    #[test]
    fn stem_keeps_spaces() {
        assert_eq!(source_stem("Side View.jpg"), "Side View");
    }

    #[test]
    fn empty_filename_falls_back() {
        assert_eq!(source_stem(""), FALLBACK_STEM);
        assert_eq!(source_stem("dir/"), FALLBACK_STEM);
    }

    #[test]
    fn artifact_name_format() {
        assert_eq!(artifact_name("front", &CATALOG[0]), "front-avatar_256x256.png");
        assert_eq!(artifact_name("side", &CATALOG[2]), "side-hero_1200x1165.png");
    }

    #[test]
    fn allocator_keeps_first_stem() {
        let mut stems = StemAllocator::new();
        assert_eq!(stems.allocate("front.jpg"), "front");
        assert_eq!(stems.allocate("side.jpg"), "side");
    }

    #[test]
    fn allocator_suffixes_repeats() {
        let mut stems = StemAllocator::new();
        assert_eq!(stems.allocate("photo.jpg"), "photo");
        assert_eq!(stems.allocate("a/photo.png"), "photo-2");
        assert_eq!(stems.allocate("b/photo.tif"), "photo-3");
    }

    #[test]
    fn allocator_skips_suffix_taken_by_real_file() {
        let mut stems = StemAllocator::new();
        assert_eq!(stems.allocate("photo-2.jpg"), "photo-2");
        assert_eq!(stems.allocate("photo.jpg"), "photo");
        assert_eq!(stems.allocate("photo.png"), "photo-3");
    }
}
