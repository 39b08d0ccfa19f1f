//! The fixed catalog of output sizes.
//!
//! Every generated artifact targets one row of this table. The catalog is
//! static: there is no external configuration for it, only a selection of
//! which rows to produce.
//!
//! | key | category | width | height |
//! |---|---|---|---|
//! | `avatar_256x256` | avatar | 256 | 256 |
//! | `avatar_500x345` | avatar | 500 | 345 |
//! | `hero_1200x1165` | hero | 1200 | 1165 |
//! | `hero_1500x920` | hero | 1500 | 920 |
//!
//! The row order above is the canonical order. [`specs_for`] always returns
//! its result in that order, which in turn fixes the member order of the
//! generated archive.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Output family. Decides the overlay treatment and the name segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Avatar,
    Hero,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Avatar => "avatar",
            Category::Hero => "hero",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A target output: category plus exact pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputSpec {
    pub category: Category,
    pub width: u32,
    pub height: u32,
}

impl OutputSpec {
    /// Build a spec outside the catalog. Returns `None` for a zero dimension.
    pub fn new(category: Category, width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self {
            category,
            width,
            height,
        })
    }

    /// Stable identifier, e.g. `avatar_256x256`.
    pub fn key(&self) -> String {
        format!("{}_{}x{}", self.category, self.width, self.height)
    }

    /// Human label, e.g. `avatar 256x256`.
    pub fn label(&self) -> String {
        format!("{} {}x{}", self.category, self.width, self.height)
    }
}

impl fmt::Display for OutputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.category, self.width, self.height)
    }
}

/// The catalog, in canonical order.
pub const CATALOG: [OutputSpec; 4] = [
    OutputSpec {
        category: Category::Avatar,
        width: 256,
        height: 256,
    },
    OutputSpec {
        category: Category::Avatar,
        width: 500,
        height: 345,
    },
    OutputSpec {
        category: Category::Hero,
        width: 1200,
        height: 1165,
    },
    OutputSpec {
        category: Category::Hero,
        width: 1500,
        height: 920,
    },
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown output size '{key}' (expected one of: {known})")]
    UnknownKey { key: String, known: String },
}

/// Resolve a catalog key such as `hero_1500x920`.
pub fn lookup(key: &str) -> Result<OutputSpec, CatalogError> {
    let wanted = key.trim().to_ascii_lowercase();
    CATALOG
        .iter()
        .find(|spec| spec.key() == wanted)
        .copied()
        .ok_or_else(|| CatalogError::UnknownKey {
            key: key.to_string(),
            known: all_keys().join(", "),
        })
}

/// Keys of every catalog row, in canonical order.
pub fn all_keys() -> Vec<String> {
    CATALOG.iter().map(OutputSpec::key).collect()
}

/// Select catalog rows.
///
/// The result follows catalog order no matter how `selected` is ordered, and
/// each row appears at most once. Specs not present in the catalog are
/// ignored. An empty selection yields an empty list.
pub fn specs_for(selected: &[OutputSpec]) -> Vec<OutputSpec> {
    CATALOG
        .iter()
        .filter(|spec| selected.contains(spec))
        .copied()
        .collect()
}

/// Select every catalog row belonging to one of `categories`.
pub fn specs_for_categories(categories: &[Category]) -> Vec<OutputSpec> {
    CATALOG
        .iter()
        .filter(|spec| categories.contains(&spec.category))
        .copied()
        .collect()
}
