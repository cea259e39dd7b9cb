/// Shared data structures for the application state
///
/// These structs represent the static catalog data that flows between
/// the asset files and the session layer. Everything here is loaded once
/// at startup and never mutated afterwards.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The photo catalog, embedded at compile time so the binary
/// does not depend on a working directory at runtime.
pub const CATALOG_JSON: &str = include_str!("../../assets/images.json");

/// The species name translations, embedded alongside the catalog.
pub const NAMES_JSON: &str = include_str!("../../assets/names.json");

/// Errors raised while parsing the embedded asset files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse asset JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single wildlife camera photo in the catalog
///
/// Entries are immutable: they are read once from `assets/images.json`
/// and never created or destroyed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoEntry {
    /// Unique, stable photo ID (also names the image file: `{id}.jpg`)
    pub id: u32,
    /// Species tag in its source language (e.g. "fox", "roe deer")
    pub label: String,
}

/// Parse the photo catalog from its JSON representation.
///
/// An empty catalog is not an error; the session simply has nothing to
/// show and the UI stays on its loading state.
pub fn load_catalog(json: &str) -> Result<Vec<PhotoEntry>, CatalogError> {
    let entries: Vec<PhotoEntry> = serde_json::from_str(json)?;
    Ok(entries)
}

/// One row of `assets/names.json`
#[derive(Debug, Deserialize)]
struct NameTranslation {
    /// Species tag as it appears in the catalog
    source: String,
    /// German display name
    deutsch: String,
    /// Alternative names, kept for future matching
    #[serde(rename = "ähnliche", default)]
    #[allow(dead_code)]
    similar: Vec<String>,
}

/// Lookup table from catalog species tags to display names
///
/// Built once at startup and owned by the application struct; no
/// module-level cache. Lookups are case-insensitive on the source tag
/// and fall back to the input label when no translation exists.
#[derive(Debug, Default)]
pub struct NameDirectory {
    map: HashMap<String, String>,
}

impl NameDirectory {
    /// Build the directory from the embedded names JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<NameTranslation> = serde_json::from_str(json)?;

        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            map.insert(row.source.to_lowercase(), row.deutsch);
        }

        Ok(NameDirectory { map })
    }

    /// An empty directory; every lookup falls back to the input label.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Translate a species tag into its display name.
    /// Unknown tags come back unchanged.
    pub fn display_name<'a>(&'a self, label: &'a str) -> &'a str {
        self.map
            .get(&label.to_lowercase())
            .map(String::as_str)
            .unwrap_or(label)
    }
}

/// Maps photo IDs to their image files on disk
///
/// The scan happens once at startup. A catalog entry without a matching
/// file resolves to `None`, and the card view shows a placeholder
/// instead of an image; sequencing is unaffected.
#[derive(Debug, Default)]
pub struct ImageDirectory {
    paths: HashMap<u32, PathBuf>,
}

impl ImageDirectory {
    /// Scan a flat directory for `{id}.jpg` files.
    /// A missing or unreadable directory yields an empty map.
    pub fn scan(dir: &Path) -> Self {
        let mut paths = HashMap::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("⚠️  Could not scan image directory {}: {}", dir.display(), e);
                return Self::default();
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().map_or(true, |ext| !ext.eq_ignore_ascii_case("jpg")) {
                continue;
            }
            // Filenames are "{id}.jpg"; anything else is skipped
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok())
            {
                paths.insert(id, path);
            }
        }

        println!("📁 Found {} photo files in {}", paths.len(), dir.display());
        Self { paths }
    }

    /// Resolve a photo ID to its image file, if one exists.
    pub fn resolve(&self, id: u32) -> Option<&PathBuf> {
        self.paths.get(&id)
    }
}
