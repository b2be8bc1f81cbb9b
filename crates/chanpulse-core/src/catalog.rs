use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

/// Device technology class of a tracked product.
///
/// Every catalog entry carries exactly one of these; classification comes from
/// the catalog file, never from the raw exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "RF")]
    Rf,
    #[serde(rename = "HIFU")]
    Hifu,
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Technology::Rf => write!(f, "RF"),
            Technology::Hifu => write!(f, "HIFU"),
        }
    }
}

/// One tracked product in the catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display keyword, unique within the catalog (case-insensitive).
    pub keyword: String,
    pub technology: Technology,
    /// `true` for the monitored brand's own product line, `false` for competitors.
    #[serde(default)]
    pub monitored: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<CatalogEntry>,
}

/// The validated product catalog, loaded once at startup and shared by every
/// channel dataset builder.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

/// Normalize a keyword for catalog matching: trim, lowercase, and collapse
/// internal whitespace runs to a single space.
#[must_use]
pub fn normalize_keyword(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Catalog {
    /// Build a catalog from entries, validating uniqueness and non-empty names.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any keyword is empty or two entries
    /// collide after normalization.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "catalog must list at least one product".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let normalized = normalize_keyword(&entry.keyword);
            if normalized.is_empty() {
                return Err(ConfigError::Validation(
                    "product keyword must be non-empty".to_string(),
                ));
            }
            if index.insert(normalized, i).is_some() {
                return Err(ConfigError::Validation(format!(
                    "duplicate product keyword: '{}'",
                    entry.keyword
                )));
            }
        }

        Ok(Self { entries, index })
    }

    /// Look up a catalog entry by raw keyword, tolerating case and whitespace
    /// differences in the export.
    #[must_use]
    pub fn lookup(&self, raw_keyword: &str) -> Option<&CatalogEntry> {
        self.index
            .get(&normalize_keyword(raw_keyword))
            .map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load and validate the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog_file: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    Catalog::from_entries(catalog_file.products)
}
