use std::path::{Path, PathBuf};

use serde::Serialize;

use chanpulse_core::Month;

/// Kinds of per-month source material the store can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Raw,
    Processed,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Raw => "raw",
            SourceKind::Processed => "processed",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only filesystem view over the monthly export store.
///
/// Layout: `<root>/raw/<YYYY-MM>/` for raw exports and
/// `<root>/processed/<YYYY-MM>/` for processed outputs. Listing and presence
/// checks are plain directory reads, idempotent and safe for concurrent
/// callers; nothing in the engine writes here.
#[derive(Debug, Clone)]
pub struct MonthStore {
    root: PathBuf,
}

impl MonthStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn month_dir(&self, kind: SourceKind, month: &Month) -> PathBuf {
        self.root.join(kind.as_str()).join(month.as_str())
    }

    /// Path of a raw export file within one month's directory.
    #[must_use]
    pub fn raw_file(&self, month: &Month, file_name: &str) -> PathBuf {
        self.month_dir(SourceKind::Raw, month).join(file_name)
    }

    #[must_use]
    pub fn has_month(&self, kind: SourceKind, month: &Month) -> bool {
        self.month_dir(kind, month).is_dir()
    }

    /// Months present for one source kind, ascending. Entries that are not
    /// directories or not valid `YYYY-MM` names are ignored; a missing base
    /// directory lists as empty.
    #[must_use]
    pub fn list_months(&self, kind: SourceKind) -> Vec<Month> {
        let base = self.root.join(kind.as_str());
        let mut months = list_month_directories(&base);
        months.sort();
        months
    }

    /// Union of raw and processed months, de-duplicated and ascending.
    #[must_use]
    pub fn available_months(&self) -> Vec<Month> {
        let mut months = self.list_months(SourceKind::Raw);
        months.extend(self.list_months(SourceKind::Processed));
        months.sort();
        months.dedup();
        months
    }

    /// The lexicographically maximal available month, which by the `YYYY-MM`
    /// token shape is also the chronologically latest.
    #[must_use]
    pub fn latest_month(&self) -> Option<Month> {
        self.available_months().into_iter().next_back()
    }
}

fn list_month_directories(base: &Path) -> Vec<Month> {
    let entries = match std::fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(base = %base.display(), error = %e, "failed to list month directories");
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| name.parse::<Month>().ok())
        .collect()
}
