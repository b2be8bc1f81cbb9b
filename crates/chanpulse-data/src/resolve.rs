use serde::Serialize;
use thiserror::Error;

use chanpulse_core::Month;

use crate::store::{MonthStore, SourceKind};

/// Validation outcomes of month resolution, detected before any dataset
/// construction begins.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "code", content = "detail")]
pub enum ResolveError {
    #[error("invalid month format: {0}")]
    InvalidMonthFormat(String),
    #[error("no months available in the store")]
    NoMonthsAvailable,
}

/// The resolved, validated month plus source-availability status.
///
/// `ok == true` and `error == None` together signal "safe to build a dataset";
/// any other combination must short-circuit the caller.
#[derive(Debug, Clone, Serialize)]
pub struct MonthContext {
    pub month: Option<Month>,
    pub ok: bool,
    pub missing: Vec<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolveError>,
}

impl MonthContext {
    fn failed(error: ResolveError) -> Self {
        Self {
            month: None,
            ok: false,
            missing: Vec::new(),
            error: Some(error),
        }
    }

    /// The month to build from, present only when resolution fully succeeded.
    #[must_use]
    pub fn resolved(&self) -> Option<&Month> {
        if self.ok && self.error.is_none() {
            self.month.as_ref()
        } else {
            None
        }
    }
}

/// Resolve the month a request should operate on and check source availability.
///
/// A malformed `requested` token fails without touching the filesystem. An
/// absent one selects the latest available month (lexicographic max over the
/// union of raw and processed listings). Each entry of `required` missing for
/// the resolved month is collected into `missing` and flips `ok` to false.
#[must_use]
pub fn resolve(
    store: &MonthStore,
    requested: Option<&str>,
    required: &[SourceKind],
) -> MonthContext {
    let month = match requested {
        Some(raw) => match raw.parse::<Month>() {
            Ok(month) => month,
            Err(_) => {
                return MonthContext::failed(ResolveError::InvalidMonthFormat(raw.to_string()))
            }
        },
        None => match store.latest_month() {
            Some(month) => month,
            None => return MonthContext::failed(ResolveError::NoMonthsAvailable),
        },
    };

    let missing: Vec<SourceKind> = required
        .iter()
        .copied()
        .filter(|&kind| !store.has_month(kind, &month))
        .collect();

    MonthContext {
        ok: missing.is_empty(),
        month: Some(month),
        missing,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_months(raw: &[&str], processed: &[&str]) -> (tempfile::TempDir, MonthStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        for m in raw {
            std::fs::create_dir_all(dir.path().join("raw").join(m)).expect("mkdir raw month");
        }
        for m in processed {
            std::fs::create_dir_all(dir.path().join("processed").join(m))
                .expect("mkdir processed month");
        }
        let store = MonthStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn malformed_month_fails_before_filesystem_access() {
        // Deliberately point at a nonexistent root: a malformed token must
        // fail on shape alone.
        let store = MonthStore::new("/nonexistent-root");
        let ctx = resolve(&store, Some("2025-9"), &[SourceKind::Raw]);
        assert!(!ctx.ok);
        assert_eq!(
            ctx.error,
            Some(ResolveError::InvalidMonthFormat("2025-9".to_string()))
        );
        assert!(ctx.resolved().is_none());
    }

    #[test]
    fn absent_request_selects_latest_month() {
        let (_dir, store) = store_with_months(&["2025-08", "2025-09"], &["2025-10"]);
        let ctx = resolve(&store, None, &[]);
        assert!(ctx.ok);
        assert_eq!(ctx.resolved().map(Month::as_str), Some("2025-10"));
    }

    #[test]
    fn empty_store_without_request_reports_no_months() {
        let (_dir, store) = store_with_months(&[], &[]);
        let ctx = resolve(&store, None, &[SourceKind::Raw]);
        assert!(!ctx.ok);
        assert_eq!(ctx.error, Some(ResolveError::NoMonthsAvailable));
    }

    #[test]
    fn missing_required_source_is_collected() {
        let (_dir, store) = store_with_months(&[], &["2025-09"]);
        let ctx = resolve(&store, Some("2025-09"), &[SourceKind::Raw]);
        assert!(!ctx.ok);
        assert!(ctx.error.is_none());
        assert_eq!(ctx.missing, vec![SourceKind::Raw]);
        assert!(ctx.resolved().is_none());
    }

    #[test]
    fn all_required_sources_present_is_ok() {
        let (_dir, store) = store_with_months(&["2025-09"], &["2025-09"]);
        let ctx = resolve(
            &store,
            Some("2025-09"),
            &[SourceKind::Raw, SourceKind::Processed],
        );
        assert!(ctx.ok);
        assert!(ctx.missing.is_empty());
        assert_eq!(ctx.resolved().map(Month::as_str), Some("2025-09"));
    }
}
