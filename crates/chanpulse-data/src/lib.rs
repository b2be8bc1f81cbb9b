//! Monthly multi-channel dataset construction and analytics views.
//!
//! Raw CSV exports under `<data_root>/raw/<YYYY-MM>/` are parsed on demand
//! into a normalized per-channel [`Dataset`]; the view functions in [`views`]
//! derive leaderboards, technology segments, correlation points, and summary
//! rollups from it. Datasets are transient: built fresh for every request,
//! never cached, never mutated in place.

mod channels;
mod dataset;
mod ingest;
mod resolve;
mod store;
mod traffic;
pub mod views;

use thiserror::Error;

pub use channels::Channel;
pub use dataset::{build_dataset, Author, Dataset, Product, Totals};
pub use ingest::parse_count;
pub use resolve::{resolve, MonthContext, ResolveError};
pub use store::{MonthStore, SourceKind};
pub use traffic::TrafficRecord;

/// Failures while reading or parsing source files for a month that already
/// passed availability resolution. These surface as unexpected (500-class)
/// errors, unlike the validation and availability outcomes carried by
/// [`MonthContext`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: String },
}
