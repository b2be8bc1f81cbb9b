mod app_config;
mod catalog;
mod config;
mod month;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, normalize_keyword, Catalog, CatalogEntry, Technology};
pub use config::{load_app_config, load_app_config_from_env};
pub use month::{Month, MonthError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}
