pub mod app_config;
pub mod catalog;
pub mod config;
pub mod retry;

use thiserror::Error;

pub use app_config::{AppConfig, ExistenceMode, MediaFields};
pub use catalog::{
    CatalogError, CategoryIds, CategoryLevel, CategoryPath, ExistenceResult, ProductRecord,
    NEGOTIABLE_PRICE,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
