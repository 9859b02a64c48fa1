pub mod app_config;
pub mod config;
pub mod products;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    Confidence, PriceSource, ProductRecord, ResultKind, SearchCandidate, SearchOptions,
};
pub use stores::{load_store_catalog, StoreCatalog, StoreEntry};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read store catalog {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store catalog: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("store catalog validation failed: {0}")]
    Validation(String),
}
