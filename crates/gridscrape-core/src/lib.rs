pub mod config;
pub mod products;
pub mod selectors;

use thiserror::Error;

pub use config::{
    load_config, parse_config, BrowserConfig, BrowserKind, GlobalConfig, OutputFormat,
    PaginationSettings, ProductsConfig, ScrapeConfig,
};
pub use products::{
    clean_review_count, parse_price, parse_review_count, ProductError, RatingSource, RawProduct,
    RawProductInput, StructuredProduct,
};
pub use selectors::{SelectorKey, Selectors};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
