//! Campus-Mapper: a single-site crawler and graph refinery
//!
//! This crate crawls one university website breadth-first into a directed link graph,
//! then derives filtered views of that graph (hub pruning, academic-subtree curation,
//! breadcrumb removal, template-cluster detection) for downstream analysis.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod refine;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Campus-Mapper operations
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Campus-Mapper operations
pub type Result<T> = std::result::Result<T, MapperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use graph::{PageNode, SiteGraph};
pub use refine::{build_curated_graph, build_refined_graph, build_simplified_graph, SimplifiedGraph};
pub use state::{CrawlSession, PageState};
pub use url::{normalize_url, SiteScope};
