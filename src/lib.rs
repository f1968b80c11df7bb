//! Songweir: an incremental karaoke catalog harvester
//!
//! This crate crawls a paginated remote song catalog page by page, persists
//! the extracted song records with deduplication, and re-attempts previously
//! failed pages in bounded reconciliation sweeps.

pub mod analyzer;
pub mod config;
pub mod crawler;
pub mod model;
pub mod storage;
pub mod text;

use thiserror::Error;

/// Main error type for Songweir operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for page {page}: {source}")]
    Fetch { page: u32, source: reqwest::Error },

    #[error("Render service returned HTTP {status} for page {page}")]
    Render { page: u32, status: u16 },

    #[error("Analyzer bootstrap failed: {0}")]
    AnalyzerBootstrap(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Result type alias for Songweir operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{PageOutcome, Song, ValidationMode};
