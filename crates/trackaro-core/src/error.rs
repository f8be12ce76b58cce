//! Error types for Trackaro

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Input that would make financial figures misleading (bad amount, bad timestamp)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed data from an external collaborator (AI backend output)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Text that neither records nor queries an expense
    #[error("Could not classify message: {0}")]
    Unclassifiable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
