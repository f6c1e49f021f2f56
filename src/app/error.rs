use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstuaryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("RSS validation failed: {0}")]
    Rss(String),

    #[error("Feed already exists: {0}")]
    FeedExists(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Post has an empty natural key (guid and url are both empty)")]
    EmptyNaturalKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl EstuaryError {
    /// Attach the offending path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EstuaryError>;
