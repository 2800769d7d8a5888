//! Error types for the browse service backends

use thiserror::Error;

/// Backend-specific errors
#[derive(Error, Debug)]
pub enum ServicesError {
    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Version {version} not found for article {article_id}")]
    VersionNotFound { article_id: String, version: u32 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Domain error: {0}")]
    Domain(#[from] eprint::EprintError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, ServicesError>;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
impl From<sqlx::Error> for ServicesError {
    fn from(err: sqlx::Error) -> Self {
        ServicesError::Storage(err.to_string())
    }
}
