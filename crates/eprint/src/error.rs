//! Error types for the eprint core library

use thiserror::Error;

/// Main error type for core domain operations
#[derive(Error, Debug)]
pub enum EprintError {
    /// A raw article identifier was rejected during validation
    #[error("Invalid article identifier {raw:?}: {reason}")]
    InvalidIdentifier { raw: String, reason: String },

    /// A version number was rejected during validation
    #[error("Invalid version {version} for article {article_id}: {reason}")]
    InvalidVersion {
        article_id: String,
        version: u32,
        reason: String,
    },

    /// The render-status collaborator failed; propagated to the caller
    /// without retry or fallback
    #[error("Render status lookup failed for {article_id}v{version}: {reason}")]
    StatusLookup {
        article_id: String,
        version: u32,
        reason: String,
    },
}

/// Shorthand result type for core domain operations
pub type Result<T> = std::result::Result<T, EprintError>;
