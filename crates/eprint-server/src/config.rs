//! Server configuration management

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Which backend family serves documents and listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentBackend {
    /// Relational database (PostgreSQL, or SQLite for tests)
    Db,

    /// Filesystem document store
    Fs,

    /// In-memory fake
    Fake,
}

impl FromStr for DocumentBackend {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "db" => Ok(Self::Db),
            "fs" => Ok(Self::Fs),
            "fake" => Ok(Self::Fake),
            other => Err(ApiError::Config(format!(
                "Invalid DOCUMENT_BACKEND value: {other}"
            ))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Backend family documents and listings are served from
    pub document_backend: DocumentBackend,

    /// Database connection URL (db backend)
    pub database_url: Option<String>,

    /// Root of the filesystem document store (fs backend)
    pub document_store_path: Option<String>,

    /// Whether links to LaTeXML-converted HTML papers are offered at all
    pub latexml_enabled: bool,

    /// Root under which converted HTML papers are published
    pub latexml_base_url: String,

    /// Maximum page size for listings
    pub max_listing_page: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            document_backend: std::env::var("DOCUMENT_BACKEND")
                .unwrap_or_else(|_| "db".to_string())
                .parse()?,
            database_url: std::env::var("DATABASE_URL").ok(),
            document_store_path: std::env::var("DOCUMENT_STORE_PATH").ok(),
            latexml_enabled: std::env::var("LATEXML_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            latexml_base_url: std::env::var("LATEXML_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/latexml".to_string()),
            max_listing_page: std::env::var("MAX_LISTING_PAGE")
                .unwrap_or_else(|_| "250".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_LISTING_PAGE value".to_string()))?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            document_backend: DocumentBackend::Fake,
            database_url: None,
            document_store_path: None,
            latexml_enabled: false,
            latexml_base_url: "http://localhost:3000/latexml".to_string(),
            max_listing_page: 250,
        }
    }
}
