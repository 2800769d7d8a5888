//! Backend composition for the browse application
//!
//! The abstract, listing, and render-status capabilities are selected once
//! at application construction and handed in explicitly; handlers never
//! consult ambient settings to find their backend. Tests compose the same
//! application over the filesystem store or the in-memory fake.

use std::sync::Arc;

use eprint::RenderStatusSource;
use eprint_services::{
    AbstractSource, FsDocs, ListingSource, MemoryDocs, PostgresDocs, SqliteDocs,
};

use crate::config::{DocumentBackend, ServerConfig};
use crate::error::{ApiError, Result};

/// The pluggable backends the application is composed from
#[derive(Clone)]
pub struct Backends {
    pub abstracts: Arc<dyn AbstractSource>,
    pub listings: Arc<dyn ListingSource>,
    pub render_status: Arc<dyn RenderStatusSource>,
}

impl Backends {
    /// Compose every capability from one shared backend instance
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: AbstractSource + ListingSource + RenderStatusSource + 'static,
    {
        Self {
            abstracts: backend.clone(),
            listings: backend.clone(),
            render_status: backend,
        }
    }

    /// Database-backed composition (PostgreSQL)
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let docs = PostgresDocs::from_url(database_url).await?;
        docs.migrate().await?;
        Ok(Self::from_shared(Arc::new(docs)))
    }

    /// Database-backed composition (SQLite; also used by the db-mode test
    /// harness)
    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let docs = SqliteDocs::new(database_url).await?;
        Ok(Self::from_shared(Arc::new(docs)))
    }

    /// Filesystem-backed composition
    pub async fn filesystem(base_path: &str) -> Result<Self> {
        Ok(Self::from_shared(Arc::new(FsDocs::new(base_path).await?)))
    }

    /// In-memory fake composition
    pub fn fake() -> Self {
        Self::from_shared(Arc::new(MemoryDocs::new()))
    }

    /// Select the composition named by the configuration
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        match config.document_backend {
            DocumentBackend::Db => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    ApiError::Config("DATABASE_URL is required for the db backend".to_string())
                })?;
                if url.starts_with("sqlite:") {
                    Self::sqlite(url).await
                } else {
                    Self::postgres(url).await
                }
            }
            DocumentBackend::Fs => {
                let path = config.document_store_path.as_deref().ok_or_else(|| {
                    ApiError::Config(
                        "DOCUMENT_STORE_PATH is required for the fs backend".to_string(),
                    )
                })?;
                Self::filesystem(path).await
            }
            DocumentBackend::Fake => Ok(Self::fake()),
        }
    }
}
