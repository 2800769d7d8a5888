//! # Eprint Services
//!
//! Pluggable backends for the e-print browse service. Abstract pages,
//! month listings, and render-status lookups go through small capability
//! interfaces so an application can be composed against a relational
//! database, a filesystem document store, or an in-memory fake:
//!
//! - [`AbstractSource`] serves per-version document metadata
//! - [`ListingSource`] serves month listing pages
//! - [`eprint::RenderStatusSource`] serves conversion status codes
//!
//! Every backend implements all three interfaces, so one instance can back
//! a whole application.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use eprint::ArticleId;
//! use eprint_services::{AbstractSource, FsDocs};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Serve documents from a filesystem store
//! let docs = FsDocs::new("/data/abs_files").await?;
//!
//! let latest = docs.get_abs(&ArticleId::new("0704.0001")?, None).await?;
//! println!("latest version: {}", latest.version);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod sources;
pub mod store;

pub use error::{Result, ServicesError};
pub use sources::{AbstractSource, ArticleListing, ListingSource};

#[cfg(feature = "postgres")]
pub use store::postgres::PostgresDocs;

#[cfg(feature = "sqlite")]
pub use store::sqlite::SqliteDocs;

#[cfg(feature = "fs")]
pub use store::filesystem::FsDocs;

#[cfg(feature = "memory")]
pub use store::memory::MemoryDocs;
