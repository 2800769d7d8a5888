//! Eprint is the core domain library of the e-print browse service: article
//! identifiers and version references, document metadata for abstract and
//! listing pages, and the resolver that decides whether a machine-converted
//! HTML paper is available for an article version.

pub mod error;
pub mod identifier;
pub mod latexml;
pub mod metadata;

// Re-export core types
pub use error::{EprintError, Result};
pub use identifier::{ArticleId, ArticleVersionRef};
pub use latexml::{LatexmlConfig, RenderStatus, RenderStatusSource, latexml_url};
pub use metadata::DocMetadata;

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
