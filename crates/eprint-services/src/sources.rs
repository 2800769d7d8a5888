//! Capability interfaces the browse application is composed from
//!
//! These replace ambient application settings: which backend serves
//! documents is decided once, at composition time, by handing concrete
//! implementations of these traits to the application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use eprint::{ArticleId, DocMetadata};

use crate::error::Result;

/// One page of a month listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleListing {
    /// Current-version metadata, ordered by article id
    pub items: Vec<DocMetadata>,

    /// Total number of articles in the month, across all pages
    pub total: u64,
}

/// Provider of abstract-page documents
#[async_trait]
pub trait AbstractSource: Send + Sync {
    /// Metadata of `version` of the article, or of the latest version when
    /// `version` is `None`
    async fn get_abs(
        &self,
        article_id: &ArticleId,
        version: Option<u32>,
    ) -> Result<DocMetadata>;
}

/// Provider of month listing pages
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Articles announced under `category` in the `yymm` month, current
    /// versions only, ordered by article id
    ///
    /// A month with no announcements is an empty listing, not an error.
    async fn articles_for_month(
        &self,
        category: &str,
        yymm: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ArticleListing>;
}
