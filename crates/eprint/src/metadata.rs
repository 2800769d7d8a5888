//! Document metadata for abstract and listing pages

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::Result;
use crate::identifier::{ArticleId, ArticleVersionRef};

/// Metadata of one article version as shown on an abstract page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// Stable article identifier
    pub article_id: ArticleId,

    /// Version this metadata describes, starting at 1
    pub version: u32,

    /// Most recent version known for the article; never below `version`
    pub highest_version: u32,

    /// Article title
    pub title: String,

    /// Author line as submitted
    pub authors: String,

    /// Abstract text
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Primary category the article was announced under
    pub primary_category: String,

    /// Full category list, primary first
    pub categories: Vec<String>,

    /// When this version was submitted
    #[serde(with = "time::serde::rfc3339")]
    pub submitted: OffsetDateTime,

    /// `yymm` announcement month the article is listed under
    pub listing_month: String,
}

impl DocMetadata {
    /// Version reference for this document, re-validated on the way out
    pub fn version_ref(&self) -> Result<ArticleVersionRef> {
        ArticleVersionRef::new(self.article_id.clone(), self.version, self.highest_version)
    }

    /// The `{id}v{n}` form used in page URLs and logs
    pub fn id_with_version(&self) -> String {
        format!("{}v{}", self.article_id, self.version)
    }

    /// Whether this metadata describes the most recent known version
    pub fn is_latest(&self) -> bool {
        self.version == self.highest_version
    }
}
