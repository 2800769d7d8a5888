//! Filesystem document store
//!
//! Directory structure:
//! ```text
//! base_path/
//! ├── abs/
//! │   └── 0704.0001/
//! │       ├── v1.json
//! │       └── v2.json
//! ├── listings/
//! │   └── cs.DS/
//! │       └── 2304.json
//! └── latexml/
//!     └── 0704.0001/
//!         └── v2.status
//! ```
//!
//! Old-style identifiers contain a slash (`math/0309136`) and simply nest
//! one directory deeper. Listing files hold the article ids announced in a
//! month; metadata files are the JSON form of [`DocMetadata`]; status
//! files hold the bare integer code recorded by the conversion pipeline.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use eprint::{ArticleId, DocMetadata, EprintError, RenderStatus, RenderStatusSource};

use crate::error::{Result, ServicesError};
use crate::sources::{AbstractSource, ArticleListing, ListingSource};

/// Filesystem-backed document store
pub struct FsDocs {
    base_path: PathBuf,
}

impl FsDocs {
    /// Create a new filesystem store rooted at `base_path`
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();

        // Create required directories
        fs::create_dir_all(base_path.join("abs")).await?;
        fs::create_dir_all(base_path.join("listings")).await?;
        fs::create_dir_all(base_path.join("latexml")).await?;

        Ok(Self { base_path })
    }

    /// Get path to an article's metadata directory
    fn article_dir(&self, article_id: &ArticleId) -> PathBuf {
        self.base_path.join("abs").join(article_id.as_ref())
    }

    /// Get path to a specific version file
    fn version_file(&self, article_id: &ArticleId, version: u32) -> PathBuf {
        self.article_dir(article_id).join(format!("v{version}.json"))
    }

    /// Get path to a month listing file
    fn listing_file(&self, category: &str, yymm: &str) -> PathBuf {
        self.base_path
            .join("listings")
            .join(category)
            .join(format!("{yymm}.json"))
    }

    /// Get path to a conversion status file
    fn status_file(&self, article_id: &ArticleId, version: u32) -> PathBuf {
        self.base_path
            .join("latexml")
            .join(article_id.as_ref())
            .join(format!("v{version}.status"))
    }

    /// Save one article version and record it in its month listing; used
    /// by loaders and test setup
    pub async fn save_article(&self, doc: &DocMetadata) -> Result<()> {
        let version_file = self.version_file(&doc.article_id, doc.version);
        if let Some(parent) = version_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&version_file, serde_json::to_string_pretty(doc)?).await?;

        let listing_file = self.listing_file(&doc.primary_category, &doc.listing_month);
        if let Some(parent) = listing_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut ids: Vec<String> = match fs::read_to_string(&listing_file).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        if !ids.contains(&doc.article_id.to_string()) {
            ids.push(doc.article_id.to_string());
            ids.sort();
        }
        fs::write(&listing_file, serde_json::to_string_pretty(&ids)?).await?;

        Ok(())
    }

    /// Record the conversion outcome for one article version
    pub async fn set_render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
        status: RenderStatus,
    ) -> Result<()> {
        let status_file = self.status_file(article_id, version);
        if let Some(parent) = status_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&status_file, status.code().to_string()).await?;
        Ok(())
    }

    async fn highest_version(&self, article_id: &ArticleId) -> Result<Option<u32>> {
        let article_dir = self.article_dir(article_id);

        let mut entries = match fs::read_dir(&article_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut highest = None;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if let Some(version_str) = name.strip_prefix('v').and_then(|n| n.strip_suffix(".json"))
                {
                    if let Ok(version) = version_str.parse::<u32>() {
                        highest = Some(highest.map_or(version, |h: u32| h.max(version)));
                    }
                }
            }
        }

        Ok(highest)
    }
}

#[async_trait]
impl AbstractSource for FsDocs {
    async fn get_abs(
        &self,
        article_id: &ArticleId,
        version: Option<u32>,
    ) -> Result<DocMetadata> {
        let highest = self
            .highest_version(article_id)
            .await?
            .ok_or_else(|| ServicesError::ArticleNotFound(article_id.to_string()))?;
        let version = version.unwrap_or(highest);

        let content = match fs::read_to_string(self.version_file(article_id, version)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ServicesError::VersionNotFound {
                    article_id: article_id.to_string(),
                    version,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut doc: DocMetadata = serde_json::from_str(&content)?;
        // The directory scan is authoritative for the highest version; a
        // stored file may predate later submissions.
        doc.highest_version = highest.max(doc.version);
        Ok(doc)
    }
}

#[async_trait]
impl ListingSource for FsDocs {
    async fn articles_for_month(
        &self,
        category: &str,
        yymm: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ArticleListing> {
        let ids: Vec<String> = match fs::read_to_string(self.listing_file(category, yymm)).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let total = ids.len() as u64;
        let mut items = Vec::new();
        for id in ids.into_iter().skip(offset as usize).take(limit as usize) {
            let article_id = ArticleId::new(id)?;
            items.push(self.get_abs(&article_id, None).await?);
        }

        Ok(ArticleListing { items, total })
    }
}

#[async_trait]
impl RenderStatusSource for FsDocs {
    async fn render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
    ) -> eprint::Result<Option<RenderStatus>> {
        let status_lookup_error = |reason: String| EprintError::StatusLookup {
            article_id: article_id.to_string(),
            version,
            reason,
        };

        let content = match fs::read_to_string(self.status_file(article_id, version)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(status_lookup_error(e.to_string())),
        };

        let code: i64 = content
            .trim()
            .parse()
            .map_err(|_| status_lookup_error(format!("malformed status file: {content:?}")))?;
        Ok(Some(RenderStatus(code)))
    }
}
