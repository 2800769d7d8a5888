//! In-memory fake backend
//!
//! This is the backend tests compose the application against when neither
//! a database nor a document tree should be involved. It also counts
//! render-status lookups so tests can assert that the probe was (or was
//! not) made.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use eprint::{ArticleId, DocMetadata, RenderStatus, RenderStatusSource};

use crate::error::{Result, ServicesError};
use crate::sources::{AbstractSource, ArticleListing, ListingSource};

/// In-memory fake document store for testing
#[derive(Debug, Default)]
pub struct MemoryDocs {
    articles: Mutex<HashMap<(String, u32), DocMetadata>>,
    statuses: Mutex<HashMap<(String, u32), RenderStatus>>,
    status_lookups: AtomicUsize,
}

impl MemoryDocs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one article version
    pub fn insert_article(&self, doc: DocMetadata) {
        self.articles
            .lock()
            .unwrap()
            .insert((doc.article_id.to_string(), doc.version), doc);
    }

    /// Seed the conversion outcome for one article version
    pub fn set_render_status(&self, article_id: &ArticleId, version: u32, status: RenderStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert((article_id.to_string(), version), status);
    }

    /// Number of render-status lookups served (useful for testing)
    pub fn status_lookups(&self) -> usize {
        self.status_lookups.load(Ordering::SeqCst)
    }

    /// Number of seeded article versions
    pub fn len(&self) -> usize {
        self.articles.lock().unwrap().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.articles.lock().unwrap().is_empty()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.articles.lock().unwrap().clear();
        self.statuses.lock().unwrap().clear();
    }

    fn highest_version(articles: &HashMap<(String, u32), DocMetadata>, id: &str) -> Option<u32> {
        articles
            .keys()
            .filter(|(article_id, _)| article_id == id)
            .map(|(_, version)| *version)
            .max()
    }
}

#[async_trait]
impl AbstractSource for MemoryDocs {
    async fn get_abs(
        &self,
        article_id: &ArticleId,
        version: Option<u32>,
    ) -> Result<DocMetadata> {
        let articles = self
            .articles
            .lock()
            .map_err(|_| ServicesError::Storage("Lock poisoned".into()))?;

        let highest = Self::highest_version(&articles, article_id.as_ref())
            .ok_or_else(|| ServicesError::ArticleNotFound(article_id.to_string()))?;
        let version = version.unwrap_or(highest);

        let mut doc = articles
            .get(&(article_id.to_string(), version))
            .cloned()
            .ok_or_else(|| ServicesError::VersionNotFound {
                article_id: article_id.to_string(),
                version,
            })?;
        doc.highest_version = highest;
        Ok(doc)
    }
}

#[async_trait]
impl ListingSource for MemoryDocs {
    async fn articles_for_month(
        &self,
        category: &str,
        yymm: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ArticleListing> {
        let articles = self
            .articles
            .lock()
            .map_err(|_| ServicesError::Storage("Lock poisoned".into()))?;

        let mut current: Vec<DocMetadata> = articles
            .values()
            .filter(|doc| {
                doc.primary_category == category
                    && doc.listing_month == yymm
                    && Self::highest_version(&articles, doc.article_id.as_ref())
                        == Some(doc.version)
            })
            .cloned()
            .collect();
        for doc in &mut current {
            doc.highest_version = doc.version;
        }
        current.sort_by(|a, b| a.article_id.as_ref().cmp(b.article_id.as_ref()));

        let total = current.len() as u64;
        let items = current
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(ArticleListing { items, total })
    }
}

#[async_trait]
impl RenderStatusSource for MemoryDocs {
    async fn render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
    ) -> eprint::Result<Option<RenderStatus>> {
        self.status_lookups.fetch_add(1, Ordering::SeqCst);

        let statuses = self.statuses.lock().map_err(|_| {
            eprint::EprintError::StatusLookup {
                article_id: article_id.to_string(),
                version,
                reason: "Lock poisoned".to_string(),
            }
        })?;

        Ok(statuses.get(&(article_id.to_string(), version)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample(id: &str, version: u32, category: &str, yymm: &str) -> DocMetadata {
        DocMetadata {
            article_id: ArticleId::new(id).unwrap(),
            version,
            highest_version: version,
            title: format!("Sample {id}v{version}"),
            authors: "A. Author".to_string(),
            abstract_text: "We study a sample problem.".to_string(),
            primary_category: category.to_string(),
            categories: vec![category.to_string()],
            submitted: datetime!(2023-04-03 10:00 UTC),
            listing_month: yymm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_abs_latest_and_specific_version() {
        let docs = MemoryDocs::new();
        docs.insert_article(sample("0704.0001", 1, "cs.DS", "2304"));
        docs.insert_article(sample("0704.0001", 2, "cs.DS", "2304"));

        let id = ArticleId::new("0704.0001").unwrap();

        let latest = docs.get_abs(&id, None).await.unwrap();
        assert_eq!(latest.version, 2);
        assert_eq!(latest.highest_version, 2);

        let first = docs.get_abs(&id, Some(1)).await.unwrap();
        assert_eq!(first.version, 1);
        // The stored value predates v2; the store reports the live highest.
        assert_eq!(first.highest_version, 2);
    }

    #[tokio::test]
    async fn test_get_abs_not_found() {
        let docs = MemoryDocs::new();
        docs.insert_article(sample("0704.0001", 1, "cs.DS", "2304"));

        let unknown = ArticleId::new("9999.9999").unwrap();
        let result = docs.get_abs(&unknown, None).await;
        assert!(matches!(result, Err(ServicesError::ArticleNotFound(_))));

        let known = ArticleId::new("0704.0001").unwrap();
        let result = docs.get_abs(&known, Some(7)).await;
        match result {
            Err(ServicesError::VersionNotFound { version, .. }) => assert_eq!(version, 7),
            other => panic!("Expected VersionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_listing_returns_current_versions_in_order() {
        let docs = MemoryDocs::new();
        docs.insert_article(sample("0704.0003", 1, "cs.DS", "2304"));
        docs.insert_article(sample("0704.0001", 1, "cs.DS", "2304"));
        docs.insert_article(sample("0704.0001", 2, "cs.DS", "2304"));
        docs.insert_article(sample("0704.0002", 1, "math.CO", "2304"));

        let listing = docs.articles_for_month("cs.DS", "2304", 50, 0).await.unwrap();

        assert_eq!(listing.total, 2);
        let ids: Vec<String> = listing.items.iter().map(|d| d.id_with_version()).collect();
        assert_eq!(ids, vec!["0704.0001v2", "0704.0003v1"]);
    }

    #[tokio::test]
    async fn test_listing_pagination() {
        let docs = MemoryDocs::new();
        for n in 1..=5 {
            docs.insert_article(sample(&format!("0704.000{n}"), 1, "cs.DS", "2304"));
        }

        let page = docs.articles_for_month("cs.DS", "2304", 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        let ids: Vec<&str> = page.items.iter().map(|d| d.article_id.as_ref()).collect();
        assert_eq!(ids, vec!["0704.0003", "0704.0004"]);
    }

    #[tokio::test]
    async fn test_render_status_lookup_and_counter() {
        let docs = MemoryDocs::new();
        let id = ArticleId::new("0704.0001").unwrap();
        docs.set_render_status(&id, 2, RenderStatus(1));

        assert_eq!(docs.status_lookups(), 0);

        let status = docs.render_status(&id, 2).await.unwrap();
        assert_eq!(status, Some(RenderStatus::AVAILABLE));

        let missing = docs.render_status(&id, 1).await.unwrap();
        assert_eq!(missing, None);

        assert_eq!(docs.status_lookups(), 2);
    }

    #[tokio::test]
    async fn test_utilities() {
        let docs = MemoryDocs::new();
        assert!(docs.is_empty());

        docs.insert_article(sample("0704.0001", 1, "cs.DS", "2304"));
        docs.insert_article(sample("0704.0001", 2, "cs.DS", "2304"));
        assert_eq!(docs.len(), 2);
        assert!(!docs.is_empty());

        docs.clear();
        assert!(docs.is_empty());
    }
}
