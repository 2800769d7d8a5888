//! Render availability for machine-converted HTML papers
//!
//! Articles are converted to HTML by an external LaTeXML pipeline that
//! records an integer status code per article version. This module decides
//! whether a converted document exists for a version and, if so, where to
//! fetch it. It is a single-shot query: one status lookup per call, no
//! retry, no caching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::identifier::{ArticleId, ArticleVersionRef};

/// Status code recorded by the conversion pipeline for one article version
///
/// Exactly code `1` means a converted document is available; every other
/// code means it is not. The raw code is kept so backends and logs can
/// surface it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderStatus(pub i64);

impl RenderStatus {
    /// Conversion succeeded and the document can be linked
    pub const AVAILABLE: RenderStatus = RenderStatus(1);

    pub fn is_available(self) -> bool {
        self == Self::AVAILABLE
    }

    pub fn code(self) -> i64 {
        self.0
    }
}

/// Lookup of conversion status codes, backed by persistent storage
#[async_trait]
pub trait RenderStatusSource: Send + Sync {
    /// Status recorded for `(article_id, version)`, or `None` when the
    /// pipeline has no record for that pair
    async fn render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
    ) -> Result<Option<RenderStatus>>;
}

/// Configuration for linking converted HTML papers
///
/// Loaded once at application start and passed by reference into
/// [`latexml_url`]; read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexmlConfig {
    /// Globally disables HTML links when false
    pub enabled: bool,

    /// Root under which converted documents are published
    pub base_url: String,
}

/// URL of the converted HTML paper for `article`, or `None` when no link
/// should be offered
///
/// With `most_recent` set, the status probe targets the article's highest
/// version instead of the requested one. The returned path always names the
/// requested version, whichever version was probed.
///
/// When the feature is disabled the source is never invoked. Lookup errors
/// propagate to the caller; degrading (omitting the link) is the caller's
/// decision.
pub async fn latexml_url(
    config: &LatexmlConfig,
    source: &dyn RenderStatusSource,
    article: &ArticleVersionRef,
    most_recent: bool,
) -> Result<Option<String>> {
    if !config.enabled {
        return Ok(None);
    }

    let probe_version = if most_recent {
        article.highest_version()
    } else {
        article.version()
    };
    let status = source
        .render_status(article.article_id(), probe_version)
        .await?;
    debug!(
        article = %article.id_with_version(),
        version = article.version(),
        highest_version = article.highest_version(),
        probe_version,
        status = status.map(RenderStatus::code),
        "latexml status probe"
    );

    match status {
        Some(status) if status.is_available() => {
            let path = format!(
                "{id}v{version}/{id}v{version}.html",
                id = article.article_id(),
                version = article.version()
            );
            Ok(Some(format!("{}/{}", config.base_url, path)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EprintError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedStatuses {
        statuses: HashMap<(String, u32), i64>,
        lookups: AtomicUsize,
    }

    impl FixedStatuses {
        fn new(entries: &[(&str, u32, i64)]) -> Self {
            Self {
                statuses: entries
                    .iter()
                    .map(|(id, version, code)| ((id.to_string(), *version), *code))
                    .collect(),
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderStatusSource for FixedStatuses {
        async fn render_status(
            &self,
            article_id: &ArticleId,
            version: u32,
        ) -> Result<Option<RenderStatus>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .statuses
                .get(&(article_id.to_string(), version))
                .copied()
                .map(RenderStatus))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RenderStatusSource for FailingSource {
        async fn render_status(
            &self,
            article_id: &ArticleId,
            version: u32,
        ) -> Result<Option<RenderStatus>> {
            Err(EprintError::StatusLookup {
                article_id: article_id.to_string(),
                version,
                reason: "connection refused".to_string(),
            })
        }
    }

    fn config(enabled: bool) -> LatexmlConfig {
        LatexmlConfig {
            enabled,
            base_url: "https://static.example.org/latexml".to_string(),
        }
    }

    fn article(id: &str, version: u32, highest_version: u32) -> ArticleVersionRef {
        ArticleVersionRef::new(ArticleId::new(id).unwrap(), version, highest_version).unwrap()
    }

    #[tokio::test]
    async fn test_disabled_feature_skips_the_probe() {
        let source = FixedStatuses::new(&[("0704.0001", 2, 1)]);
        let article = article("0704.0001", 2, 2);

        let url = latexml_url(&config(false), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(url, None);
        assert_eq!(source.lookups(), 0);
    }

    #[tokio::test]
    async fn test_available_status_builds_url_from_requested_version() {
        let source = FixedStatuses::new(&[("0704.0001", 2, 1)]);
        let article = article("0704.0001", 2, 2);

        let url = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://static.example.org/latexml/0704.0001v2/0704.0001v2.html")
        );
        assert_eq!(source.lookups(), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_has_no_url() {
        let source = FixedStatuses::new(&[("0704.0001", 2, 0)]);
        let article = article("0704.0001", 2, 2);

        let url = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn test_absent_record_has_no_url() {
        let source = FixedStatuses::new(&[]);
        let article = article("0704.0001", 2, 2);

        let url = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(url, None);
        assert_eq!(source.lookups(), 1);
    }

    #[tokio::test]
    async fn test_most_recent_probes_highest_but_links_requested_version() {
        // Only the highest version converted successfully; the path still
        // names the requested version.
        let source = FixedStatuses::new(&[("X", 3, 1), ("X", 1, 0)]);
        let article = article("X", 1, 3);

        let url = latexml_url(&config(true), &source, &article, true)
            .await
            .unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://static.example.org/latexml/Xv1/Xv1.html")
        );
        assert_eq!(source.lookups(), 1);
    }

    #[tokio::test]
    async fn test_without_most_recent_the_requested_version_is_probed() {
        let source = FixedStatuses::new(&[("X", 3, 1), ("X", 1, 0)]);
        let article = article("X", 1, 3);

        let url = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_idempotent() {
        let source = FixedStatuses::new(&[("0704.0001", 2, 1)]);
        let article = article("0704.0001", 2, 2);

        let first = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();
        let second = latexml_url(&config(true), &source, &article, false)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(source.lookups(), 2);
    }

    #[tokio::test]
    async fn test_lookup_errors_propagate() {
        let article = article("0704.0001", 1, 1);

        let result = latexml_url(&config(true), &FailingSource, &article, false).await;

        assert!(matches!(
            result,
            Err(EprintError::StatusLookup { version: 1, .. })
        ));
    }
}
