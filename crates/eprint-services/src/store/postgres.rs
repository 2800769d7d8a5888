//! PostgreSQL backend for abstracts, listings, and render status
//!
//! One sqlx pool serves all three capability interfaces. Metadata lives in
//! an `articles` table keyed by `(article_id, version)`; the conversion
//! pipeline's outcome lives in `latexml_status` keyed the same way.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use time::OffsetDateTime;

use eprint::{ArticleId, DocMetadata, EprintError, RenderStatus, RenderStatusSource};

use crate::error::{Result, ServicesError};
use crate::sources::{AbstractSource, ArticleListing, ListingSource};

/// PostgreSQL-backed document store
pub struct PostgresDocs {
    pool: PgPool,
}

impl PostgresDocs {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store from a database URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(Self::SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// SQL schema for all tables
    const SCHEMA_SQL: &'static str = r#"
        -- Article metadata, one row per version
        CREATE TABLE IF NOT EXISTS articles (
            article_id TEXT NOT NULL,
            version INTEGER NOT NULL,
            title TEXT NOT NULL,
            authors TEXT NOT NULL,
            abstract TEXT NOT NULL,
            primary_category TEXT NOT NULL,
            categories TEXT NOT NULL,
            submitted TIMESTAMPTZ NOT NULL,
            listing_month TEXT NOT NULL,
            PRIMARY KEY (article_id, version)
        );

        -- LaTeXML conversion outcome, one row per converted version
        CREATE TABLE IF NOT EXISTS latexml_status (
            article_id TEXT NOT NULL,
            version INTEGER NOT NULL,
            status BIGINT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            PRIMARY KEY (article_id, version)
        );

        -- Indexes for listing pages
        CREATE INDEX IF NOT EXISTS idx_articles_listing
            ON articles(primary_category, listing_month);
    "#;

    /// Save one article version (upsert); used by loaders and test setup
    pub async fn save_article(&self, doc: &DocMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (
                article_id, version, title, authors, abstract,
                primary_category, categories, submitted, listing_month
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (article_id, version) DO UPDATE SET
                title = EXCLUDED.title,
                authors = EXCLUDED.authors,
                abstract = EXCLUDED.abstract,
                primary_category = EXCLUDED.primary_category,
                categories = EXCLUDED.categories,
                submitted = EXCLUDED.submitted,
                listing_month = EXCLUDED.listing_month
            "#,
        )
        .bind(doc.article_id.as_ref())
        .bind(doc.version as i32)
        .bind(&doc.title)
        .bind(&doc.authors)
        .bind(&doc.abstract_text)
        .bind(&doc.primary_category)
        .bind(doc.categories.join(" "))
        .bind(doc.submitted)
        .bind(&doc.listing_month)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record the conversion outcome for one article version (upsert)
    pub async fn set_render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
        status: RenderStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO latexml_status (article_id, version, status, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (article_id, version) DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(article_id.as_ref())
        .bind(version as i32)
        .bind(status.code())
        .bind(OffsetDateTime::now_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn highest_version(&self, article_id: &ArticleId) -> Result<Option<u32>> {
        let row = sqlx::query("SELECT MAX(version) AS highest FROM articles WHERE article_id = $1")
            .bind(article_id.as_ref())
            .fetch_one(&self.pool)
            .await?;

        let highest: Option<i32> = row.get("highest");
        Ok(highest.map(|v| v as u32))
    }

    fn doc_from_row(row: &PgRow, highest_version: u32) -> Result<DocMetadata> {
        let categories: String = row.get("categories");
        Ok(DocMetadata {
            article_id: ArticleId::new(row.get::<String, _>("article_id"))?,
            version: row.get::<i32, _>("version") as u32,
            highest_version,
            title: row.get("title"),
            authors: row.get("authors"),
            abstract_text: row.get("abstract"),
            primary_category: row.get("primary_category"),
            categories: categories.split_whitespace().map(str::to_string).collect(),
            submitted: row.get("submitted"),
            listing_month: row.get("listing_month"),
        })
    }
}

#[async_trait]
impl AbstractSource for PostgresDocs {
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

        let row = sqlx::query(
            r#"
            SELECT article_id, version, title, authors, abstract,
                   primary_category, categories, submitted, listing_month
            FROM articles
            WHERE article_id = $1 AND version = $2
            "#,
        )
        .bind(article_id.as_ref())
        .bind(version as i32)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServicesError::VersionNotFound {
            article_id: article_id.to_string(),
            version,
        })?;

        Self::doc_from_row(&row, highest)
    }
}

#[async_trait]
impl ListingSource for PostgresDocs {
    async fn articles_for_month(
        &self,
        category: &str,
        yymm: &str,
        limit: u32,
        offset: u32,
    ) -> Result<ArticleListing> {
        let total_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total FROM articles a
            WHERE a.primary_category = $1 AND a.listing_month = $2
              AND a.version = (SELECT MAX(version) FROM articles WHERE article_id = a.article_id)
            "#,
        )
        .bind(category)
        .bind(yymm)
        .fetch_one(&self.pool)
        .await?;
        let total: i64 = total_row.get("total");

        let rows = sqlx::query(
            r#"
            SELECT a.article_id, a.version, a.title, a.authors, a.abstract,
                   a.primary_category, a.categories, a.submitted, a.listing_month
            FROM articles a
            WHERE a.primary_category = $1 AND a.listing_month = $2
              AND a.version = (SELECT MAX(version) FROM articles WHERE article_id = a.article_id)
            ORDER BY a.article_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(category)
        .bind(yymm)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            // Listing rows are current versions, so each row is its own
            // highest version.
            let version = row.get::<i32, _>("version") as u32;
            items.push(Self::doc_from_row(&row, version)?);
        }

        Ok(ArticleListing {
            items,
            total: total as u64,
        })
    }
}

#[async_trait]
impl RenderStatusSource for PostgresDocs {
    async fn render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
    ) -> eprint::Result<Option<RenderStatus>> {
        let row = sqlx::query(
            "SELECT status FROM latexml_status WHERE article_id = $1 AND version = $2",
        )
        .bind(article_id.as_ref())
        .bind(version as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EprintError::StatusLookup {
            article_id: article_id.to_string(),
            version,
            reason: e.to_string(),
        })?;

        Ok(row.map(|r| RenderStatus(r.get::<i64, _>("status"))))
    }
}
