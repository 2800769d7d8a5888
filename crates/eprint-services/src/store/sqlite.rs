//! SQLite backend for abstracts, listings, and render status
//!
//! Same shape as the PostgreSQL backend, over a local database file. This
//! is the backend the db-mode test harness runs against: a throwaway
//! database in a temp directory stands in for the production one.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteRow},
};
use time::OffsetDateTime;

use eprint::{ArticleId, DocMetadata, EprintError, RenderStatus, RenderStatusSource};

use crate::error::{Result, ServicesError};
use crate::sources::{AbstractSource, ArticleListing, ListingSource};

/// SQLite-backed document store
pub struct SqliteDocs {
    pool: SqlitePool,
}

impl SqliteDocs {
    /// Open (and create if missing) the database named by a
    /// `sqlite:...` URL, initializing the schema
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| ServicesError::Storage(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id TEXT NOT NULL,
                version INTEGER NOT NULL,
                title TEXT NOT NULL,
                authors TEXT NOT NULL,
                abstract TEXT NOT NULL,
                primary_category TEXT NOT NULL,
                categories TEXT NOT NULL,
                submitted TEXT NOT NULL,
                listing_month TEXT NOT NULL,
                PRIMARY KEY (article_id, version)
            );

            CREATE TABLE IF NOT EXISTS latexml_status (
                article_id TEXT NOT NULL,
                version INTEGER NOT NULL,
                status INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (article_id, version)
            );

            CREATE INDEX IF NOT EXISTS idx_articles_listing
                ON articles(primary_category, listing_month);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save one article version (upsert); used by loaders and test setup
    pub async fn save_article(&self, doc: &DocMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (
                article_id, version, title, authors, abstract,
                primary_category, categories, submitted, listing_month
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (article_id, version) DO UPDATE SET
                title = excluded.title,
                authors = excluded.authors,
                abstract = excluded.abstract,
                primary_category = excluded.primary_category,
                categories = excluded.categories,
                submitted = excluded.submitted,
                listing_month = excluded.listing_month
            "#,
        )
        .bind(doc.article_id.as_ref())
        .bind(doc.version as i64)
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
            VALUES (?, ?, ?, ?)
            ON CONFLICT (article_id, version) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(article_id.as_ref())
        .bind(version as i64)
        .bind(status.code())
        .bind(OffsetDateTime::now_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn highest_version(&self, article_id: &ArticleId) -> Result<Option<u32>> {
        let row = sqlx::query("SELECT MAX(version) AS highest FROM articles WHERE article_id = ?")
            .bind(article_id.as_ref())
            .fetch_one(&self.pool)
            .await?;

        let highest: Option<i64> = row.get("highest");
        Ok(highest.map(|v| v as u32))
    }

    fn doc_from_row(row: &SqliteRow, highest_version: u32) -> Result<DocMetadata> {
        let categories: String = row.get("categories");
        Ok(DocMetadata {
            article_id: ArticleId::new(row.get::<String, _>("article_id"))?,
            version: row.get::<i64, _>("version") as u32,
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
impl AbstractSource for SqliteDocs {
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
            WHERE article_id = ? AND version = ?
            "#,
        )
        .bind(article_id.as_ref())
        .bind(version as i64)
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
impl ListingSource for SqliteDocs {
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
            WHERE a.primary_category = ? AND a.listing_month = ?
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
            WHERE a.primary_category = ? AND a.listing_month = ?
              AND a.version = (SELECT MAX(version) FROM articles WHERE article_id = a.article_id)
            ORDER BY a.article_id
            LIMIT ? OFFSET ?
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
            let version = row.get::<i64, _>("version") as u32;
            items.push(Self::doc_from_row(&row, version)?);
        }

        Ok(ArticleListing {
            items,
            total: total as u64,
        })
    }
}

#[async_trait]
impl RenderStatusSource for SqliteDocs {
    async fn render_status(
        &self,
        article_id: &ArticleId,
        version: u32,
    ) -> eprint::Result<Option<RenderStatus>> {
        let row = sqlx::query("SELECT status FROM latexml_status WHERE article_id = ? AND version = ?")
            .bind(article_id.as_ref())
            .bind(version as i64)
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
