//! SQLite persistence for scraped campaign records.
//!
//! One table, keyed by `source_url`. Re-scraping a URL upserts a full
//! replacement row; callers never observe a half-written record. Amounts
//! persist as nullable REAL columns (`NULL` = unknown, kept distinct from
//! zero) and the donation list as a JSON array column.

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::{debug, info, instrument};

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Amount, CampaignRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS campaigns (
    source_url TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    amount_raised REAL,
    goal REAL,
    donations TEXT NOT NULL,
    scraped_at TEXT NOT NULL
)";

/// Handle to the campaign database. Cheap to clone; all clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (or create) the database file at `path` and apply the schema.
    #[instrument(level = "info")]
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self::init(pool).await?;
        info!(path, "Store opened");
        Ok(store)
    }

    /// In-memory database for tests. Pinned to a single connection: each
    /// SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert the record, replacing any prior record with the same
    /// `source_url`.
    #[instrument(level = "debug", skip_all, fields(source_url = %record.source_url))]
    pub async fn upsert(&self, record: &CampaignRecord) -> Result<(), StoreError> {
        let donations = serde_json::to_string(&record.donations)?;
        sqlx::query(
            "INSERT INTO campaigns
                 (source_url, title, description, amount_raised, goal, donations, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(source_url) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 amount_raised = excluded.amount_raised,
                 goal = excluded.goal,
                 donations = excluded.donations,
                 scraped_at = excluded.scraped_at",
        )
        .bind(&record.source_url)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.amount_raised.as_f64())
        .bind(record.goal.as_f64())
        .bind(donations)
        .bind(record.scraped_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        debug!("Upserted campaign record");
        Ok(())
    }

    /// Look up one record by its source URL.
    pub async fn get(&self, source_url: &str) -> Result<Option<CampaignRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT source_url, title, description, amount_raised, goal, donations, scraped_at
             FROM campaigns WHERE source_url = ?1",
        )
        .bind(source_url)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_record).transpose()
    }

    /// All records, most recently scraped first, source URL as tiebreaker.
    /// The order is stable so repeated exports of the same data are
    /// byte-identical.
    pub async fn list_all(&self) -> Result<Vec<CampaignRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT source_url, title, description, amount_raised, goal, donations, scraped_at
             FROM campaigns ORDER BY scraped_at DESC, source_url ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: SqliteRow) -> Result<CampaignRecord, StoreError> {
    let donations: String = row.try_get("donations")?;
    let scraped_at: String = row.try_get("scraped_at")?;
    Ok(CampaignRecord {
        source_url: row.try_get("source_url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        amount_raised: Amount::from_f64(row.try_get("amount_raised")?),
        goal: Amount::from_f64(row.try_get("goal")?),
        donations: serde_json::from_str(&donations)?,
        scraped_at: DateTime::parse_from_rfc3339(&scraped_at)?.with_timezone(&Utc),
    })
}
