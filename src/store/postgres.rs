//! Postgres-backed [`EventStore`] over a shared connection pool.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::Config;
use crate::store::types::EventDbRow;
use crate::store::{EventRecord, EventStore, StoreError};

/// The pool is the process-wide shared handle: cloned into the scheduler
/// task and every request-handling task, initialized once at startup and
/// never torn down in steady operation.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a connection pool and create the schema if absent.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.db_host)
            .username(&config.db_user)
            .password(&config.db_pass)
            .database(&config.db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        tracing::info!(host = %config.db_host, db = %config.db_name, "Connected to event store");
        Ok(db)
    }

    /// Idempotent schema setup, run on every startup.
    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                uid     TEXT NOT NULL PRIMARY KEY,
                summary TEXT NOT NULL,
                dtstart TIMESTAMP NOT NULL,
                dtend   TIMESTAMP NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl EventStore for Database {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<EventRecord>, StoreError> {
        let row: Option<EventDbRow> = sqlx::query_as(
            "SELECT uid, summary, dtstart, dtend FROM events WHERE uid = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EventDbRow::into_record))
    }

    async fn insert(&self, record: &EventRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO events (uid, summary, dtstart, dtend)
            VALUES ($1, $2, $3, $4)
        "#,
        )
        .bind(&record.uid)
        .bind(&record.summary)
        .bind(record.start_timestamp())
        .bind(record.end_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, uid: &str, record: &EventRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE events
            SET summary = $2, dtstart = $3, dtend = $4
            WHERE uid = $1
        "#,
        )
        .bind(uid)
        .bind(&record.summary)
        .bind(record.start_timestamp())
        .bind(record.end_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<EventRecord>, StoreError> {
        let rows: Vec<EventDbRow> = sqlx::query_as(
            "SELECT uid, summary, dtstart, dtend FROM events ORDER BY dtstart, uid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EventDbRow::into_record).collect())
    }
}
