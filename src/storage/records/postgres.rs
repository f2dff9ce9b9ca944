//! Record store implementation using PostgreSQL.

use super::RecordStore;
use crate::domain::notification::{NewEnrollment, NotificationRecord};
use crate::error::VerificationError;
use crate::infra::config;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::debug;

/// Fixed collection the notification sweep reads.
pub const RECORDS_TABLE: &str = "verification_records";

/// A record store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Connects using `DATABASE_URL` and ensures the table exists.
    pub async fn connect() -> Result<Self> {
        let database_url = config::database_url()?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .map_err(|e| VerificationError::external("database", e))?;
        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: PgPool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS verification_records (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                status TEXT NOT NULL,
                notified BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS verification_records_unnotified
             ON verification_records (id) WHERE notified = FALSE",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_record(row: &PgRow) -> Result<NotificationRecord> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(NotificationRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status: row.try_get("status")?,
        notified: row.try_get("notified")?,
        created_at,
    })
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn find_unnotified(&self) -> Result<Vec<NotificationRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, email, status, notified, created_at
             FROM verification_records WHERE notified = FALSE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerificationError::external("database", e))?;
        debug!(table = RECORDS_TABLE, count = rows.len(), "fetched unnotified records");
        rows.iter().map(row_to_record).collect()
    }

    async fn mark_notified(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE verification_records SET notified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| VerificationError::external("database", e))?;
        Ok(())
    }

    async fn enroll(&self, enrollment: NewEnrollment) -> Result<NotificationRecord> {
        let row = sqlx::query(
            "INSERT INTO verification_records (name, email, status)
             VALUES ($1, $2, $3)
             RETURNING id, name, email, status, notified, created_at",
        )
        .bind(enrollment.name.trim())
        .bind(enrollment.email.trim())
        .bind(enrollment.status.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VerificationError::external("database", e))?;
        row_to_record(&row)
    }

    async fn list(&self, limit: u32) -> Result<Vec<NotificationRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, email, status, notified, created_at
             FROM verification_records ORDER BY id DESC LIMIT $1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerificationError::external("database", e))?;
        rows.iter().map(row_to_record).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| VerificationError::external("database", e))?;
        Ok(())
    }
}
