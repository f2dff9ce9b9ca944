pub mod postgres;

pub use postgres::{PostgresRecordStore, RECORDS_TABLE};

use crate::domain::notification::{NewEnrollment, NotificationRecord};
use async_trait::async_trait;

/// The document store holding candidate-facing records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records with `notified = false`, oldest first.
    async fn find_unnotified(&self) -> anyhow::Result<Vec<NotificationRecord>>;

    /// Sets `notified = true` for one record. Never clears the flag.
    async fn mark_notified(&self, id: i64) -> anyhow::Result<()>;

    async fn enroll(&self, enrollment: NewEnrollment) -> anyhow::Result<NotificationRecord>;

    /// Newest records first, at most `limit`.
    async fn list(&self, limit: u32) -> anyhow::Result<Vec<NotificationRecord>>;

    /// Cheap reachability probe.
    async fn ping(&self) -> anyhow::Result<()>;
}
