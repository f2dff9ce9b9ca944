//! The ledger port: where verification outcomes are recorded, write-once.

use crate::domain::record::{LedgerSubmission, VerificationType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use primitive_types::H256;

/// Receipt for a confirmed ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub content_hash: H256,
    /// Transaction signature as reported by the ledger.
    pub signature: String,
}

/// A verification result read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub content_hash: H256,
    pub is_verified: bool,
    pub verification_type: VerificationType,
    pub remark: String,
    /// Account that wrote the entry.
    pub verifier: String,
    pub recorded_at: DateTime<Utc>,
}

/// External ledger holding verification results.
///
/// Implementations are constructed once and shared by reference; they must
/// refuse a second write for a content hash that is already recorded.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Writes one result. Exactly one ledger-mutating call per invocation.
    async fn store_verification_result(
        &self,
        submission: &LedgerSubmission,
    ) -> anyhow::Result<LedgerReceipt>;

    /// Number of results recorded so far.
    async fn verification_count(&self) -> anyhow::Result<u64>;

    /// Looks up a previously stored result by content hash.
    async fn verification(&self, content_hash: &H256) -> anyhow::Result<Option<LedgerEntry>>;
}
