//! Hashes verification records and writes them to the ledger one at a time.
//!
//! There is no batching and no rollback: if record N fails, records before it
//! stay committed and the loop moves on to N+1.

use crate::crypto::hashing::to_prefixed_hex;
use crate::domain::ledger::{Ledger, LedgerReceipt};
use crate::domain::record::VerificationRecord;
use primitive_types::H256;
use tracing::{error, info};

#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub committed: Vec<LedgerReceipt>,
    /// Content hash and error message of each record that was not written.
    pub failed: Vec<(H256, String)>,
}

impl SubmissionReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Validates and submits one record.
pub async fn submit_record(
    ledger: &dyn Ledger,
    record: &VerificationRecord,
) -> anyhow::Result<LedgerReceipt> {
    record.validate()?;
    ledger.store_verification_result(&record.submission()).await
}

/// Submits every record in order, one ledger call each.
pub async fn submit_records(
    ledger: &dyn Ledger,
    records: &[VerificationRecord],
) -> SubmissionReport {
    let mut report = SubmissionReport::default();

    for record in records {
        let hash = record.content_hash();
        match submit_record(ledger, record).await {
            Ok(receipt) => {
                info!(
                    subject = %record.subject_name,
                    verification_type = %record.verification_type,
                    content_hash = %to_prefixed_hex(&hash),
                    signature = %receipt.signature,
                    "submitted verification result"
                );
                report.committed.push(receipt);
            }
            Err(e) => {
                error!(
                    subject = %record.subject_name,
                    content_hash = %to_prefixed_hex(&hash),
                    error = %e,
                    "failed to submit verification result"
                );
                report.failed.push((hash, e.to_string()));
            }
        }
    }

    report
}
