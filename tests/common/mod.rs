//! In-memory stand-ins for the ledger, the record store and the mail relay.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use primitive_types::H256;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use verification_ledger::domain::notification::NewEnrollment;
use verification_ledger::{
    to_prefixed_hex, EmailMessage, Ledger, LedgerEntry, LedgerReceipt, LedgerSubmission, Mailer,
    NotificationRecord, RecordStore, VerificationError,
};

#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
    /// Hashes whose write is rejected as if the ledger call failed.
    failing: Mutex<HashSet<H256>>,
    pub write_calls: Mutex<usize>,
}

impl MemoryLedger {
    pub fn fail_on(&self, hash: H256) {
        self.failing.lock().unwrap().insert(hash);
    }

    pub fn stored_hashes(&self) -> Vec<H256> {
        self.entries.lock().unwrap().iter().map(|e| e.content_hash).collect()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn store_verification_result(
        &self,
        submission: &LedgerSubmission,
    ) -> anyhow::Result<LedgerReceipt> {
        *self.write_calls.lock().unwrap() += 1;
        if self.failing.lock().unwrap().contains(&submission.content_hash) {
            return Err(VerificationError::external("ledger", "transaction rejected").into());
        }
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.content_hash == submission.content_hash) {
            return Err(VerificationError::AlreadyRecorded(to_prefixed_hex(&submission.content_hash)).into());
        }
        entries.push(LedgerEntry {
            content_hash: submission.content_hash,
            is_verified: submission.is_verified,
            verification_type: submission.verification_type,
            remark: submission.remark.clone(),
            verifier: "memory".to_string(),
            recorded_at: Utc::now(),
        });
        Ok(LedgerReceipt {
            content_hash: submission.content_hash,
            signature: format!("sig-{}", entries.len()),
        })
    }

    async fn verification_count(&self) -> anyhow::Result<u64> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    async fn verification(&self, content_hash: &H256) -> anyhow::Result<Option<LedgerEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.content_hash == *content_hash)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<i64, NotificationRecord>>,
    /// Every `notified` value ever written per id, in order.
    pub notified_writes: Mutex<Vec<(i64, bool)>>,
    /// Ids whose status update fails.
    failing_updates: Mutex<HashSet<i64>>,
}

impl MemoryRecordStore {
    pub fn with_records(records: &[(&str, &str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for (i, (name, email, status)) in records.iter().enumerate() {
                let id = i as i64 + 1;
                map.insert(
                    id,
                    NotificationRecord {
                        id,
                        name: name.to_string(),
                        email: email.to_string(),
                        status: status.to_string(),
                        notified: false,
                        created_at: Utc::now(),
                    },
                );
            }
        }
        store
    }

    pub fn fail_update_for(&self, id: i64) {
        self.failing_updates.lock().unwrap().insert(id);
    }

    pub fn get(&self, id: i64) -> NotificationRecord {
        self.records.lock().unwrap()[&id].clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_unnotified(&self) -> anyhow::Result<Vec<NotificationRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| !r.notified)
            .cloned()
            .collect())
    }

    async fn mark_notified(&self, id: i64) -> anyhow::Result<()> {
        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(VerificationError::external("database", "update timed out").into());
        }
        let mut map = self.records.lock().unwrap();
        let record = map
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no record {}", id))?;
        record.notified = true;
        self.notified_writes.lock().unwrap().push((id, true));
        Ok(())
    }

    async fn enroll(&self, enrollment: NewEnrollment) -> anyhow::Result<NotificationRecord> {
        let mut map = self.records.lock().unwrap();
        let id = map.keys().next_back().copied().unwrap_or(0) + 1;
        let record = NotificationRecord {
            id,
            name: enrollment.name,
            email: enrollment.email,
            status: enrollment.status,
            notified: false,
            created_at: Utc::now(),
        };
        map.insert(id, record.clone());
        Ok(record)
    }

    async fn list(&self, limit: u32) -> anyhow::Result<Vec<NotificationRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Records every message; fails sends to the listed addresses.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingMailer {
    pub fn fail_for(&self, address: &str) {
        self.failing.lock().unwrap().insert(address.to_string());
    }

    pub fn heal(&self, address: &str) {
        self.failing.lock().unwrap().remove(address);
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(&message.to) {
            return Err(VerificationError::external("mail relay", "connection refused").into());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
