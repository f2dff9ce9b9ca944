//! `Ledger` implementation on top of the verification registry program.

use crate::crypto::hashing::to_prefixed_hex;
use crate::domain::ledger::{Ledger, LedgerEntry, LedgerReceipt};
use crate::domain::record::LedgerSubmission;
use crate::error::VerificationError;
use crate::infra::config;
use crate::infra::solana::client::SolanaConnection;
use crate::infra::solana::deployment;
use crate::infra::solana::instruction::{self, ResultAccount};
use async_trait::async_trait;
use chrono::DateTime;
use primitive_types::H256;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use tracing::info;

pub struct SolanaLedger {
    conn: SolanaConnection,
    registry: Pubkey,
    compute_unit_limit: u32,
}

impl SolanaLedger {
    /// Wraps a connection. `registry` must be the program's registry PDA.
    pub fn new(conn: SolanaConnection, registry: Pubkey, compute_unit_limit: u32) -> anyhow::Result<Self> {
        let expected = conn.registry_address();
        if registry != expected {
            return Err(VerificationError::InvalidConfig(format!(
                "deployed address {} does not belong to program {} (expected {})",
                registry,
                conn.program_id(),
                expected
            ))
            .into());
        }
        Ok(Self {
            conn,
            registry,
            compute_unit_limit,
        })
    }

    /// Connection from env, registry from the deployment file.
    pub fn from_env() -> anyhow::Result<Self> {
        let conn = SolanaConnection::from_env()?;
        let registry = deployment::load_address(&config::deployment_file())?;
        Self::new(conn, registry, config::compute_unit_limit()?)
    }

    pub fn connection(&self) -> &SolanaConnection {
        &self.conn
    }

    pub fn registry(&self) -> Pubkey {
        self.registry
    }
}

/// A failed send whose result account exists afterwards lost a race with
/// another writer; report it as already recorded rather than a ledger fault.
fn classify_send_failure(err: anyhow::Error, exists_now: bool, content_hash: &H256) -> anyhow::Error {
    if exists_now {
        VerificationError::AlreadyRecorded(to_prefixed_hex(content_hash)).into()
    } else {
        err
    }
}

#[async_trait]
impl Ledger for SolanaLedger {
    async fn store_verification_result(
        &self,
        submission: &LedgerSubmission,
    ) -> anyhow::Result<LedgerReceipt> {
        let hash = submission.content_hash.to_fixed_bytes();
        let (result_pda, _bump) = instruction::result_address(&self.conn.program_id(), &hash);

        // The program would reject the `init` anyway; fail early with a typed error.
        if self.conn.fetch_account(&result_pda).await?.is_some() {
            return Err(VerificationError::AlreadyRecorded(to_prefixed_hex(&submission.content_hash)).into());
        }

        let store_ix = Instruction {
            program_id: self.conn.program_id(),
            accounts: vec![
                AccountMeta::new(self.registry, false),
                AccountMeta::new(result_pda, false),
                AccountMeta::new(self.conn.payer(), true),
                AccountMeta::new_readonly(solana_program::system_program::ID, false),
            ],
            data: instruction::store_verification_result_data(submission)?,
        };
        let budget_ix = ComputeBudgetInstruction::set_compute_unit_limit(self.compute_unit_limit);

        let signature = match self.conn.send(&[budget_ix, store_ix]).await {
            Ok(signature) => signature,
            Err(e) => {
                // Another writer may have created the account after the check above.
                let exists_now = matches!(self.conn.fetch_account(&result_pda).await, Ok(Some(_)));
                return Err(classify_send_failure(e, exists_now, &submission.content_hash));
            }
        };
        info!(
            content_hash = %to_prefixed_hex(&submission.content_hash),
            %signature,
            "verification result stored"
        );
        Ok(LedgerReceipt {
            content_hash: submission.content_hash,
            signature: signature.to_string(),
        })
    }

    async fn verification_count(&self) -> anyhow::Result<u64> {
        Ok(self.conn.read_registry().await?.verification_count)
    }

    async fn verification(&self, content_hash: &H256) -> anyhow::Result<Option<LedgerEntry>> {
        let (pda, _bump) =
            instruction::result_address(&self.conn.program_id(), &content_hash.to_fixed_bytes());
        let Some(account) = self.conn.fetch_account(&pda).await? else {
            return Ok(None);
        };
        let decoded = ResultAccount::decode(&account.data)?;
        let recorded_at = DateTime::from_timestamp(decoded.recorded_at, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid timestamp {}", decoded.recorded_at))?;
        Ok(Some(LedgerEntry {
            content_hash: H256::from(decoded.content_hash),
            is_verified: decoded.is_verified,
            verification_type: decoded.verification_type,
            remark: decoded.remark,
            verifier: decoded.verifier.to_string(),
            recorded_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(err: &anyhow::Error) -> Option<&VerificationError> {
        err.downcast_ref::<VerificationError>()
    }

    #[test]
    fn send_failure_after_concurrent_write_is_already_recorded() {
        let hash = H256::repeat_byte(3);
        let err = classify_send_failure(
            VerificationError::external("ledger", "account already in use").into(),
            true,
            &hash,
        );
        assert!(matches!(class(&err), Some(VerificationError::AlreadyRecorded(h)) if *h == to_prefixed_hex(&hash)));
    }

    #[test]
    fn send_failure_without_account_keeps_ledger_error() {
        let err = classify_send_failure(
            VerificationError::external("ledger", "blockhash not found").into(),
            false,
            &H256::zero(),
        );
        assert!(matches!(class(&err), Some(VerificationError::ExternalCall { service: "ledger", .. })));
    }
}
