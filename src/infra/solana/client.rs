// Responsible for all communication with the Solana blockchain.

use crate::error::VerificationError;
use crate::infra::config;
use crate::infra::solana::instruction::{self, RegistryAccount, MAX_VERIFIERS};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    signature::Signature,
    signer::{
        keypair::{read_keypair_file, Keypair},
        Signer,
    },
    transaction::Transaction,
};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// RPC client, signer and program id, built once and shared.
pub struct SolanaConnection {
    client: RpcClient,
    payer: Keypair,
    program_id: Pubkey,
}

impl SolanaConnection {
    pub fn new(rpc_url: String, payer: Keypair, program_id: Pubkey) -> Self {
        let client = RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed());
        Self {
            client,
            payer,
            program_id,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let rpc_url = config::solana_rpc_url()?;
        let program_id = parse_pubkey("SOLANA_PROGRAM_ID", &config::solana_program_id()?)?;
        let payer = load_keypair(&config::solana_keypair_path())?;
        Ok(Self::new(rpc_url, payer, program_id))
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.client
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// The registry PDA this program owns.
    pub fn registry_address(&self) -> Pubkey {
        instruction::registry_address(&self.program_id).0
    }

    /// Fetches an account, mapping "not found" to `None`.
    pub async fn fetch_account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>> {
        let resp = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| VerificationError::external("ledger", e))?;
        Ok(resp.value)
    }

    pub async fn read_registry(&self) -> anyhow::Result<RegistryAccount> {
        let address = self.registry_address();
        let account = self.fetch_account(&address).await?.ok_or_else(|| {
            VerificationError::MissingConfig(format!(
                "verification registry {} is not initialized",
                address
            ))
        })?;
        RegistryAccount::decode(&account.data)
    }

    /// Signs with the payer and sends, waiting for confirmation.
    pub async fn send(&self, instructions: &[Instruction]) -> anyhow::Result<Signature> {
        let mut transaction = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        let recent_blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| VerificationError::external("ledger", e))?;
        transaction.sign(&[&self.payer], recent_blockhash);
        let signature = self
            .client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(|e| VerificationError::external("ledger", e))?;
        Ok(signature)
    }

    /// Creates the registry account, with the payer as authority.
    /// Returns the registry address; if it already exists nothing is sent.
    pub async fn initialize_registry(&self) -> anyhow::Result<Pubkey> {
        let registry = self.registry_address();

        if let Some(existing) = self.fetch_account(&registry).await? {
            let decoded = RegistryAccount::decode(&existing.data)?;
            info!(%registry, authority = %decoded.authority, "verification registry already initialized");
            return Ok(registry);
        }

        info!(%registry, "initializing verification registry");
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(registry, false),
                AccountMeta::new(self.payer.pubkey(), true),
                AccountMeta::new_readonly(solana_program::system_program::ID, false),
            ],
            data: instruction::initialize_data(),
        };
        let signature = self.send(&[ix]).await?;
        info!(%registry, %signature, "verification registry initialized");
        Ok(registry)
    }

    /// Lets a second account write results. Returns `None` if it already can.
    pub async fn authorize_verifier(&self, verifier: &Pubkey) -> anyhow::Result<Option<Signature>> {
        let registry_state = self.read_registry().await?;
        if registry_state.may_write(verifier) {
            info!(%verifier, "verifier already authorized");
            return Ok(None);
        }
        if registry_state.authority != self.payer.pubkey() {
            return Err(VerificationError::InvalidConfig(format!(
                "signer {} is not the registry authority {}",
                self.payer.pubkey(),
                registry_state.authority
            ))
            .into());
        }
        if registry_state.verifiers.len() >= MAX_VERIFIERS {
            return Err(anyhow::anyhow!(
                "registry already authorizes {} verifiers",
                MAX_VERIFIERS
            ));
        }

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.registry_address(), false),
                AccountMeta::new_readonly(self.payer.pubkey(), true),
            ],
            data: instruction::authorize_verifier_data(verifier),
        };
        let signature = self.send(&[ix]).await?;
        info!(%verifier, %signature, "verifier authorized");
        Ok(Some(signature))
    }
}

pub fn load_keypair(path: &Path) -> anyhow::Result<Keypair> {
    if !path.exists() {
        return Err(VerificationError::MissingConfig(format!(
            "wallet keypair file {} not found",
            path.display()
        ))
        .into());
    }
    read_keypair_file(path).map_err(|e| {
        VerificationError::InvalidConfig(format!(
            "Failed to read keypair file {}: {}",
            path.display(),
            e
        ))
        .into()
    })
}

pub fn parse_pubkey(what: &str, value: &str) -> anyhow::Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|e| {
        VerificationError::InvalidConfig(format!("{} is not a valid pubkey: {}", what, e)).into()
    })
}
