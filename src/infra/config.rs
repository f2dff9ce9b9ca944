//! Centralized configuration (environment variables + defaults).

use crate::error::VerificationError;
use std::path::PathBuf;

pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";
pub const DEFAULT_DEPLOYMENT_FILE: &str = "deployment.json";
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 200_000;
pub const DEFAULT_API_BIND_ADDR: &str = "0.0.0.0:3000";

/// Loads `.env` if present. Safe to call more than once.
pub fn load_env() {
    dotenv::dotenv().ok();
}

fn required(name: &str) -> anyhow::Result<String> {
    match optional(name) {
        Some(v) => Ok(v),
        None => Err(VerificationError::MissingConfig(format!("{} must be set", name)).into()),
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Solana RPC URL (required).
pub fn solana_rpc_url() -> anyhow::Result<String> {
    required("SOLANA_RPC_URL")
}

/// Solana program id (required).
///
/// Set this to the Program ID you deployed (e.g. output of `anchor deploy`).
pub fn solana_program_id() -> anyhow::Result<String> {
    required("SOLANA_PROGRAM_ID")
}

/// Path of the signer wallet, tilde-expanded.
pub fn solana_keypair_path() -> PathBuf {
    let raw = optional("SOLANA_KEYPAIR_PATH").unwrap_or_else(|| DEFAULT_KEYPAIR_PATH.to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

/// Fixed compute-unit allowance attached to every ledger write.
pub fn compute_unit_limit() -> anyhow::Result<u32> {
    match optional("LEDGER_COMPUTE_UNIT_LIMIT") {
        None => Ok(DEFAULT_COMPUTE_UNIT_LIMIT),
        Some(v) => match v.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(VerificationError::InvalidConfig(format!(
                "LEDGER_COMPUTE_UNIT_LIMIT must be a positive u32, got {:?}",
                v
            ))
            .into()),
        },
    }
}

pub fn deployment_file() -> PathBuf {
    PathBuf::from(optional("DEPLOYMENT_FILE").unwrap_or_else(|| DEFAULT_DEPLOYMENT_FILE.to_string()))
}

/// Second account the deploy step authorizes to write results (optional).
pub fn authorized_verifier() -> Option<String> {
    optional("AUTHORIZED_VERIFIER")
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    required("DATABASE_URL")
}

pub fn mail_relay_url() -> anyhow::Result<String> {
    required("MAIL_RELAY_URL")
}

pub fn mail_relay_token() -> Option<String> {
    optional("MAIL_RELAY_TOKEN")
}

/// Sender address used on every outgoing notification.
pub fn mail_from() -> anyhow::Result<String> {
    required("MAIL_FROM")
}

pub fn api_bind_addr() -> String {
    optional("API_BIND_ADDR").unwrap_or_else(|| DEFAULT_API_BIND_ADDR.to_string())
}

/// Installs the fmt subscriber used by every binary (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
