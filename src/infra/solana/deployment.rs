//! The deployment file: a JSON object holding the deployed registry address.

use crate::error::VerificationError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug)]
struct DeploymentFile {
    address: String,
}

/// Reads the registry address. A missing file means the deploy step has not run.
pub fn load_address(path: &Path) -> anyhow::Result<Pubkey> {
    if !path.exists() {
        return Err(VerificationError::MissingConfig(format!(
            "deployment file {} not found (run the deploy binary first)",
            path.display()
        ))
        .into());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading deployment file {}", path.display()))?;
    let file: DeploymentFile = serde_json::from_str(&raw).map_err(|e| {
        VerificationError::InvalidConfig(format!("{} is not a deployment file: {}", path.display(), e))
    })?;
    Pubkey::from_str(file.address.trim()).map_err(|e| {
        VerificationError::InvalidConfig(format!(
            "{} holds an invalid address {:?}: {}",
            path.display(),
            file.address,
            e
        ))
        .into()
    })
}

pub fn save_address(path: &Path, address: &Pubkey) -> anyhow::Result<()> {
    let file = DeploymentFile {
        address: address.to_string(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json)
        .with_context(|| format!("failed writing deployment file {}", path.display()))?;
    Ok(())
}
