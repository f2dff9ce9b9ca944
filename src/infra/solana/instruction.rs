//! Wire layout of the verification registry program: instruction data,
//! PDA seeds and account decoding. Must match `solana_program/`.

use crate::domain::record::{LedgerSubmission, VerificationType};
use anyhow::{anyhow, Context, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

pub const REGISTRY_SEED: &[u8] = b"verification_registry";
pub const RESULT_SEED: &[u8] = b"verification";

/// Maximum number of extra accounts the authority may authorize.
pub const MAX_VERIFIERS: usize = 8;

/// Anchor discriminator: first 8 bytes of `sha256("<namespace>:<name>")`.
pub fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    discriminator("global", name)
}

pub fn account_discriminator(type_name: &str) -> [u8; 8] {
    discriminator("account", type_name)
}

pub fn registry_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_SEED], program_id)
}

pub fn result_address(program_id: &Pubkey, content_hash: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RESULT_SEED, content_hash], program_id)
}

pub fn initialize_data() -> Vec<u8> {
    instruction_discriminator("initialize").to_vec()
}

pub fn authorize_verifier_data(verifier: &Pubkey) -> Vec<u8> {
    let mut data = instruction_discriminator("authorize_verifier").to_vec();
    data.extend_from_slice(verifier.as_ref());
    data
}

/// Arguments of `store_verification_result`, in program order.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct StoreArgs {
    pub hash: [u8; 32],
    pub is_verified: bool,
    pub verification_type: String,
    pub remark: String,
}

impl From<&LedgerSubmission> for StoreArgs {
    fn from(submission: &LedgerSubmission) -> Self {
        Self {
            hash: submission.content_hash.to_fixed_bytes(),
            is_verified: submission.is_verified,
            verification_type: submission.verification_type.as_str().to_string(),
            remark: submission.remark.clone(),
        }
    }
}

pub fn store_verification_result_data(submission: &LedgerSubmission) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator("store_verification_result").to_vec();
    StoreArgs::from(submission)
        .serialize(&mut data)
        .context("failed to encode store_verification_result args")?;
    Ok(data)
}

/// Mirror of the on-chain `VerificationRegistry` account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VerificationRegistry {
    pub authority: [u8; 32],
    pub verification_count: u64,
    pub verifiers: Vec<[u8; 32]>,
    pub bump: u8,
}

/// Mirror of the on-chain `VerificationResult` account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VerificationResult {
    pub content_hash: [u8; 32],
    pub is_verified: bool,
    pub verification_type: String,
    pub remark: String,
    pub verifier: [u8; 32],
    pub recorded_at: i64,
    pub bump: u8,
}

/// Checks the discriminator and reads the account body.
/// Accounts are allocated at full size, so trailing padding is left unread.
fn decode_account<T: BorshDeserialize>(data: &[u8], type_name: &str) -> Result<T> {
    if data.len() < 8 {
        return Err(anyhow!("Account data too short"));
    }
    if data[..8] != account_discriminator(type_name) {
        return Err(anyhow!("account is not a {}", type_name));
    }
    T::deserialize(&mut &data[8..]).with_context(|| format!("malformed {} account", type_name))
}

/// Decoded `VerificationRegistry` account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAccount {
    pub authority: Pubkey,
    pub verification_count: u64,
    pub verifiers: Vec<Pubkey>,
}

impl RegistryAccount {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let raw: VerificationRegistry = decode_account(data, "VerificationRegistry")?;
        if raw.verifiers.len() > MAX_VERIFIERS {
            return Err(anyhow!(
                "registry lists {} verifiers, limit is {}",
                raw.verifiers.len(),
                MAX_VERIFIERS
            ));
        }
        Ok(Self {
            authority: Pubkey::new_from_array(raw.authority),
            verification_count: raw.verification_count,
            verifiers: raw.verifiers.into_iter().map(Pubkey::new_from_array).collect(),
        })
    }

    pub fn may_write(&self, signer: &Pubkey) -> bool {
        self.authority == *signer || self.verifiers.contains(signer)
    }
}

/// Decoded `VerificationResult` account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultAccount {
    pub content_hash: [u8; 32],
    pub is_verified: bool,
    pub verification_type: VerificationType,
    pub remark: String,
    pub verifier: Pubkey,
    pub recorded_at: i64,
}

impl ResultAccount {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let raw: VerificationResult = decode_account(data, "VerificationResult")?;
        Ok(Self {
            content_hash: raw.content_hash,
            is_verified: raw.is_verified,
            verification_type: raw.verification_type.parse::<VerificationType>()?,
            remark: raw.remark,
            verifier: Pubkey::new_from_array(raw.verifier),
            recorded_at: raw.recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::H256;

    #[test]
    fn discriminators_follow_anchor_convention() {
        assert_eq!(
            instruction_discriminator("initialize"),
            [175, 175, 109, 31, 13, 152, 155, 237]
        );
        assert_eq!(
            instruction_discriminator("store_verification_result"),
            [233, 199, 45, 205, 126, 141, 187, 235]
        );
        assert_eq!(
            instruction_discriminator("authorize_verifier"),
            [199, 243, 63, 75, 152, 222, 197, 68]
        );
        assert_eq!(
            account_discriminator("VerificationRegistry"),
            [27, 66, 225, 212, 241, 162, 149, 31]
        );
    }

    #[test]
    fn store_data_layout() {
        let submission = LedgerSubmission {
            content_hash: H256::repeat_byte(0xab),
            is_verified: true,
            verification_type: VerificationType::Gpa,
            remark: "ok".to_string(),
        };
        let data = store_verification_result_data(&submission).unwrap();
        assert_eq!(&data[..8], &instruction_discriminator("store_verification_result"));
        assert_eq!(&data[8..40], &[0xab; 32]);
        assert_eq!(data[40], 1);
        assert_eq!(&data[41..45], &3u32.to_le_bytes());
        assert_eq!(&data[45..48], b"GPA");
        assert_eq!(&data[48..52], &2u32.to_le_bytes());
        assert_eq!(&data[52..], b"ok");
    }

    fn account_bytes<T: BorshSerialize>(type_name: &str, body: &T, padding: usize) -> Vec<u8> {
        let mut data = account_discriminator(type_name).to_vec();
        body.serialize(&mut data).unwrap();
        data.extend(std::iter::repeat(0u8).take(padding));
        data
    }

    fn registry_bytes(count: u64, verifiers: &[Pubkey]) -> (Pubkey, Vec<u8>) {
        let authority = Pubkey::new_unique();
        let body = VerificationRegistry {
            authority: authority.to_bytes(),
            verification_count: count,
            verifiers: verifiers.iter().map(|v| v.to_bytes()).collect(),
            bump: 254,
        };
        // unused verifier slots
        (authority, account_bytes("VerificationRegistry", &body, 64))
    }

    #[test]
    fn decodes_registry_account() {
        let extra = Pubkey::new_unique();
        let (authority, data) = registry_bytes(7, &[extra]);
        let reg = RegistryAccount::decode(&data).unwrap();
        assert_eq!(reg.authority, authority);
        assert_eq!(reg.verification_count, 7);
        assert_eq!(reg.verifiers, vec![extra]);
        assert!(reg.may_write(&authority));
        assert!(reg.may_write(&extra));
        assert!(!reg.may_write(&Pubkey::new_unique()));
    }

    #[test]
    fn decodes_padded_result_account() {
        let verifier = Pubkey::new_unique();
        let body = VerificationResult {
            content_hash: [7u8; 32],
            is_verified: false,
            verification_type: "Degree".to_string(),
            remark: "No matching degree".to_string(),
            verifier: verifier.to_bytes(),
            recorded_at: 1_700_000_000,
            bump: 255,
        };
        let data = account_bytes("VerificationResult", &body, 120);

        let res = ResultAccount::decode(&data).unwrap();
        assert_eq!(res.content_hash, [7u8; 32]);
        assert!(!res.is_verified);
        assert_eq!(res.verification_type, VerificationType::Degree);
        assert_eq!(res.remark, "No matching degree");
        assert_eq!(res.verifier, verifier);
        assert_eq!(res.recorded_at, 1_700_000_000);
    }

    #[test]
    fn store_args_read_back_as_program_arguments() {
        let submission = LedgerSubmission {
            content_hash: H256::repeat_byte(0x11),
            is_verified: false,
            verification_type: VerificationType::Employment,
            remark: "left in 2020".to_string(),
        };
        let data = store_verification_result_data(&submission).unwrap();
        let args = StoreArgs::try_from_slice(&data[8..]).unwrap();
        assert_eq!(args.hash, [0x11; 32]);
        assert!(!args.is_verified);
        assert_eq!(args.verification_type, "Employment");
        assert_eq!(args.remark, "left in 2020");
    }

    #[test]
    fn rejects_foreign_or_truncated_accounts() {
        let (_, data) = registry_bytes(1, &[]);
        assert!(ResultAccount::decode(&data).is_err());
        assert!(RegistryAccount::decode(&data[..20]).is_err());
        assert!(RegistryAccount::decode(&[1, 2, 3]).is_err());
    }

    #[test]
    fn result_address_depends_on_hash() {
        let program = Pubkey::new_unique();
        let (a, _) = result_address(&program, &[1u8; 32]);
        let (b, _) = result_address(&program, &[2u8; 32]);
        assert_ne!(a, b);
        assert_eq!(result_address(&program, &[1u8; 32]).0, a);
    }
}
