// Solana program recording verification results, one account per content hash.
use anchor_lang::prelude::*;

declare_id!("DLCau7AorJhSTSre9xgYZyR9agCNV6RMJR6zwXi1rKfZ");

pub const MAX_VERIFIERS: usize = 8;
pub const MAX_TYPE_LEN: usize = 16;
pub const MAX_REMARK_LEN: usize = 200;

#[program]
pub mod verification_registry {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        let registry = &mut ctx.accounts.registry;
        registry.authority = ctx.accounts.authority.key();
        registry.verification_count = 0;
        registry.verifiers = Vec::new();
        registry.bump = ctx.bumps.registry;
        Ok(())
    }

    pub fn authorize_verifier(ctx: Context<AuthorizeVerifier>, verifier: Pubkey) -> Result<()> {
        let registry = &mut ctx.accounts.registry;
        if registry.may_write(&verifier) {
            return Ok(());
        }
        require!(
            registry.verifiers.len() < MAX_VERIFIERS,
            RegistryError::TooManyVerifiers
        );
        registry.verifiers.push(verifier);
        Ok(())
    }

    pub fn store_verification_result(
        ctx: Context<StoreVerificationResult>,
        hash: [u8; 32],
        is_verified: bool,
        verification_type: String,
        remark: String,
    ) -> Result<()> {
        require!(
            matches!(verification_type.as_str(), "GPA" | "Employment" | "Degree"),
            RegistryError::UnknownVerificationType
        );
        require!(remark.len() <= MAX_REMARK_LEN, RegistryError::RemarkTooLong);

        let signer = ctx.accounts.verifier.key();
        let registry = &mut ctx.accounts.registry;
        require!(registry.may_write(&signer), RegistryError::Unauthorized);
        registry.verification_count = registry
            .verification_count
            .checked_add(1)
            .ok_or(RegistryError::CountOverflow)?;

        let result = &mut ctx.accounts.result;
        result.content_hash = hash;
        result.is_verified = is_verified;
        result.verification_type = verification_type;
        result.remark = remark;
        result.verifier = signer;
        result.recorded_at = Clock::get()?.unix_timestamp;
        result.bump = ctx.bumps.result;

        emit!(VerificationStored {
            content_hash: hash,
            is_verified,
            verifier: signer,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = VerificationRegistry::SPACE,
        seeds = [b"verification_registry"],
        bump
    )]
    pub registry: Account<'info, VerificationRegistry>,
    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct AuthorizeVerifier<'info> {
    #[account(
        mut,
        seeds = [b"verification_registry"],
        bump = registry.bump,
        has_one = authority
    )]
    pub registry: Account<'info, VerificationRegistry>,
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(hash: [u8; 32])]
pub struct StoreVerificationResult<'info> {
    #[account(mut, seeds = [b"verification_registry"], bump = registry.bump)]
    pub registry: Account<'info, VerificationRegistry>,
    // `init` fails if the account exists, so each hash is written once.
    #[account(
        init,
        payer = verifier,
        space = VerificationResult::SPACE,
        seeds = [b"verification", hash.as_ref()],
        bump
    )]
    pub result: Account<'info, VerificationResult>,
    #[account(mut)]
    pub verifier: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[account]
pub struct VerificationRegistry {
    pub authority: Pubkey,
    pub verification_count: u64,
    pub verifiers: Vec<Pubkey>,
    pub bump: u8,
}

impl VerificationRegistry {
    pub const SPACE: usize = 8 + 32 + 8 + (4 + 32 * MAX_VERIFIERS) + 1;

    fn may_write(&self, key: &Pubkey) -> bool {
        self.authority == *key || self.verifiers.contains(key)
    }
}

#[account]
pub struct VerificationResult {
    pub content_hash: [u8; 32],
    pub is_verified: bool,
    pub verification_type: String,
    pub remark: String,
    pub verifier: Pubkey,
    pub recorded_at: i64,
    pub bump: u8,
}

impl VerificationResult {
    pub const SPACE: usize =
        8 + 32 + 1 + (4 + MAX_TYPE_LEN) + (4 + MAX_REMARK_LEN) + 32 + 8 + 1;
}

#[event]
pub struct VerificationStored {
    pub content_hash: [u8; 32],
    pub is_verified: bool,
    pub verifier: Pubkey,
}

#[error_code]
pub enum RegistryError {
    #[msg("signer may not store verification results")]
    Unauthorized,
    #[msg("verification type must be GPA, Employment or Degree")]
    UnknownVerificationType,
    #[msg("remark exceeds 200 bytes")]
    RemarkTooLong,
    #[msg("registry already holds the maximum number of verifiers")]
    TooManyVerifiers,
    #[msg("verification count overflow")]
    CountOverflow,
}
