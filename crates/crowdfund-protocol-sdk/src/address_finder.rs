use crate::{SdkError, SdkResult, CAMPAIGN_SEED_PREFIX, PROGRAM_ID};
use solana_sdk::{pubkey::Pubkey, system_program::ID as SYSTEM_PROGRAM_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFinder {
    pub program_id: Pubkey,
    pub system_program_id: Pubkey,
}

impl AddressFinder {
    pub fn new(program_id: Pubkey, system_program_id: Pubkey) -> Self {
        Self {
            program_id,
            system_program_id,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Campaign PDA for `owner`. One campaign per owner.
    ///
    /// Fails instead of falling back to other seeds: the same address must be
    /// reproducible later for lookups.
    pub fn find_campaign_address(&self, owner: &Pubkey) -> SdkResult<(Pubkey, u8)> {
        Pubkey::try_find_program_address(&[CAMPAIGN_SEED_PREFIX, owner.as_ref()], &self.program_id)
            .ok_or(SdkError::DerivationExhausted {
                program_id: self.program_id,
            })
    }

    /// Whether `address` is the campaign PDA of `owner`.
    pub fn verify_campaign_address(&self, address: &Pubkey, owner: &Pubkey) -> bool {
        matches!(self.find_campaign_address(owner), Ok((expected, _)) if expected == *address)
    }
}

impl Default for AddressFinder {
    fn default() -> Self {
        Self::new(PROGRAM_ID, SYSTEM_PROGRAM_ID)
    }
}
