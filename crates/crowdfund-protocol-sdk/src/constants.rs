use solana_sdk::{pubkey, pubkey::Pubkey};

/// Deployed crowdfunding program.
pub const PROGRAM_ID: Pubkey = pubkey!("5FjkqdAn4VVdKR6MQ7TkcaL9Mkon8DEUGtitbgokJBR1");

/// Seed prefix for campaign PDAs: `[CAMPAIGN_SEED_PREFIX, owner]`.
pub const CAMPAIGN_SEED_PREFIX: &[u8] = b"crowdfunding";

/// Bytes the program allocates for every campaign account.
pub const CAMPAIGN_ACCOUNT_SPACE: usize = 9000;

/// Anchor discriminator length (account and instruction).
pub const DISCRIMINATOR_LEN: usize = 8;

/// Maximum campaign name length in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum campaign description length in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 512;

/// 0.2 SOL, the amount moved by a default donate or withdraw.
pub const DEFAULT_TRANSFER_LAMPORTS: u64 = 200_000_000;
