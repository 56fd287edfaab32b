use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("No viable program address for campaign seeds under program {program_id}")]
    DerivationExhausted { program_id: Pubkey },

    #[error("Invalid instruction argument: {0}")]
    Encoding(String),

    #[error("Account data is not a campaign: {0}")]
    Decoding(String),

    #[error("Missing required account: {0}")]
    MissingAccount(&'static str),
}
