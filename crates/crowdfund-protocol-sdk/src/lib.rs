mod address_finder;
mod constants;
mod error;
mod instruction;
mod instruction_builders;
mod state;
mod transaction_builders;

pub use address_finder::AddressFinder;
pub use constants::*;
pub use error::{SdkError, SdkResult};
pub use instruction::{AmountArgs, CreateArgs, CrowdfundInstruction};
pub use instruction_builders::*;
pub use state::CampaignAccount;
pub use transaction_builders::*;

// Re-export program ID
pub use constants::PROGRAM_ID as CROWDFUND_PROGRAM_ID;
