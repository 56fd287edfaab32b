/*!
# Client Data Types

Application-level records handed to callers.
*/

use crowdfund_protocol_sdk::CampaignAccount;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Signature};

/// A decoded, address-verified campaign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    /// Derived account address; the lookup key
    pub address: Pubkey,
    pub owner: Pubkey,
    pub name: String,
    pub description: String,
    /// Lamports
    pub amount_donated: u64,
}

impl Campaign {
    pub fn from_account(address: Pubkey, account: CampaignAccount) -> Self {
        Self {
            address,
            owner: account.admin,
            name: account.name,
            description: account.description,
            amount_donated: account.amount_donated,
        }
    }

    pub fn amount_donated_sol(&self) -> f64 {
        self.amount_donated as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
    CampaignsLoaded,
}

/// Result of a confirmed write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub signature: Signature,
    /// Campaign the transaction targeted
    pub campaign: Pubkey,
}
