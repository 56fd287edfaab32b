/*!
# Transaction Builders

High-level builders for crowdfunding operations. Every `build_*_tx` function
returns an **unsigned** transaction with the user as fee payer; signing is the
wallet's job.

Builders make no RPC calls. The caller supplies the recent blockhash.

```rust
use crowdfund_protocol_sdk::{build_create_campaign_tx, AddressFinder};
use solana_sdk::{hash::Hash, pubkey::Pubkey};

let user = Pubkey::new_unique();
let tx = build_create_campaign_tx(
    &AddressFinder::default(),
    &user,
    "Water Well",
    "Clean water",
    Hash::default(),
)
.expect("valid create transaction");

assert_eq!(tx.message.account_keys[0], user);
assert!(!tx.is_signed());
```
*/

use crate::instruction_builders::require_present;
use crate::{build_crowdfund_ix, AddressFinder, CrowdfundInstruction, SdkResult};
use solana_sdk::{hash::Hash, message::Message, pubkey::Pubkey, transaction::Transaction};

/// One client-side intent, alive for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub instruction: CrowdfundInstruction,
    /// Target campaign address.
    pub campaign: Pubkey,
    /// Acting wallet; signs and pays fees.
    pub signer: Pubkey,
}

impl PendingTransaction {
    pub fn new(instruction: CrowdfundInstruction, campaign: Pubkey, signer: Pubkey) -> Self {
        Self {
            instruction,
            campaign,
            signer,
        }
    }

    /// Everything that can be checked without the network.
    pub fn validate(&self) -> SdkResult<()> {
        require_present(&self.campaign, "campaign")?;
        require_present(&self.signer, "user")?;
        self.instruction.validate()
    }
}

pub fn build_pending_tx(
    address_finder: &AddressFinder,
    pending: &PendingTransaction,
    recent_blockhash: Hash,
) -> SdkResult<Transaction> {
    pending.validate()?;

    let ix = build_crowdfund_ix(
        address_finder,
        pending.signer,
        pending.campaign,
        &pending.instruction,
    )?;

    let message = Message::new(&[ix], Some(&pending.signer));
    let mut transaction = Transaction::new_unsigned(message);
    transaction.message.recent_blockhash = recent_blockhash;

    Ok(transaction)
}

/// Build transaction to create the user's campaign at its derived address
pub fn build_create_campaign_tx(
    address_finder: &AddressFinder,
    user: &Pubkey,
    name: &str,
    description: &str,
    recent_blockhash: Hash,
) -> SdkResult<Transaction> {
    let (campaign, _) = address_finder.find_campaign_address(user)?;
    let pending = PendingTransaction::new(
        CrowdfundInstruction::Create {
            name: name.to_string(),
            description: description.to_string(),
        },
        campaign,
        *user,
    );
    build_pending_tx(address_finder, &pending, recent_blockhash)
}

/// Build transaction to donate `amount` lamports to `campaign`
pub fn build_donate_tx(
    address_finder: &AddressFinder,
    user: &Pubkey,
    campaign: &Pubkey,
    amount: u64,
    recent_blockhash: Hash,
) -> SdkResult<Transaction> {
    let pending =
        PendingTransaction::new(CrowdfundInstruction::Donate { amount }, *campaign, *user);
    build_pending_tx(address_finder, &pending, recent_blockhash)
}

/// Build transaction to withdraw `amount` lamports from `campaign`
pub fn build_withdraw_tx(
    address_finder: &AddressFinder,
    user: &Pubkey,
    campaign: &Pubkey,
    amount: u64,
    recent_blockhash: Hash,
) -> SdkResult<Transaction> {
    let pending =
        PendingTransaction::new(CrowdfundInstruction::Withdraw { amount }, *campaign, *user);
    build_pending_tx(address_finder, &pending, recent_blockhash)
}
