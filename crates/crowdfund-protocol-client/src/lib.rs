/*!
# Crowdfund Protocol Client

Async client for the crowdfunding program: connect a wallet, create a campaign
at its program-derived address, list campaigns, donate and withdraw.

## Architecture

- [`CampaignClient`] orchestrates a session and owns the campaign list cache.
- [`Wallet`] is the injected key-custody capability; [`KeypairWallet`] is the
  headless implementation.
- [`LedgerGateway`] is the network boundary; [`RpcLedgerGateway`] implements it
  over JSON-RPC with broadcast retry and bounded confirmation waits.

Failures surface as labeled [`ClientError`] kinds: wallet, encoding, decoding,
network, program rejection and timeout are never collapsed into one another.

## Usage

```rust,no_run
use crowdfund_protocol_client::{
    CampaignClient, ClientResult, KeypairWallet, LedgerConfig, RpcLedgerGateway, Wallet,
};
use crowdfund_protocol_sdk::DEFAULT_TRANSFER_LAMPORTS;
use solana_sdk::signature::Keypair;
use std::sync::Arc;

async fn example() -> ClientResult<()> {
    let ledger = Arc::new(RpcLedgerGateway::new(LedgerConfig::default()));
    let wallet: Arc<dyn Wallet> = Arc::new(KeypairWallet::new(Keypair::new()));
    let client = CampaignClient::new(Some(wallet), ledger);

    client.connect().await?;
    let receipt = client.create_campaign("Water Well", "Clean water").await?;

    client.donate(&receipt.campaign, DEFAULT_TRANSFER_LAMPORTS).await?;
    for campaign in client.campaigns().await {
        println!("{} {} SOL", campaign.name, campaign.amount_donated_sol());
    }
    Ok(())
}
```
*/

pub mod client;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use client::CampaignClient;
pub use config::{ClientConfig, LedgerConfig, DEFAULT_RPC_URL};
pub use errors::{ClientError, ClientResult, WalletError};
pub use gateway::{LedgerGateway, RpcLedgerGateway};
pub use types::{Campaign, SessionState, TransactionReceipt};
pub use wallet::{KeypairWallet, Wallet};
