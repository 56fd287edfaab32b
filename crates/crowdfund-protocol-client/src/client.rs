/*!
# Campaign Client

Session orchestrator: wallet connection, campaign writes through the
[`LedgerGateway`], and the campaign list cache.

The cache has a single writer. Refreshes are serialized and the list is
replaced wholesale, so concurrent refreshes never interleave partial writes.
*/

use crate::{
    config::ClientConfig,
    errors::{ClientError, ClientResult},
    gateway::LedgerGateway,
    types::{Campaign, SessionState, TransactionReceipt},
    wallet::Wallet,
};
use crowdfund_protocol_sdk::{
    build_pending_tx, AddressFinder, CampaignAccount, CrowdfundInstruction, PendingTransaction,
};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

pub struct CampaignClient {
    wallet: Option<Arc<dyn Wallet>>,
    ledger: Arc<dyn LedgerGateway>,
    address_finder: AddressFinder,
    config: ClientConfig,

    /// Connected wallet identity
    session: RwLock<Option<Pubkey>>,
    /// `None` until the first successful listing
    campaigns: RwLock<Option<Vec<Campaign>>>,
    refresh_lock: Mutex<()>,
}

impl CampaignClient {
    /// Create a client with the default program and refresh policy.
    ///
    /// `wallet` is `None` when no wallet is installed.
    pub fn new(wallet: Option<Arc<dyn Wallet>>, ledger: Arc<dyn LedgerGateway>) -> Self {
        Self::with_config(
            wallet,
            ledger,
            AddressFinder::default(),
            ClientConfig::default(),
        )
    }

    pub fn with_config(
        wallet: Option<Arc<dyn Wallet>>,
        ledger: Arc<dyn LedgerGateway>,
        address_finder: AddressFinder,
        config: ClientConfig,
    ) -> Self {
        Self {
            wallet,
            ledger,
            address_finder,
            config,
            session: RwLock::new(None),
            campaigns: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    // ================================================================================================
    // Session
    // ================================================================================================

    /// User-initiated connect.
    pub async fn connect(&self) -> ClientResult<Pubkey> {
        self.connect_with(false).await
    }

    /// Silent reconnect, only succeeds if the wallet already trusts this client.
    pub async fn reconnect_if_trusted(&self) -> ClientResult<Pubkey> {
        self.connect_with(true).await
    }

    async fn connect_with(&self, only_if_trusted: bool) -> ClientResult<Pubkey> {
        let wallet = self.wallet.as_ref().ok_or(ClientError::WalletUnavailable)?;

        let address = wallet.connect(only_if_trusted).await.map_err(|e| {
            warn!(only_if_trusted, "wallet connection failed: {}", e);
            ClientError::from(e)
        })?;

        *self.session.write().await = Some(address);
        info!(%address, only_if_trusted, "wallet connected");
        Ok(address)
    }

    /// Drop the session and the cached campaign list.
    ///
    /// A refresh still in flight sees the session change and discards its result.
    pub async fn disconnect(&self) {
        *self.session.write().await = None;
        let _refresh = self.refresh_lock.lock().await;
        *self.campaigns.write().await = None;
        info!("wallet disconnected");
    }

    pub async fn state(&self) -> SessionState {
        if self.session.read().await.is_none() {
            SessionState::Disconnected
        } else if self.campaigns.read().await.is_none() {
            SessionState::Connected
        } else {
            SessionState::CampaignsLoaded
        }
    }

    pub async fn wallet_address(&self) -> Option<Pubkey> {
        *self.session.read().await
    }

    async fn require_connected(&self) -> ClientResult<Pubkey> {
        let session = *self.session.read().await;
        session.ok_or(ClientError::NotConnected)
    }

    /// Campaign address of the connected wallet.
    pub async fn my_campaign_address(&self) -> ClientResult<Pubkey> {
        let user = self.require_connected().await?;
        let (address, _) = self.address_finder.find_campaign_address(&user)?;
        Ok(address)
    }

    // ================================================================================================
    // Campaign Operations
    // ================================================================================================

    /// Create the connected wallet's campaign.
    ///
    /// The cache is left alone unless `refresh_after_create` is set.
    pub async fn create_campaign(
        &self,
        name: &str,
        description: &str,
    ) -> ClientResult<TransactionReceipt> {
        let user = self.require_connected().await?;
        let (campaign, bump) = self.address_finder.find_campaign_address(&user)?;
        debug!(%campaign, bump, "derived campaign address");

        let instruction = CrowdfundInstruction::Create {
            name: name.to_string(),
            description: description.to_string(),
        };
        let signature = self
            .submit(PendingTransaction::new(instruction, campaign, user))
            .await?;
        info!(%campaign, %signature, name, "campaign created");

        if self.config.refresh_after_create {
            self.refresh_after(signature).await?;
        }
        Ok(TransactionReceipt {
            signature,
            campaign,
        })
    }

    /// Donate `amount` lamports. Refreshes the list afterwards by default.
    pub async fn donate(&self, campaign: &Pubkey, amount: u64) -> ClientResult<TransactionReceipt> {
        let user = self.require_connected().await?;

        let signature = self
            .submit(PendingTransaction::new(
                CrowdfundInstruction::Donate { amount },
                *campaign,
                user,
            ))
            .await?;
        info!(%campaign, %signature, amount, "donation confirmed");

        if self.config.refresh_after_donate {
            self.refresh_after(signature).await?;
        }
        Ok(TransactionReceipt {
            signature,
            campaign: *campaign,
        })
    }

    /// Withdraw `amount` lamports. Does not refresh the list by default.
    pub async fn withdraw(
        &self,
        campaign: &Pubkey,
        amount: u64,
    ) -> ClientResult<TransactionReceipt> {
        let user = self.require_connected().await?;

        let signature = self
            .submit(PendingTransaction::new(
                CrowdfundInstruction::Withdraw { amount },
                *campaign,
                user,
            ))
            .await?;
        info!(%campaign, %signature, amount, "withdrawal confirmed");

        if self.config.refresh_after_withdraw {
            self.refresh_after(signature).await?;
        }
        Ok(TransactionReceipt {
            signature,
            campaign: *campaign,
        })
    }

    /// Re-read every program account and replace the cache.
    ///
    /// Accounts that do not decode as campaigns, or that do not sit at their
    /// owner's derived address, are skipped.
    pub async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>> {
        let user = self.require_connected().await?;
        let _refresh = self.refresh_lock.lock().await;

        let accounts = self
            .ledger
            .program_accounts(&self.address_finder.program_id)
            .await?;
        let total = accounts.len();

        let mut campaigns: Vec<Campaign> = accounts
            .into_iter()
            .filter_map(|(address, data)| match self.decode_campaign(address, &data) {
                Ok(campaign) => Some(campaign),
                Err(e) => {
                    debug!(%address, "skipping program account: {}", e);
                    None
                }
            })
            .collect();
        campaigns.sort_by_key(|campaign| campaign.address);

        if campaigns.len() < total {
            warn!(
                skipped = total - campaigns.len(),
                total, "some program accounts are not campaigns"
            );
        }

        // Session check and cache write happen under the cache lock
        let mut cache = self.campaigns.write().await;
        if *self.session.read().await != Some(user) {
            debug!(%user, "session changed during refresh, discarding result");
            return Err(ClientError::NotConnected);
        }
        *cache = Some(campaigns.clone());
        info!(count = campaigns.len(), "campaign list refreshed");
        Ok(campaigns)
    }

    /// Fetch and verify a single campaign. `Ok(None)` if no account exists.
    pub async fn fetch_campaign(&self, address: &Pubkey) -> ClientResult<Option<Campaign>> {
        match self.ledger.fetch_account(address).await? {
            Some(data) => self.decode_campaign(*address, &data).map(Some),
            None => Ok(None),
        }
    }

    /// Snapshot of the cached list; empty before the first listing.
    pub async fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.read().await.clone().unwrap_or_default()
    }

    // ================================================================================================
    // Internals
    // ================================================================================================

    fn decode_campaign(&self, address: Pubkey, data: &[u8]) -> ClientResult<Campaign> {
        let account = CampaignAccount::try_from_account_data(data)?;
        if !self
            .address_finder
            .verify_campaign_address(&address, &account.admin)
        {
            return Err(ClientError::Decoding(format!(
                "{address} is not the campaign address of owner {}",
                account.admin
            )));
        }
        Ok(Campaign::from_account(address, account))
    }

    /// Build, sign and submit one pending transaction.
    async fn submit(&self, pending: PendingTransaction) -> ClientResult<Signature> {
        let wallet = self.wallet.as_ref().ok_or(ClientError::WalletUnavailable)?;
        pending.validate()?;

        let recent_blockhash = self.ledger.latest_blockhash().await?;
        let transaction = build_pending_tx(&self.address_finder, &pending, recent_blockhash)?;
        debug!(
            instruction = pending.instruction.name(),
            campaign = %pending.campaign,
            signer = %pending.signer,
            "requesting signature"
        );

        let signed = wallet.sign_transaction(transaction).await?;
        self.ledger.send_and_confirm(&signed).await.map_err(|e| {
            warn!(instruction = pending.instruction.name(), "submission failed: {}", e);
            e
        })
    }

    async fn refresh_after(&self, signature: Signature) -> ClientResult<()> {
        self.list_campaigns()
            .await
            .map(|_| ())
            .map_err(|source| ClientError::RefreshFailed {
                signature,
                source: Box::new(source),
            })
    }

    /// Get the address finder
    pub fn address_finder(&self) -> &AddressFinder {
        &self.address_finder
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
