use {
    crate::{MockLedger, MockWallet},
    crowdfund_protocol_client::{
        CampaignClient, ClientConfig, ClientResult, LedgerGateway, TransactionReceipt, Wallet,
    },
    solana_sdk::pubkey::Pubkey,
    std::sync::Arc,
};

/// Standard test constants
pub const TEST_WALLET_LAMPORTS: u64 = 10_000_000_000; // 10 SOL
pub const TEST_CAMPAIGN_NAME: &str = "Water Well";
pub const TEST_CAMPAIGN_DESCRIPTION: &str = "Clean water";

/// One funded wallet and a client wired to a shared in-memory ledger
pub struct TestFixture {
    pub ledger: Arc<MockLedger>,
    pub wallet: Arc<MockWallet>,
    pub client: CampaignClient,
}

impl TestFixture {
    /// Create a new test fixture with the default refresh policy
    pub async fn new() -> Self {
        Self::with_config(ClientConfig::default()).await
    }

    pub async fn with_config(config: ClientConfig) -> Self {
        Self::on_ledger(Arc::new(MockLedger::new()), config).await
    }

    /// Add a funded user to an existing ledger, e.g. a second participant
    pub async fn on_ledger(ledger: Arc<MockLedger>, config: ClientConfig) -> Self {
        let wallet = Arc::new(MockWallet::new());
        ledger.airdrop(&wallet.pubkey(), TEST_WALLET_LAMPORTS).await;

        let client = CampaignClient::with_config(
            Some(wallet.clone() as Arc<dyn Wallet>),
            ledger.clone() as Arc<dyn LedgerGateway>,
            ledger.address_finder(),
            config,
        );

        Self {
            ledger,
            wallet,
            client,
        }
    }

    /// Fixture with the wallet already connected
    pub async fn connected() -> Self {
        let fixture = Self::new().await;
        fixture
            .client
            .connect()
            .await
            .expect("mock wallet should connect");
        fixture
    }

    /// Connected second user sharing this fixture's ledger
    pub async fn another_user(&self) -> Self {
        let other = Self::on_ledger(self.ledger.clone(), *self.client.config()).await;
        other
            .client
            .connect()
            .await
            .expect("mock wallet should connect");
        other
    }

    pub fn wallet_address(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    /// Create the standard test campaign for this fixture's wallet
    pub async fn create_test_campaign(&self) -> ClientResult<TransactionReceipt> {
        self.client
            .create_campaign(TEST_CAMPAIGN_NAME, TEST_CAMPAIGN_DESCRIPTION)
            .await
    }

    /// Client with no wallet installed, reading the same ledger
    pub fn client_without_wallet(&self) -> CampaignClient {
        CampaignClient::with_config(
            None,
            self.ledger.clone() as Arc<dyn LedgerGateway>,
            self.ledger.address_finder(),
            *self.client.config(),
        )
    }
}
