use async_trait::async_trait;
use crowdfund_protocol_client::{
    CampaignClient, ClientConfig, ClientError, ClientResult, LedgerGateway, SessionState, Wallet,
};
use crowdfund_protocol_testing::{MockLedger, MockWallet, TestFixture, TEST_WALLET_LAMPORTS};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::sync::Arc;
use tokio::sync::Notify;

/// Ledger whose program-account query parks until released
struct GatedLedger {
    inner: Arc<MockLedger>,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl LedgerGateway for GatedLedger {
    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.inner.latest_blockhash().await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature> {
        self.inner.send_and_confirm(transaction).await
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, Vec<u8>)>> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.program_accounts(program_id).await
    }

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        self.inner.fetch_account(address).await
    }
}

/// No wallet installed → WalletUnavailable, session stays disconnected
#[tokio::test]
async fn test_connect_without_wallet() {
    let test = TestFixture::new().await;
    let client = test.client_without_wallet();

    let err = client.connect().await.unwrap_err();
    assert_eq!(err, ClientError::WalletUnavailable);
    assert_eq!(client.state().await, SessionState::Disconnected);
    assert_eq!(client.wallet_address().await, None);

    let err = client.reconnect_if_trusted().await.unwrap_err();
    assert_eq!(err, ClientError::WalletUnavailable);
}

#[tokio::test]
async fn test_connect_records_wallet_address() {
    let test = TestFixture::new().await;
    assert_eq!(test.client.state().await, SessionState::Disconnected);

    let address = test.client.connect().await.expect("connect failed");

    assert_eq!(address, test.wallet_address());
    assert_eq!(test.client.wallet_address().await, Some(address));
    assert_eq!(test.client.state().await, SessionState::Connected);
    assert!(test.client.campaigns().await.is_empty());
}

#[tokio::test]
async fn test_silent_reconnect_requires_prior_trust() {
    let test = TestFixture::new().await;

    let err = test.client.reconnect_if_trusted().await.unwrap_err();
    assert!(matches!(err, ClientError::UserDeclined(_)), "got {err:?}");
    assert_eq!(test.client.state().await, SessionState::Disconnected);

    test.wallet.set_trusted(true);
    let address = test
        .client
        .reconnect_if_trusted()
        .await
        .expect("trusted reconnect failed");
    assert_eq!(address, test.wallet_address());
    assert_eq!(test.client.state().await, SessionState::Connected);
}

#[tokio::test]
async fn test_user_declines_connect() {
    let test = TestFixture::new().await;
    test.wallet.set_decline_connect(true);

    let err = test.client.connect().await.unwrap_err();

    assert!(matches!(err, ClientError::UserDeclined(_)), "got {err:?}");
    assert_eq!(test.client.wallet_address().await, None);
}

#[tokio::test]
async fn test_disconnect_drops_session_and_cache() {
    let test = TestFixture::connected().await;
    test.create_test_campaign().await.expect("create failed");
    test.client.list_campaigns().await.expect("listing failed");
    assert_eq!(test.client.state().await, SessionState::CampaignsLoaded);

    test.client.disconnect().await;

    assert_eq!(test.client.state().await, SessionState::Disconnected);
    assert!(test.client.campaigns().await.is_empty());
    assert_eq!(
        test.client.my_campaign_address().await.unwrap_err(),
        ClientError::NotConnected
    );
}

#[tokio::test]
async fn test_operations_require_connection() {
    let test = TestFixture::new().await;
    let campaign = test
        .ledger
        .address_finder()
        .find_campaign_address(&test.wallet_address())
        .expect("derivation failed")
        .0;

    assert_eq!(
        test.create_test_campaign().await.unwrap_err(),
        ClientError::NotConnected
    );
    assert_eq!(
        test.client.donate(&campaign, 1).await.unwrap_err(),
        ClientError::NotConnected
    );
    assert_eq!(
        test.client.withdraw(&campaign, 1).await.unwrap_err(),
        ClientError::NotConnected
    );
    assert_eq!(
        test.client.list_campaigns().await.unwrap_err(),
        ClientError::NotConnected
    );
    assert_eq!(test.wallet.sign_requests(), 0);
    assert!(test.ledger.confirmed_signatures().await.is_empty());
}

/// Disconnect while a listing is in flight → the listing result is discarded
#[tokio::test]
async fn test_disconnect_during_refresh_discards_result() {
    let ledger = Arc::new(MockLedger::new());
    let wallet = Arc::new(MockWallet::new());
    ledger.airdrop(&wallet.pubkey(), TEST_WALLET_LAMPORTS).await;
    let gated = Arc::new(GatedLedger {
        inner: ledger.clone(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let client = CampaignClient::with_config(
        Some(wallet.clone() as Arc<dyn Wallet>),
        gated.clone() as Arc<dyn LedgerGateway>,
        ledger.address_finder(),
        ClientConfig::default(),
    );
    client.connect().await.unwrap();
    client
        .create_campaign("Water Well", "Clean water")
        .await
        .unwrap();

    let interrupt = async {
        gated.entered.notified().await;
        gated.release.notify_one();
        client.disconnect().await;
    };
    let (listed, ()) = tokio::join!(client.list_campaigns(), interrupt);

    assert_eq!(listed.unwrap_err(), ClientError::NotConnected);
    assert_eq!(client.state().await, SessionState::Disconnected);
    assert!(client.campaigns().await.is_empty());

    client.connect().await.unwrap();
    assert_eq!(client.state().await, SessionState::Connected);
    assert!(client.campaigns().await.is_empty());
}
