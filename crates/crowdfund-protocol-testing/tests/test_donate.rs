use crowdfund_protocol_client::{ClientConfig, ClientError, SessionState};
use crowdfund_protocol_sdk::DEFAULT_TRANSFER_LAMPORTS;
use crowdfund_protocol_testing::{TestFixture, MOCK_FEE_LAMPORTS, TEST_WALLET_LAMPORTS};
use solana_sdk::pubkey::Pubkey;

/// Donation moves lamports and the list is refreshed afterwards
#[tokio::test]
async fn test_donate_happy_path() {
    let owner = TestFixture::connected().await;
    let donor = owner.another_user().await;
    let campaign = owner.create_test_campaign().await.unwrap().campaign;
    let campaign_balance = owner.ledger.balance(&campaign).await;

    let receipt = donor
        .client
        .donate(&campaign, DEFAULT_TRANSFER_LAMPORTS)
        .await
        .expect("donate failed");

    assert_eq!(receipt.campaign, campaign);
    assert_eq!(
        donor.ledger.balance(&donor.wallet_address()).await,
        TEST_WALLET_LAMPORTS - MOCK_FEE_LAMPORTS - DEFAULT_TRANSFER_LAMPORTS
    );
    assert_eq!(
        donor.ledger.balance(&campaign).await,
        campaign_balance + DEFAULT_TRANSFER_LAMPORTS
    );

    assert_eq!(donor.client.state().await, SessionState::CampaignsLoaded);
    let cached = donor.client.campaigns().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].address, campaign);
    assert_eq!(cached[0].amount_donated, DEFAULT_TRANSFER_LAMPORTS);
    assert_eq!(cached[0].amount_donated_sol(), 0.2);
}

#[tokio::test]
async fn test_donations_accumulate() {
    let owner = TestFixture::connected().await;
    let donor = owner.another_user().await;
    let campaign = owner.create_test_campaign().await.unwrap().campaign;

    donor.client.donate(&campaign, 150).await.unwrap();
    owner.client.donate(&campaign, 350).await.unwrap();

    let record = owner.ledger.campaign_account(&campaign).await.unwrap();
    assert_eq!(record.amount_donated, 500);

    let fetched = donor
        .client
        .fetch_campaign(&campaign)
        .await
        .unwrap()
        .expect("campaign should exist");
    assert_eq!(fetched.amount_donated, 500);
}

#[tokio::test]
async fn test_donate_without_refresh_when_disabled() {
    let owner = TestFixture::connected().await;
    let donor = TestFixture::on_ledger(
        owner.ledger.clone(),
        ClientConfig {
            refresh_after_donate: false,
            ..Default::default()
        },
    )
    .await;
    donor.client.connect().await.unwrap();
    let campaign = owner.create_test_campaign().await.unwrap().campaign;

    donor.client.donate(&campaign, 1_000).await.unwrap();

    assert!(donor.client.campaigns().await.is_empty());
    assert_eq!(donor.ledger.program_account_queries().await, 0);
}

#[tokio::test]
async fn test_donate_more_than_balance_is_rejected() {
    let owner = TestFixture::connected().await;
    let donor = owner.another_user().await;
    let campaign = owner.create_test_campaign().await.unwrap().campaign;

    let err = donor
        .client
        .donate(&campaign, TEST_WALLET_LAMPORTS)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ProgramRejected(_)), "got {err:?}");
    // Rejected transactions still pay the fee
    assert_eq!(
        donor.ledger.balance(&donor.wallet_address()).await,
        TEST_WALLET_LAMPORTS - MOCK_FEE_LAMPORTS
    );
    let record = owner.ledger.campaign_account(&campaign).await.unwrap();
    assert_eq!(record.amount_donated, 0);
}

#[tokio::test]
async fn test_donate_zero_fails_locally() {
    let owner = TestFixture::connected().await;
    let campaign = owner.create_test_campaign().await.unwrap().campaign;
    let prompts = owner.wallet.sign_requests();

    let err = owner.client.donate(&campaign, 0).await.unwrap_err();

    assert!(matches!(err, ClientError::Encoding(_)), "got {err:?}");
    assert_eq!(owner.wallet.sign_requests(), prompts);
}

#[tokio::test]
async fn test_donate_to_absent_address_fails_locally() {
    let donor = TestFixture::connected().await;

    let err = donor
        .client
        .donate(&Pubkey::default(), 1_000)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Encoding(_)), "got {err:?}");
    assert_eq!(donor.wallet.sign_requests(), 0);
}

/// Program rejects a donation to an address that holds no campaign
#[tokio::test]
async fn test_donate_to_unknown_campaign_is_rejected() {
    let donor = TestFixture::connected().await;

    let err = donor
        .client
        .donate(&Pubkey::new_unique(), 1_000)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ProgramRejected(_)), "got {err:?}");
    assert!(donor.client.campaigns().await.is_empty());
}
