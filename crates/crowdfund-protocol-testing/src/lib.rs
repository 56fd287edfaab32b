//! Test harness for the crowdfund client: an in-memory ledger that enforces
//! the program's rules, a scriptable wallet and a ready-made fixture.

mod mock_ledger;
mod mock_wallet;
mod test_fixture;

pub use mock_ledger::{InjectedFailure, MockAccount, MockLedger, MOCK_FEE_LAMPORTS};
pub use mock_wallet::MockWallet;
pub use test_fixture::{
    TestFixture, TEST_CAMPAIGN_DESCRIPTION, TEST_CAMPAIGN_NAME, TEST_WALLET_LAMPORTS,
};
