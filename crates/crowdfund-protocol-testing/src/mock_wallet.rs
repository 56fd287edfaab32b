use async_trait::async_trait;
use crowdfund_protocol_client::{Wallet, WalletError};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Scripted wallet: signs with a local keypair, but can be told to decline.
pub struct MockWallet {
    keypair: Keypair,
    trusted: AtomicBool,
    decline_connect: AtomicBool,
    decline_signing: AtomicBool,
    sign_requests: AtomicUsize,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::with_keypair(Keypair::new())
    }

    pub fn with_keypair(keypair: Keypair) -> Self {
        Self {
            keypair,
            trusted: AtomicBool::new(false),
            decline_connect: AtomicBool::new(false),
            decline_signing: AtomicBool::new(false),
            sign_requests: AtomicUsize::new(0),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Mark the client as previously approved, enabling silent reconnects.
    pub fn set_trusted(&self, trusted: bool) {
        self.trusted.store(trusted, Ordering::SeqCst);
    }

    pub fn set_decline_connect(&self, decline: bool) {
        self.decline_connect.store(decline, Ordering::SeqCst);
    }

    pub fn set_decline_signing(&self, decline: bool) {
        self.decline_signing.store(decline, Ordering::SeqCst);
    }

    /// Number of signing prompts shown so far, declined ones included.
    pub fn sign_requests(&self) -> usize {
        self.sign_requests.load(Ordering::SeqCst)
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn connect(&self, only_if_trusted: bool) -> Result<Pubkey, WalletError> {
        if only_if_trusted && !self.trusted.load(Ordering::SeqCst) {
            return Err(WalletError::Declined("site is not trusted".to_string()));
        }
        if !only_if_trusted && self.decline_connect.load(Ordering::SeqCst) {
            return Err(WalletError::Declined("user rejected the request".to_string()));
        }
        self.trusted.store(true, Ordering::SeqCst);
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        self.sign_requests.fetch_add(1, Ordering::SeqCst);
        if self.decline_signing.load(Ordering::SeqCst) {
            return Err(WalletError::Declined("user rejected the transaction".to_string()));
        }

        let recent_blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}
