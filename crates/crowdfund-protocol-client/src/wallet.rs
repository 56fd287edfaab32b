use crate::errors::WalletError;
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};

/// Key custody boundary. The client never sees private keys, only this
/// capability.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ask for the wallet's identity.
    ///
    /// With `only_if_trusted` the wallet answers silently if the site was
    /// approved before and declines otherwise.
    async fn connect(&self, only_if_trusted: bool) -> Result<Pubkey, WalletError>;

    /// Sign `transaction` with the connected identity. May suspend on user approval.
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;
}

/// Wallet backed by a local keypair, for headless use.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    async fn connect(&self, _only_if_trusted: bool) -> Result<Pubkey, WalletError> {
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}
