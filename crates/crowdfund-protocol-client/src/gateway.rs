/*!
# Ledger Gateway

Network boundary of the client: broadcast and confirm signed transactions,
read account snapshots. [`RpcLedgerGateway`] talks JSON-RPC; tests substitute
an in-memory implementation of [`LedgerGateway`].
*/

use crate::{
    config::LedgerConfig,
    errors::{from_transaction_error, ClientError, ClientResult},
};
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use solana_client::{
    client_error::ClientError as RpcClientError, nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use std::{future::Future, sync::Arc};
use tracing::{debug, info, warn};

#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn latest_blockhash(&self) -> ClientResult<Hash>;

    /// Broadcast a signed transaction and wait for the configured commitment.
    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature>;

    /// Snapshot of every account owned by `program_id`.
    async fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, Vec<u8>)>>;

    /// Account data at `address`, `None` if the account does not exist.
    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>>;
}

/// [`LedgerGateway`] over a Solana JSON-RPC endpoint
pub struct RpcLedgerGateway {
    rpc_client: Arc<RpcClient>,
    config: LedgerConfig,
}

impl RpcLedgerGateway {
    /// Create a gateway for `config.rpc_url` at `config.commitment`
    pub fn new(config: LedgerConfig) -> Self {
        let rpc_client = RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment);
        Self::with_rpc_client(Arc::new(rpc_client), config)
    }

    /// Create a gateway sharing an existing RPC client
    pub fn with_rpc_client(rpc_client: Arc<RpcClient>, config: LedgerConfig) -> Self {
        Self { rpc_client, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the RPC client (for advanced operations)
    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Broadcast with retry on transport failures.
    async fn send_with_retry(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| ClientError::Signing("transaction carries no signature".to_string()))?;
        let send_config = RpcSendTransactionConfig {
            skip_preflight: self.config.skip_preflight,
            preflight_commitment: Some(self.config.commitment.commitment),
            ..Default::default()
        };

        broadcast_with_retry(
            self.config.retry_backoff.clone(),
            self.config.max_send_attempts,
            signature,
            || {
                let rpc_client = self.rpc_client.clone();
                let send_config = send_config.clone();
                async move {
                    rpc_client
                        .send_transaction_with_config(transaction, send_config)
                        .await
                }
            },
        )
        .await
    }

    /// Poll the signature status until it reaches the configured commitment.
    async fn await_confirmation(&self, signature: &Signature) -> ClientResult<()> {
        let commitment = self.config.commitment;
        let poll = async {
            loop {
                match self
                    .rpc_client
                    .get_signature_status_with_commitment(signature, commitment)
                    .await
                {
                    Ok(Some(Ok(()))) => return Ok(()),
                    Ok(Some(Err(tx_err))) => return Err(from_transaction_error(tx_err)),
                    Ok(None) => {}
                    Err(e) => {
                        let err = ClientError::from(e);
                        if !err.is_retryable() {
                            return Err(err);
                        }
                        debug!(%signature, "status poll failed: {}", err);
                    }
                }
                tokio::time::sleep(self.config.confirmation_poll_interval).await;
            }
        };

        tokio::time::timeout(self.config.confirmation_timeout, poll)
            .await
            .map_err(|_| {
                ClientError::Timeout(format!(
                    "{signature} not {:?} after {:?}",
                    commitment.commitment, self.config.confirmation_timeout
                ))
            })?
    }
}

#[async_trait]
impl LedgerGateway for RpcLedgerGateway {
    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let signature = self.send_with_retry(transaction).await?;
        self.await_confirmation(&signature).await?;
        info!(%signature, commitment = ?self.config.commitment.commitment, "transaction confirmed");
        Ok(signature)
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, Vec<u8>)>> {
        let accounts = self.rpc_client.get_program_accounts(program_id).await?;
        debug!(%program_id, count = accounts.len(), "fetched program accounts");
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        // get_account_with_commitment folds transport errors into "AccountNotFound"
        let response = self
            .rpc_client
            .get_multiple_accounts_with_commitment(&[*address], self.config.commitment)
            .await?;
        Ok(response
            .value
            .into_iter()
            .next()
            .flatten()
            .map(|account| account.data))
    }
}

/// Run `send` until it succeeds, fails permanently, or `max_attempts` is spent.
///
/// Resending the same signed transaction is safe: the ledger deduplicates by
/// signature. A resend that reports `AlreadyProcessed` means an earlier attempt
/// landed, so `signature` is returned and confirmation proceeds as normal.
pub(crate) async fn broadcast_with_retry<F, Fut>(
    policy: ExponentialBackoff,
    max_attempts: usize,
    signature: Signature,
    mut send: F,
) -> ClientResult<Signature>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Signature, RpcClientError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0usize;

    retry(policy, || {
        attempt += 1;
        let current_attempt = attempt;
        let sent = send();

        async move {
            match sent.await {
                Ok(signature) => {
                    debug!(%signature, attempt = current_attempt, "transaction broadcast");
                    Ok(signature)
                }
                Err(e)
                    if current_attempt > 1
                        && e.get_transaction_error() == Some(TransactionError::AlreadyProcessed) =>
                {
                    info!(%signature, attempt = current_attempt, "earlier broadcast already landed");
                    Ok(signature)
                }
                Err(e) => {
                    let err = ClientError::from(e);
                    if err.is_retryable() && current_attempt < max_attempts {
                        warn!(
                            attempt = current_attempt,
                            max_attempts, "broadcast failed, retrying: {}", err
                        );
                        Err(backoff::Error::Transient {
                            err,
                            retry_after: None,
                        })
                    } else {
                        Err(backoff::Error::Permanent(err))
                    }
                }
            }
        }
    })
    .await
}
