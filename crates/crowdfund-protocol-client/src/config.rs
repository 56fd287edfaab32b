use backoff::ExponentialBackoff;
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Configuration for the RPC-backed ledger gateway
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Commitment used for preflight, queries and confirmation
    pub commitment: CommitmentConfig,

    /// Maximum broadcast attempts per transaction (first try included)
    pub max_send_attempts: usize,

    /// Backoff strategy between broadcast attempts
    pub retry_backoff: ExponentialBackoff,

    /// How long to wait for the commitment level before giving up
    pub confirmation_timeout: Duration,

    /// Delay between signature status polls
    pub confirmation_poll_interval: Duration,

    /// Whether to skip preflight simulation on broadcast
    pub skip_preflight: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::processed(),
            max_send_attempts: 3,
            retry_backoff: ExponentialBackoff {
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(5),
                max_elapsed_time: Some(Duration::from_secs(30)),
                multiplier: 2.0,
                ..Default::default()
            },
            confirmation_timeout: Duration::from_secs(60),
            confirmation_poll_interval: Duration::from_millis(500),
            skip_preflight: false,
        }
    }
}

/// Campaign cache refresh policy after each write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Re-list campaigns after a confirmed create
    pub refresh_after_create: bool,

    /// Re-list campaigns after a confirmed donation
    pub refresh_after_donate: bool,

    /// Re-list campaigns after a confirmed withdrawal
    pub refresh_after_withdraw: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            refresh_after_create: false,
            refresh_after_donate: true,
            refresh_after_withdraw: false,
        }
    }
}
