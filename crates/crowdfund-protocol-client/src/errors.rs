use crowdfund_protocol_sdk::SdkError;
use solana_client::{
    client_error::{ClientError as RpcClientError, ClientErrorKind},
    rpc_request::RpcError,
};
use solana_sdk::{signature::Signature, transaction::TransactionError};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("No wallet available")]
    WalletUnavailable,

    #[error("User declined: {0}")]
    UserDeclined(String),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Address derivation exhausted for program {0}")]
    DerivationExhausted(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Program rejected transaction: {0}")]
    ProgramRejected(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Unexpected ledger response: {0}")]
    Protocol(String),

    #[error("Transaction {signature} confirmed but campaign refresh failed: {source}")]
    RefreshFailed {
        signature: Signature,
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<SdkError> for ClientError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::DerivationExhausted { program_id } => {
                Self::DerivationExhausted(program_id.to_string())
            }
            SdkError::Encoding(msg) => Self::Encoding(msg),
            SdkError::Decoding(msg) => Self::Decoding(msg),
            err @ SdkError::MissingAccount(_) => Self::Encoding(err.to_string()),
        }
    }
}

/// Errors raised by a [`Wallet`](crate::Wallet) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No wallet available")]
    Unavailable,

    #[error("Request declined: {0}")]
    Declined(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

impl From<WalletError> for ClientError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Unavailable => Self::WalletUnavailable,
            WalletError::Declined(msg) => Self::UserDeclined(msg),
            WalletError::Signing(msg) => Self::Signing(msg),
        }
    }
}

impl From<RpcClientError> for ClientError {
    fn from(err: RpcClientError) -> Self {
        if let Some(tx_err) = err.get_transaction_error() {
            return from_transaction_error(tx_err);
        }

        match err.kind() {
            ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => Self::Network(err.to_string()),
            ClientErrorKind::RpcError(RpcError::RpcRequestError(_)) => {
                Self::Network(err.to_string())
            }
            ClientErrorKind::SigningError(_) => Self::Signing(err.to_string()),
            _ => Self::Protocol(err.to_string()),
        }
    }
}

/// A stale blockhash is a transport-level outcome; everything else is the
/// ledger or program refusing the transaction.
pub(crate) fn from_transaction_error(err: TransactionError) -> ClientError {
    match err {
        TransactionError::BlockhashNotFound => {
            ClientError::Network(format!("transaction expired: {err}"))
        }
        other => ClientError::ProgramRejected(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{instruction::InstructionError, pubkey::Pubkey};

    #[test]
    fn test_io_errors_are_network_errors() {
        let err = RpcClientError::from(ClientErrorKind::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        let err = ClientError::from(err);
        assert!(matches!(err, ClientError::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_transaction_errors_are_program_rejections() {
        let err = RpcClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InstructionError(0, InstructionError::Custom(6000)),
        ));
        let err = ClientError::from(err);
        assert!(matches!(err, ClientError::ProgramRejected(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_expired_blockhash_is_network_error() {
        let err = from_transaction_error(TransactionError::BlockhashNotFound);
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[test]
    fn test_unexpected_responses_are_protocol_errors() {
        let err = RpcClientError::from(ClientErrorKind::Custom("garbled".to_string()));
        assert!(matches!(ClientError::from(err), ClientError::Protocol(_)));
    }

    #[test]
    fn test_sdk_errors_keep_their_kind() {
        let program_id = Pubkey::new_unique();
        assert_eq!(
            ClientError::from(SdkError::DerivationExhausted { program_id }),
            ClientError::DerivationExhausted(program_id.to_string())
        );
        assert!(matches!(
            ClientError::from(SdkError::MissingAccount("user")),
            ClientError::Encoding(_)
        ));
        assert!(matches!(
            ClientError::from(SdkError::Decoding("short".to_string())),
            ClientError::Decoding(_)
        ));
    }

    #[test]
    fn test_wallet_errors_map_to_distinct_kinds() {
        assert_eq!(
            ClientError::from(WalletError::Unavailable),
            ClientError::WalletUnavailable
        );
        assert!(matches!(
            ClientError::from(WalletError::Declined("no".to_string())),
            ClientError::UserDeclined(_)
        ));
    }
}
