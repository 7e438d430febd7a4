use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use gaslite::calls::{QueryValue, TokenRead, WriteRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hash of a submitted transaction.
pub type TxHash = B256;

/// Connected account and the chain the wallet is currently on. Owned by the
/// wallet connector; read-only to the workflow.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Address,
    pub chain_id: u64,
}

/// Network acknowledgment that a transaction was included in a block.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    /// `true` when the transaction executed without reverting.
    pub status: bool,
    pub confirmations: u64,
}

/// This enum describes wallet/provider boundary errors. Messages carry the
/// provider-supplied short reason where one exists, with a generic fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{}", .0.as_deref().unwrap_or("user rejected the request"))]
    Rejected(Option<String>),

    #[error("{}", .0.as_deref().unwrap_or("transaction reverted"))]
    Reverted(Option<String>),

    #[error("provider error: {0}")]
    Rpc(String),
}

/// Capability surface the workflow needs from the wallet: session identity,
/// contract writes with receipt subscription, and batched reads. Injected at
/// controller construction; no ambient wallet state is consulted.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Currently connected session, if any.
    fn session(&self) -> Option<WalletSession>;

    /// Dispatches a contract write to the wallet for signing. Resolves with
    /// the transaction hash once the signed transaction is broadcast.
    async fn write(&self, request: WriteRequest) -> Result<TxHash, ProviderError>;

    /// Resolves once the network reports a receipt for `hash`. Timeout and
    /// retry behavior are the provider's own.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ProviderError>;

    /// Executes a batch of read-only queries, returning per-item results.
    async fn read_batch(
        &self,
        reads: Vec<TokenRead>,
    ) -> Result<Vec<Result<QueryValue, ProviderError>>, ProviderError>;
}
