//! View of the base chain the ledger checks proposals against.

use alloy_primitives::B256;
use async_trait::async_trait;
use thiserror::Error;

/// The base chain view itself failed (transport, not a mismatch).
#[derive(Clone, Debug, Error)]
#[error("base chain view failed: {0}")]
pub struct ChainViewError(pub String);

pub type ChainViewResult<T> = Result<T, ChainViewError>;

/// The slice of base chain state the oracle consults: the current clock and
/// recent block hashes.  The host environment provides serializability;
/// this trait only reads.
#[async_trait]
pub trait BaseChainView: Send + Sync {
    /// Current base chain timestamp, seconds.
    async fn current_timestamp(&self) -> ChainViewResult<u64>;

    /// Hash of the base chain block at `number`, `None` once it is out of
    /// the visible window.
    async fn block_hash(&self, number: u64) -> ChainViewResult<Option<B256>>;
}
