use alloy_primitives::{Address, B256};
use outpost_params::{ParamsError, Role};
use outpost_screening::ScreeningError;
use thiserror::Error;

use crate::chain::ChainViewError;

/// Errors surfaced by ledger operations.
///
/// Mutation failures are always atomic rollbacks: no partial ledger state
/// is observable after any of these.
#[derive(Clone, Debug, Error)]
pub enum LedgerError {
    /// Caller does not hold the single role the operation requires.  Fatal
    /// to the call, never retried.
    #[error("caller {caller} does not hold the {role:?} role")]
    AccessDenied { role: Role, caller: Address },

    #[error("ledger is already initialized")]
    AlreadyInitialized,

    #[error("ledger is not initialized")]
    NotInitialized,

    #[error("starting timestamp {starting} is ahead of current time {now}")]
    StartingTimestampInFuture { starting: u64, now: u64 },

    /// Proposal out of order: the block number must equal the next expected
    /// one.  Caller-fixable.
    #[error("proposed block {got} does not match next expected block {expected}")]
    OrderingViolation { expected: u128, got: u128 },

    /// The proposal's derived timestamp is still in the future.
    #[error("checkpoint for block {l2_block_number} matures at {finalized_at}, current time is {now}")]
    PrematureProposal {
        l2_block_number: u128,
        finalized_at: u128,
        now: u64,
    },

    #[error("checkpoint commitment cannot be the zero hash")]
    EmptyCommitment,

    /// Queried or proposed a block below the ledger's genesis block.
    #[error("block {block} predates the ledger's starting block {starting}")]
    PreGenesisBlock { block: u128, starting: u128 },

    /// The base chain context the proposer observed no longer matches,
    /// most likely a reorg between observation and submission.
    #[error("base chain block {number} hash mismatch: expected {expected}, found {actual:?}")]
    BaseChainMismatch {
        number: u64,
        expected: B256,
        actual: Option<B256>,
    },

    /// Attempted mutation of a record whose finalization window elapsed.
    /// Fatal, never retried.
    #[error("checkpoint at index {index} is already finalized")]
    AlreadyFinalized { index: u64 },

    /// No checkpoint at the queried index.
    #[error("no checkpoint at index {0}")]
    NotFound(u64),

    /// No checkpoint at or after the queried block number yet.
    #[error("no checkpoint covers block {0} yet")]
    BlockNotCovered(u128),

    /// The ledger holds no checkpoints at all.
    #[error("ledger is empty")]
    Empty,

    /// The screening gate refused the proposal, either by verdict or
    /// because the policy was unreachable.  The source keeps the two
    /// apart.
    #[error("screening gate refused the proposal")]
    Screening(#[from] ScreeningError),

    #[error(transparent)]
    ChainView(#[from] ChainViewError),

    #[error(transparent)]
    Params(#[from] ParamsError),
}

impl LedgerError {
    /// Whether this is a query miss rather than a rejected mutation.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::BlockNotCovered(_) | Self::Empty
        )
    }
}
