use alloy_primitives::B256;
use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

/// A single checkpoint appended to the output ledger.
///
/// Binds an L2 state commitment to the L2 block number it covers and the
/// timestamp its finalization window is measured from.  Immutable once
/// appended; removable only by truncating a ledger suffix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Arbitrary, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Commitment to the L2 state after the checkpointed block.
    commitment: B256,

    /// Timestamp the finalization window counts from.  Always derived from
    /// the ledger schedule, never supplied by the proposer.
    finalized_at: u128,

    /// The L2 block number this checkpoint covers.
    l2_block_number: u128,
}

impl CheckpointRecord {
    pub fn new(commitment: B256, finalized_at: u128, l2_block_number: u128) -> Self {
        Self {
            commitment,
            finalized_at,
            l2_block_number,
        }
    }

    pub fn commitment(&self) -> &B256 {
        &self.commitment
    }

    pub fn finalized_at(&self) -> u128 {
        self.finalized_at
    }

    pub fn l2_block_number(&self) -> u128 {
        self.l2_block_number
    }

    /// Whether the record's finalization window has elapsed at `now`, making
    /// it immutable.
    pub fn is_finalized(&self, now: u64, finalization_period: u64) -> bool {
        self.finalized_at + finalization_period as u128 <= now as u128
    }
}
