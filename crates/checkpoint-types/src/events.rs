use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Events emitted by the output ledger.  The emitted sequence is an
/// append-only audit log; each event is immutable once emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// The ledger finished its one-time initialization.
    Initialized {
        /// Initializer revision, starts at 1.
        version: u8,
    },

    /// A checkpoint passed every gate and was appended.
    OutputProposed {
        commitment: B256,
        index: u64,
        l2_block_number: u128,
        finalized_at: u128,
    },

    /// A contiguous ledger suffix was truncated.  Carries the ledger length
    /// before and after, i.e. the next output index each way.
    OutputsDeleted {
        prev_next_index: u64,
        new_next_index: u64,
    },
}
