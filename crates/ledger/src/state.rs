//! Pure ledger core: the record sequence, the index algorithms over it and
//! the precondition checks every mutation runs.  No host interaction
//! happens here; the oracle feeds in the clock and drives the screening
//! gate before anything mutates.

use alloy_primitives::{Address, B256};
use outpost_checkpoint_types::CheckpointRecord;
use outpost_params::{LedgerParams, Role, Roles};

use crate::errors::LedgerError;

/// Genesis anchoring, set exactly once by `initialize`.
#[derive(Copy, Clone, Debug)]
struct Genesis {
    starting_block_number: u64,
    starting_timestamp: u64,
    proposer: Address,
    challenger: Address,
}

/// Core ledger state.
///
/// The record sequence is strictly increasing in `l2_block_number` (and so
/// in `finalized_at`, both derive from the same schedule); index 0 covers
/// the first checkpoint after the starting block.
#[derive(Clone, Debug)]
pub struct LedgerState {
    params: LedgerParams,
    manager_admin: Address,
    genesis: Option<Genesis>,
    records: Vec<CheckpointRecord>,
}

impl LedgerState {
    /// Builds an uninitialized ledger over a validated schedule.  The
    /// manager admin is fixed here, the other roles at initialization.
    pub fn new(params: LedgerParams, manager_admin: Address) -> Result<Self, LedgerError> {
        params.check_well_formed()?;
        Ok(Self {
            params,
            manager_admin,
            genesis: None,
            records: Vec::new(),
        })
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.genesis.is_some()
    }

    fn genesis(&self) -> Result<&Genesis, LedgerError> {
        self.genesis.as_ref().ok_or(LedgerError::NotInitialized)
    }

    /// One-time genesis setup.  `now` is the host's current time; a
    /// starting timestamp ahead of it is refused.
    pub fn initialize(
        &mut self,
        starting_block_number: u64,
        starting_timestamp: u64,
        proposer: Address,
        challenger: Address,
        now: u64,
    ) -> Result<(), LedgerError> {
        if self.genesis.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        if starting_timestamp > now {
            return Err(LedgerError::StartingTimestampInFuture {
                starting: starting_timestamp,
                now,
            });
        }
        self.genesis = Some(Genesis {
            starting_block_number,
            starting_timestamp,
            proposer,
            challenger,
        });
        Ok(())
    }

    /// Current role assignment.
    pub fn roles(&self) -> Result<Roles, LedgerError> {
        let g = self.genesis()?;
        Ok(Roles::new(g.proposer, g.challenger, self.manager_admin))
    }

    /// Fails with `AccessDenied` unless `caller` holds `role`.  The
    /// manager admin exists before initialization; the other roles do not.
    pub fn require_role(&self, role: Role, caller: Address) -> Result<(), LedgerError> {
        let holder = match role {
            Role::ManagerAdmin => self.manager_admin,
            Role::Proposer => self.genesis()?.proposer,
            Role::Challenger => self.genesis()?.challenger,
        };
        if holder != caller {
            return Err(LedgerError::AccessDenied { role, caller });
        }
        Ok(())
    }

    pub fn starting_block_number(&self) -> Result<u64, LedgerError> {
        Ok(self.genesis()?.starting_block_number)
    }

    pub fn starting_timestamp(&self) -> Result<u64, LedgerError> {
        Ok(self.genesis()?.starting_timestamp)
    }

    /// Number of checkpoints held, which is also the index the next
    /// proposal will take.
    pub fn next_output_index(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derived timestamp for `l2_block_number`: an affine function of the
    /// block offset past genesis, independent of ledger contents.
    pub fn compute_timestamp(&self, l2_block_number: u64) -> Result<u128, LedgerError> {
        let g = self.genesis()?;
        if l2_block_number < g.starting_block_number {
            return Err(LedgerError::PreGenesisBlock {
                block: l2_block_number as u128,
                starting: g.starting_block_number as u128,
            });
        }
        let offset = (l2_block_number - g.starting_block_number) as u128;
        Ok(g.starting_timestamp as u128 + offset * self.params.l2_block_time as u128)
    }

    /// Highest checkpointed block number.  On an empty ledger this is the
    /// starting block number, the ledger-independent pre-genesis
    /// placeholder, so the read path never fails here.
    pub fn latest_block_number(&self) -> Result<u128, LedgerError> {
        let g = self.genesis()?;
        Ok(self
            .records
            .last()
            .map(|rec| rec.l2_block_number())
            .unwrap_or(g.starting_block_number as u128))
    }

    /// The only block number the next proposal may carry.
    pub fn next_block_number(&self) -> Result<u128, LedgerError> {
        Ok(self.latest_block_number()? + self.params.submission_interval as u128)
    }

    pub fn latest_index(&self) -> Result<u64, LedgerError> {
        if self.records.is_empty() {
            return Err(LedgerError::Empty);
        }
        Ok(self.records.len() as u64 - 1)
    }

    pub fn latest_record(&self) -> Result<&CheckpointRecord, LedgerError> {
        self.records.last().ok_or(LedgerError::Empty)
    }

    pub fn get_by_index(&self, index: u64) -> Result<&CheckpointRecord, LedgerError> {
        self.records
            .get(index as usize)
            .ok_or(LedgerError::NotFound(index))
    }

    /// Lowest index whose record's timestamp is at or after the derived
    /// timestamp of `l2_block_number` (lower-bound convention).  Requires
    /// at least one checkpoint at or past the queried block.
    pub fn index_after(&self, l2_block_number: u64) -> Result<u64, LedgerError> {
        if (l2_block_number as u128) > self.latest_block_number()? {
            return Err(LedgerError::BlockNotCovered(l2_block_number as u128));
        }
        if self.records.is_empty() {
            return Err(LedgerError::Empty);
        }
        let target = self.compute_timestamp(l2_block_number)?;
        // Timestamps are monotonic with index, and the guards above ensure
        // the tail record qualifies, so the lower bound always lands.
        let idx = self
            .records
            .partition_point(|rec| rec.finalized_at() < target);
        Ok(idx as u64)
    }

    /// The record at [`Self::index_after`].
    pub fn record_after(&self, l2_block_number: u64) -> Result<&CheckpointRecord, LedgerError> {
        self.get_by_index(self.index_after(l2_block_number)?)
    }

    /// Runs every ledger-local proposal precondition (ordering, timing,
    /// nonzero commitment) and returns the derived finalization timestamp.
    /// Read-only: the caller screens the payload before appending.
    pub fn check_proposal(
        &self,
        commitment: B256,
        l2_block_number: u64,
        now: u64,
    ) -> Result<u128, LedgerError> {
        let expected = self.next_block_number()?;
        if l2_block_number as u128 != expected {
            return Err(LedgerError::OrderingViolation {
                expected,
                got: l2_block_number as u128,
            });
        }
        let finalized_at = self.compute_timestamp(l2_block_number)?;
        if finalized_at > now as u128 {
            return Err(LedgerError::PrematureProposal {
                l2_block_number: l2_block_number as u128,
                finalized_at,
                now,
            });
        }
        if commitment.is_zero() {
            return Err(LedgerError::EmptyCommitment);
        }
        Ok(finalized_at)
    }

    /// Appends a checked record and returns its index.  Callers must have
    /// run [`Self::check_proposal`] under the same serialization scope.
    pub(crate) fn append(&mut self, record: CheckpointRecord) -> u64 {
        debug_assert!(self
            .records
            .last()
            .map(|last| last.l2_block_number() < record.l2_block_number())
            .unwrap_or(true));
        self.records.push(record);
        self.records.len() as u64 - 1
    }

    /// Removes the record at `index` and everything after it, provided the
    /// record's finalization window has not elapsed at `now`.  Returns the
    /// next-output-index before and after.
    pub(crate) fn truncate_from(&mut self, index: u64, now: u64) -> Result<(u64, u64), LedgerError> {
        let record = *self.get_by_index(index)?;
        if record.is_finalized(now, self.params.finalization_period) {
            return Err(LedgerError::AlreadyFinalized { index });
        }
        let prev_next_index = self.records.len() as u64;
        self.records.truncate(index as usize);
        Ok((prev_next_index, index))
    }
}
