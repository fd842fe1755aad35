//! Configuration for the checkpoint ledger: the fixed submission schedule
//! and the privileged role identities.

use alloy_primitives::Address;
use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating ledger parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("submission interval must be greater than 0")]
    ZeroSubmissionInterval,

    #[error("L2 block time must be greater than 0")]
    ZeroBlockTime,
}

/// Fixed ledger schedule.  Set when the oracle is constructed and immutable
/// afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Arbitrary, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Step, in L2 block numbers, between consecutive permitted checkpoints.
    pub submission_interval: u64,

    /// Seconds between consecutive L2 blocks.
    pub l2_block_time: u64,

    /// Seconds a checkpoint must stand unchallenged before it becomes
    /// immutable.
    pub finalization_period: u64,
}

impl LedgerParams {
    /// Checks the constraints the oracle requires of its schedule.
    pub fn check_well_formed(&self) -> Result<(), ParamsError> {
        if self.submission_interval == 0 {
            return Err(ParamsError::ZeroSubmissionInterval);
        }
        if self.l2_block_time == 0 {
            return Err(ParamsError::ZeroBlockTime);
        }
        Ok(())
    }
}

/// Roles with authority over ledger mutation.  Each mutating operation
/// requires exactly one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Arbitrary, Serialize, Deserialize)]
pub enum Role {
    /// May append new checkpoints.
    Proposer,

    /// May truncate not-yet-finalized ledger suffixes.
    Challenger,

    /// May rebind the screening manager reference.
    ManagerAdmin,
}

/// The identities currently holding each role.  Single slot per role; the
/// proposer and challenger slots are fixed at initialization, the manager
/// admin at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Arbitrary, Serialize, Deserialize)]
pub struct Roles {
    pub proposer: Address,
    pub challenger: Address,
    pub manager_admin: Address,
}

impl Roles {
    pub fn new(proposer: Address, challenger: Address, manager_admin: Address) -> Self {
        Self {
            proposer,
            challenger,
            manager_admin,
        }
    }

    /// The identity currently holding `role`.
    pub fn holder(&self, role: Role) -> Address {
        match role {
            Role::Proposer => self.proposer,
            Role::Challenger => self.challenger,
            Role::ManagerAdmin => self.manager_admin,
        }
    }

    /// Whether `caller` holds `role`.
    pub fn is_held_by(&self, role: Role, caller: Address) -> bool {
        self.holder(role) == caller
    }
}
