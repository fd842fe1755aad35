//! Node-side commitment validation.
//!
//! Before a payload received from the network is handed to the derivation
//! pipeline, the node checks that the configured sequencer's commitments
//! are satisfied for it.  One blocking, single-shot screening query per
//! candidate payload; any failure rejects the payload.  Callers wanting a
//! timeout wrap the call with a deadline and treat expiry as rejection.

use alloy_primitives::Address;
use alloy_rpc_types_engine::ExecutionPayloadV1;
use outpost_screening::{ScreeningError, ScreeningGate};
use thiserror::Error;
use tracing::{info, warn};

/// Why a payload was rejected.  The two variants stay distinct so
/// operators can tell a policy "no" from an unreachable policy; both are
/// hard rejections, neither is retried here.
#[derive(Clone, Debug, Error)]
pub enum ValidationError {
    #[error("payload failed commitment screening")]
    ScreeningRejected,

    #[error("screening policy unavailable: {0}")]
    ScreeningUnavailable(String),
}

/// Validates candidate payloads against the sequencer's commitments before
/// they are treated as locally valid.
#[derive(Debug)]
pub struct CommitmentValidator {
    gate: ScreeningGate,
    /// The P2P sequencer identity proposals are screened on behalf of.
    sequencer: Address,
}

impl CommitmentValidator {
    pub fn new(gate: ScreeningGate, sequencer: Address) -> Self {
        Self { gate, sequencer }
    }

    pub fn sequencer(&self) -> Address {
        self.sequencer
    }

    /// Screens `payload` against the sequencer's commitments.  `Ok(())`
    /// admits the payload downstream; every other outcome is a rejection
    /// surfaced to the caller, never swallowed.
    pub async fn validate_commitments(
        &self,
        payload: &ExecutionPayloadV1,
    ) -> Result<(), ValidationError> {
        match self.gate.check(self.sequencer, payload).await {
            Ok(()) => {
                info!(
                    account = %self.sequencer,
                    block_number = payload.block_number,
                    "commitments satisfied for payload"
                );
                Ok(())
            }
            Err(ScreeningError::Rejected) => {
                warn!(
                    account = %self.sequencer,
                    block_number = payload.block_number,
                    "payload rejected by commitment screening"
                );
                Err(ValidationError::ScreeningRejected)
            }
            Err(ScreeningError::PolicyUnreachable(reason)) => {
                warn!(
                    account = %self.sequencer,
                    block_number = payload.block_number,
                    %reason,
                    "screening policy unreachable, rejecting payload"
                );
                Err(ValidationError::ScreeningUnavailable(reason))
            }
        }
    }
}
