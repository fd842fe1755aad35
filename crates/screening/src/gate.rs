//! The screening gate and the policy trait it consults.

use std::{fmt, sync::Arc};

use alloy_primitives::{Address, B256};
use alloy_rpc_types_engine::ExecutionPayloadV1;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    encode::encode_payload,
    errors::{ScreeningError, ScreeningResult},
};

/// Protocol-fixed policy namespace the gate screens proposals under.  Not
/// derived from payload contents; v1 reserves the zero namespace.
pub const SCREENING_TARGET_V1: B256 = B256::ZERO;

/// External policy decision point, keyed by `(account, target, value)`.
///
/// The gate only consults implementations, it does not own their
/// lifecycle.  An `Err` means the policy could not be evaluated at all and
/// must be kept distinct from an explicit `Ok(false)`.
#[async_trait]
pub trait CommitmentScreener: Send + Sync {
    /// Asks the policy whether `account` may commit `value` under `target`.
    async fn screen(&self, account: Address, target: B256, value: &[u8]) -> ScreeningResult<bool>;
}

/// Gate placed in front of a mutating or validating operation:
/// canonicalizes the candidate payload and runs it past the screening
/// policy.  The single suspension point in the proposal flow.
#[derive(Clone)]
pub struct ScreeningGate {
    screener: Arc<dyn CommitmentScreener>,
    target: B256,
}

impl ScreeningGate {
    /// Builds a gate over `screener` using the v1 target namespace.
    pub fn new(screener: Arc<dyn CommitmentScreener>) -> Self {
        Self::with_target(screener, SCREENING_TARGET_V1)
    }

    /// Builds a gate screening under an explicit target namespace.
    pub fn with_target(screener: Arc<dyn CommitmentScreener>, target: B256) -> Self {
        Self { screener, target }
    }

    pub fn target(&self) -> B256 {
        self.target
    }

    /// Swaps the policy reference.  Takes effect for the next query; the
    /// gate never retries an in-flight one.
    pub fn rebind(&mut self, screener: Arc<dyn CommitmentScreener>) {
        self.screener = screener;
    }

    /// Queries the raw policy verdict for `payload` on behalf of `account`.
    pub async fn query(
        &self,
        account: Address,
        payload: &ExecutionPayloadV1,
    ) -> ScreeningResult<bool> {
        let value = encode_payload(payload);
        self.screener.screen(account, self.target, &value).await
    }

    /// Screens `payload` on behalf of `account`.  Returns `Ok(())` only
    /// when the policy explicitly accepts; a `false` verdict becomes
    /// [`ScreeningError::Rejected`] and policy failures pass through.
    pub async fn check(&self, account: Address, payload: &ExecutionPayloadV1) -> ScreeningResult<()> {
        match self.query(account, payload).await {
            Ok(true) => {
                debug!(%account, block_number = payload.block_number, "commitments satisfied");
                Ok(())
            }
            Ok(false) => {
                warn!(%account, block_number = payload.block_number, "commitments not satisfied");
                Err(ScreeningError::Rejected)
            }
            Err(err) => {
                warn!(%account, block_number = payload.block_number, %err, "screening policy failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for ScreeningGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreeningGate")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
