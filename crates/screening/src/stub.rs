//! Canned screening policies for tests and local development.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    errors::{ScreeningError, ScreeningResult},
    gate::CommitmentScreener,
};

/// Policy that returns the same verdict for every query.
#[derive(Copy, Clone, Debug)]
pub struct StaticScreener {
    verdict: bool,
}

impl StaticScreener {
    pub fn accepting() -> Self {
        Self { verdict: true }
    }

    pub fn rejecting() -> Self {
        Self { verdict: false }
    }
}

#[async_trait]
impl CommitmentScreener for StaticScreener {
    async fn screen(&self, _account: Address, _target: B256, _value: &[u8]) -> ScreeningResult<bool> {
        Ok(self.verdict)
    }
}

/// Policy that fails every query, for exercising unreachable-policy paths.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnreachableScreener;

#[async_trait]
impl CommitmentScreener for UnreachableScreener {
    async fn screen(&self, _account: Address, _target: B256, _value: &[u8]) -> ScreeningResult<bool> {
        Err(ScreeningError::PolicyUnreachable(
            "stub policy is never reachable".to_owned(),
        ))
    }
}

/// Policy that records every query it sees before replying with a fixed
/// verdict.
#[derive(Debug, Default)]
pub struct RecordingScreener {
    verdict: bool,
    queries: Mutex<Vec<(Address, B256, Vec<u8>)>>,
}

impl RecordingScreener {
    pub fn accepting() -> Self {
        Self {
            verdict: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            verdict: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Everything screened so far, in query order.
    pub fn queries(&self) -> Vec<(Address, B256, Vec<u8>)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl CommitmentScreener for RecordingScreener {
    async fn screen(&self, account: Address, target: B256, value: &[u8]) -> ScreeningResult<bool> {
        self.queries.lock().push((account, target, value.to_vec()));
        Ok(self.verdict)
    }
}
