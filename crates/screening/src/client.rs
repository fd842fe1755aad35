//! Screening policy backed by the base chain's system config contract.

use std::fmt;

use alloy::{providers::Provider, sol};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use tracing::trace;

use crate::{
    errors::{ScreeningError, ScreeningResult},
    gate::CommitmentScreener,
};

sol! {
    #[sol(rpc)]
    interface ISystemConfig {
        function screen(address account, bytes32 target, bytes value) external view returns (bool satisfied);
    }
}

/// Policy function living in the system config contract on the base chain.
/// Every query is a read-only `eth_call`; a transport or revert failure is
/// surfaced as [`ScreeningError::PolicyUnreachable`], never as a verdict.
pub struct SystemConfigScreener<P> {
    contract: ISystemConfig::ISystemConfigInstance<P>,
}

impl<P: Provider> SystemConfigScreener<P> {
    /// Binds the screener to the system config deployed at `address`.
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: ISystemConfig::new(address, provider),
        }
    }

    /// The contract address queried.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl<P: Provider + 'static> CommitmentScreener for SystemConfigScreener<P> {
    async fn screen(&self, account: Address, target: B256, value: &[u8]) -> ScreeningResult<bool> {
        trace!(%account, %target, value_len = value.len(), "querying screening policy");
        let satisfied = self
            .contract
            .screen(account, target, value.to_vec().into())
            .call()
            .await
            .map_err(|err| ScreeningError::PolicyUnreachable(err.to_string()))?;
        Ok(satisfied)
    }
}

impl<P: Provider> fmt::Debug for SystemConfigScreener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemConfigScreener")
            .field("address", self.contract.address())
            .finish_non_exhaustive()
    }
}
