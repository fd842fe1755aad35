//! The output oracle service: serialized ownership of the ledger state and
//! the screening gate, plus the event log consumers subscribe to.

use std::{fmt, sync::Arc};

use alloy_primitives::{Address, B256};
use alloy_rpc_types_engine::ExecutionPayloadV1;
use outpost_checkpoint_types::{CheckpointRecord, LedgerEvent};
use outpost_params::{LedgerParams, Role};
use outpost_screening::{CommitmentScreener, ScreeningGate};
use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{chain::BaseChainView, errors::LedgerError, state::LedgerState};

/// Semver of the ledger surface.
pub const LEDGER_VERSION: &str = "1.4.0";

/// Initializer revision carried by the `Initialized` event.
const INIT_VERSION: u8 = 1;

/// Retained capacity of the event broadcast channel.
const EVENT_CHANNEL_CAP: usize = 256;

/// Everything a proposer submits for one checkpoint.
#[derive(Clone, Debug)]
pub struct CheckpointProposal {
    /// Commitment to the L2 state after `l2_block_number`.
    pub commitment: B256,

    /// Must equal the ledger's next expected block number.
    pub l2_block_number: u64,

    /// Base chain block hash the proposer observed when building the
    /// proposal.  Zero skips the reorg guard.
    pub base_chain_block_hash: B256,

    /// Height the observed hash belongs to.
    pub base_chain_block_number: u64,

    /// The candidate execution payload the screening policy rules on.
    pub payload: ExecutionPayloadV1,
}

/// State that must mutate under one lock: the ledger itself and the gate,
/// since the manager admin can rebind the gate's policy between proposals.
struct Inner {
    ledger: LedgerState,
    gate: ScreeningGate,
}

/// The output oracle: owns the checkpoint ledger and gates every mutation
/// behind the role, ordering, timing and screening checks.
///
/// Writers are serialized per instance by an async mutex held across the
/// nested screening call, so a screening failure unwinds the whole
/// proposal with no partial append.
pub struct OutputOracle {
    inner: Mutex<Inner>,
    chain: Arc<dyn BaseChainView>,
    event_log: RwLock<Vec<LedgerEvent>>,
    event_tx: broadcast::Sender<LedgerEvent>,
}

impl OutputOracle {
    /// Builds an uninitialized oracle.  `manager_admin` is fixed here; the
    /// proposer and challenger slots are assigned by [`Self::initialize`].
    pub fn new(
        params: LedgerParams,
        manager_admin: Address,
        chain: Arc<dyn BaseChainView>,
        screener: Arc<dyn CommitmentScreener>,
    ) -> Result<Self, LedgerError> {
        let ledger = LedgerState::new(params, manager_admin)?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAP);
        Ok(Self {
            inner: Mutex::new(Inner {
                ledger,
                gate: ScreeningGate::new(screener),
            }),
            chain,
            event_log: RwLock::new(Vec::new()),
            event_tx,
        })
    }

    pub fn version(&self) -> &'static str {
        LEDGER_VERSION
    }

    /// One-time genesis setup.  Fails on re-entry and on a starting
    /// timestamp ahead of base chain time.
    pub async fn initialize(
        &self,
        starting_block_number: u64,
        starting_timestamp: u64,
        proposer: Address,
        challenger: Address,
    ) -> Result<(), LedgerError> {
        let now = self.chain.current_timestamp().await?;
        let mut inner = self.inner.lock().await;
        inner.ledger.initialize(
            starting_block_number,
            starting_timestamp,
            proposer,
            challenger,
            now,
        )?;

        // Emitted under the writer lock so event order matches ledger order.
        info!(starting_block_number, starting_timestamp, "ledger initialized");
        self.emit(LedgerEvent::Initialized {
            version: INIT_VERSION,
        });
        Ok(())
    }

    /// Appends a checkpoint, provided the caller holds the proposer role
    /// and the proposal passes the ordering, timing, base-chain and
    /// screening checks.  Returns the new record's index.
    pub async fn propose_checkpoint(
        &self,
        caller: Address,
        proposal: CheckpointProposal,
    ) -> Result<u64, LedgerError> {
        let mut inner = self.inner.lock().await;
        inner.ledger.require_role(Role::Proposer, caller)?;

        let now = self.chain.current_timestamp().await?;
        let finalized_at =
            inner
                .ledger
                .check_proposal(proposal.commitment, proposal.l2_block_number, now)?;

        // Reorg guard: the base chain context the proposer observed has to
        // still be canonical at submission time.
        if !proposal.base_chain_block_hash.is_zero() {
            let actual = self
                .chain
                .block_hash(proposal.base_chain_block_number)
                .await?;
            if actual != Some(proposal.base_chain_block_hash) {
                warn!(
                    number = proposal.base_chain_block_number,
                    "base chain context mismatch, dropping proposal"
                );
                return Err(LedgerError::BaseChainMismatch {
                    number: proposal.base_chain_block_number,
                    expected: proposal.base_chain_block_hash,
                    actual,
                });
            }
        }

        // The gate runs last, while the lock is still held: a failure here
        // unwinds the whole proposal before any write happens.
        inner.gate.check(caller, &proposal.payload).await?;

        let record = CheckpointRecord::new(
            proposal.commitment,
            finalized_at,
            proposal.l2_block_number as u128,
        );
        let index = inner.ledger.append(record);

        info!(
            index,
            l2_block_number = proposal.l2_block_number,
            finalized_at,
            "checkpoint proposed"
        );
        self.emit(LedgerEvent::OutputProposed {
            commitment: proposal.commitment,
            index,
            l2_block_number: proposal.l2_block_number as u128,
            finalized_at,
        });
        Ok(index)
    }

    /// Truncates the ledger from `index` to the end, provided the caller
    /// holds the challenger role and the record is not yet finalized.
    pub async fn delete_from(&self, caller: Address, index: u64) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        inner.ledger.require_role(Role::Challenger, caller)?;

        let now = self.chain.current_timestamp().await?;
        let (prev_next_index, new_next_index) = inner.ledger.truncate_from(index, now)?;

        info!(prev_next_index, new_next_index, "outputs deleted");
        self.emit(LedgerEvent::OutputsDeleted {
            prev_next_index,
            new_next_index,
        });
        Ok(())
    }

    /// Rebinds the screening manager reference.  Manager admin only.
    pub async fn set_screening_manager(
        &self,
        caller: Address,
        screener: Arc<dyn CommitmentScreener>,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().await;
        inner.ledger.require_role(Role::ManagerAdmin, caller)?;
        inner.gate.rebind(screener);
        info!(%caller, "screening manager rebound");
        Ok(())
    }

    /// Read-only passthrough to the gate: the raw policy verdict for
    /// `payload` on behalf of `account`, with no ledger effect.
    pub async fn screen(
        &self,
        account: Address,
        payload: &ExecutionPayloadV1,
    ) -> Result<bool, LedgerError> {
        let gate = self.inner.lock().await.gate.clone();
        Ok(gate.query(account, payload).await?)
    }

    // Read path.  Each query takes the lock briefly and copies out.

    pub async fn params(&self) -> LedgerParams {
        *self.inner.lock().await.ledger.params()
    }

    pub async fn starting_block_number(&self) -> Result<u64, LedgerError> {
        self.inner.lock().await.ledger.starting_block_number()
    }

    pub async fn starting_timestamp(&self) -> Result<u64, LedgerError> {
        self.inner.lock().await.ledger.starting_timestamp()
    }

    pub async fn compute_timestamp(&self, l2_block_number: u64) -> Result<u128, LedgerError> {
        self.inner.lock().await.ledger.compute_timestamp(l2_block_number)
    }

    pub async fn get_by_index(&self, index: u64) -> Result<CheckpointRecord, LedgerError> {
        Ok(*self.inner.lock().await.ledger.get_by_index(index)?)
    }

    pub async fn index_after(&self, l2_block_number: u64) -> Result<u64, LedgerError> {
        self.inner.lock().await.ledger.index_after(l2_block_number)
    }

    pub async fn record_after(
        &self,
        l2_block_number: u64,
    ) -> Result<CheckpointRecord, LedgerError> {
        Ok(*self.inner.lock().await.ledger.record_after(l2_block_number)?)
    }

    pub async fn latest_record(&self) -> Result<CheckpointRecord, LedgerError> {
        Ok(*self.inner.lock().await.ledger.latest_record()?)
    }

    pub async fn latest_index(&self) -> Result<u64, LedgerError> {
        self.inner.lock().await.ledger.latest_index()
    }

    pub async fn latest_block_number(&self) -> Result<u128, LedgerError> {
        self.inner.lock().await.ledger.latest_block_number()
    }

    pub async fn next_block_number(&self) -> Result<u128, LedgerError> {
        self.inner.lock().await.ledger.next_block_number()
    }

    pub async fn next_output_index(&self) -> u64 {
        self.inner.lock().await.ledger.next_output_index()
    }

    /// The full event log emitted so far, in emission order.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.event_log.read().clone()
    }

    /// Live subscription to events emitted after this call.
    pub fn subscribe_events(&self) -> broadcast::Receiver<LedgerEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: LedgerEvent) {
        self.event_log.write().push(event.clone());
        // Nobody listening is fine.
        let _ = self.event_tx.send(event);
    }
}

impl fmt::Debug for OutputOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputOracle").finish_non_exhaustive()
    }
}
