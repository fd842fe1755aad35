//! End-to-end exercises of the output oracle: the propose/delete flows,
//! the read path and the screening gate-keeping.

use std::sync::Arc;

use alloy_rpc_types_engine as _;
use async_trait as _;
use outpost_params as _;
use parking_lot as _;
use proptest as _;
use thiserror as _;
use tracing as _;

use alloy_primitives::B256;
use outpost_checkpoint_types::LedgerEvent;
use outpost_ledger::{stub::StaticChainView, CheckpointProposal, LedgerError, OutputOracle};
use outpost_screening::{
    stub::{StaticScreener, UnreachableScreener},
    CommitmentScreener, ScreeningError,
};
use outpost_test_utils::{
    challenger, digest, manager_admin, proposer, rando, test_params, test_payload,
};

const START_BLOCK: u64 = 100;
const START_TS: u64 = 1000;

fn oracle_with(
    chain: Arc<StaticChainView>,
    screener: Arc<dyn CommitmentScreener>,
) -> OutputOracle {
    OutputOracle::new(test_params(), manager_admin(), chain, screener).unwrap()
}

async fn initialized_oracle(now: u64) -> (OutputOracle, Arc<StaticChainView>) {
    let chain = Arc::new(StaticChainView::at(now));
    let oracle = oracle_with(chain.clone(), Arc::new(StaticScreener::accepting()));
    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();
    (oracle, chain)
}

fn proposal_for(l2_block_number: u64) -> CheckpointProposal {
    CheckpointProposal {
        commitment: digest(0x42),
        l2_block_number,
        base_chain_block_hash: B256::ZERO,
        base_chain_block_number: 0,
        payload: test_payload(l2_block_number),
    }
}

#[tokio::test]
async fn test_propose_first_checkpoint() {
    // Scenario: start=100/ts=1000, block time 2, interval 10; proposing
    // block 110 lands at index 0 with finalized_at 1020.
    let (oracle, _) = initialized_oracle(2000).await;

    let index = oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(oracle.next_output_index().await, 1);

    let record = oracle.get_by_index(0).await.unwrap();
    assert_eq!(record.l2_block_number(), 110);
    assert_eq!(record.finalized_at(), 1020);
    assert_eq!(*record.commitment(), digest(0x42));
}

#[tokio::test]
async fn test_out_of_order_proposal_rejected() {
    let (oracle, _) = initialized_oracle(2000).await;
    let err = oracle
        .propose_checkpoint(proposer(), proposal_for(115))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::OrderingViolation {
            expected: 110,
            got: 115
        }
    ));
    assert_eq!(oracle.next_output_index().await, 0);
}

#[tokio::test]
async fn test_delete_refused_after_finalization() {
    let (oracle, chain) = initialized_oracle(2000).await;
    oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap();

    // finalized_at 1020 plus the hour-long window, one second past.
    chain.set_timestamp(1020 + 3601);
    let err = oracle.delete_from(challenger(), 0).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyFinalized { index: 0 }));
    assert_eq!(oracle.next_output_index().await, 1);
}

#[tokio::test]
async fn test_delete_truncates_suffix() {
    // Late enough to propose through block 130, early enough that nothing
    // is finalized yet.
    let (oracle, _) = initialized_oracle(2000).await;
    for block in [110, 120, 130] {
        oracle
            .propose_checkpoint(proposer(), proposal_for(block))
            .await
            .unwrap();
    }

    oracle.delete_from(challenger(), 1).await.unwrap();
    assert_eq!(oracle.next_output_index().await, 1);
    assert_eq!(oracle.latest_block_number().await.unwrap(), 110);
    assert!(oracle.get_by_index(1).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_get_after_returns_first_covering_record() {
    let (oracle, _) = initialized_oracle(5000).await;
    for block in [110, 120, 130] {
        oracle
            .propose_checkpoint(proposer(), proposal_for(block))
            .await
            .unwrap();
    }

    let record = oracle.record_after(105).await.unwrap();
    assert_eq!(record.l2_block_number(), 110);
    assert_eq!(oracle.index_after(125).await.unwrap(), 2);
    assert!(oracle
        .record_after(131)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_rejecting_policy_blocks_append() {
    let chain = Arc::new(StaticChainView::at(2000));
    let oracle = oracle_with(chain, Arc::new(StaticScreener::rejecting()));
    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();

    let before = oracle.events().len();
    let err = oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Screening(ScreeningError::Rejected)
    ));

    // No record, no OutputProposed event.
    assert_eq!(oracle.next_output_index().await, 0);
    assert_eq!(oracle.events().len(), before);
}

#[tokio::test]
async fn test_unreachable_policy_distinct_from_rejection() {
    let chain = Arc::new(StaticChainView::at(2000));
    let oracle = oracle_with(chain, Arc::new(UnreachableScreener));
    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();

    let err = oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Screening(ScreeningError::PolicyUnreachable(_))
    ));
    assert_eq!(oracle.next_output_index().await, 0);
}

#[tokio::test]
async fn test_manager_admin_rebinds_policy() {
    let chain = Arc::new(StaticChainView::at(2000));
    let oracle = oracle_with(chain, Arc::new(StaticScreener::rejecting()));
    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();

    // Only the manager admin may rebind.
    let err = oracle
        .set_screening_manager(rando(), Arc::new(StaticScreener::accepting()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccessDenied { .. }));

    oracle
        .set_screening_manager(manager_admin(), Arc::new(StaticScreener::accepting()))
        .await
        .unwrap();
    oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_role_gating() {
    let (oracle, _) = initialized_oracle(2000).await;

    let err = oracle
        .propose_checkpoint(rando(), proposal_for(110))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccessDenied { .. }));

    oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap();
    let err = oracle.delete_from(proposer(), 0).await.unwrap_err();
    assert!(matches!(err, LedgerError::AccessDenied { .. }));
}

#[tokio::test]
async fn test_premature_proposal_rejected() {
    // Block 110 matures at 1020; the clock still reads 1010.
    let (oracle, _) = initialized_oracle(1010).await;
    let err = oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::PrematureProposal { .. }));
}

#[tokio::test]
async fn test_reorg_guard() {
    let (oracle, chain) = initialized_oracle(2000).await;
    chain.insert_block_hash(7, digest(0x07));

    // Observed hash no longer canonical.
    let mut proposal = proposal_for(110);
    proposal.base_chain_block_hash = digest(0x08);
    proposal.base_chain_block_number = 7;
    let err = oracle
        .propose_checkpoint(proposer(), proposal)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BaseChainMismatch { .. }));

    // Matching hash passes the guard.
    let mut proposal = proposal_for(110);
    proposal.base_chain_block_hash = digest(0x07);
    proposal.base_chain_block_number = 7;
    oracle.propose_checkpoint(proposer(), proposal).await.unwrap();
}

#[tokio::test]
async fn test_initialize_once_and_not_in_future() {
    let chain = Arc::new(StaticChainView::at(500));
    let oracle = oracle_with(chain.clone(), Arc::new(StaticScreener::accepting()));

    // Starting timestamp ahead of base chain time.
    let err = oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StartingTimestampInFuture { .. }));

    chain.set_timestamp(1500);
    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();
    let err = oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyInitialized));
}

#[tokio::test]
async fn test_event_log_and_subscription() {
    let chain = Arc::new(StaticChainView::at(2000));
    let oracle = oracle_with(chain, Arc::new(StaticScreener::accepting()));
    let mut rx = oracle.subscribe_events();

    oracle
        .initialize(START_BLOCK, START_TS, proposer(), challenger())
        .await
        .unwrap();
    oracle
        .propose_checkpoint(proposer(), proposal_for(110))
        .await
        .unwrap();
    oracle.delete_from(challenger(), 0).await.unwrap();

    let log = oracle.events();
    assert_eq!(log.len(), 3);
    assert!(matches!(log[0], LedgerEvent::Initialized { version: 1 }));
    assert!(matches!(
        log[1],
        LedgerEvent::OutputProposed {
            index: 0,
            l2_block_number: 110,
            finalized_at: 1020,
            ..
        }
    ));
    assert!(matches!(
        log[2],
        LedgerEvent::OutputsDeleted {
            prev_next_index: 1,
            new_next_index: 0
        }
    ));

    // The live subscription saw the same sequence.
    for expected in &log {
        assert_eq!(rx.recv().await.unwrap(), *expected);
    }
}

#[tokio::test]
async fn test_empty_ledger_read_paths() {
    let (oracle, _) = initialized_oracle(2000).await;

    // Non-failing placeholder: the starting block number.
    assert_eq!(
        oracle.latest_block_number().await.unwrap(),
        START_BLOCK as u128
    );
    assert_eq!(oracle.next_block_number().await.unwrap(), 110);
    assert!(oracle.latest_record().await.unwrap_err().is_not_found());
    assert!(oracle.latest_index().await.unwrap_err().is_not_found());
    assert!(oracle.index_after(100).await.unwrap_err().is_not_found());
    assert_eq!(oracle.version(), "1.4.0");
}
