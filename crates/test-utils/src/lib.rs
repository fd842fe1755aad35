//! Deterministic fixtures for exercising the checkpoint ledger and the
//! screening gate in tests.

use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
use alloy_rpc_types_engine::ExecutionPayloadV1;
use outpost_params::{LedgerParams, Roles};

/// The schedule most tests run with: checkpoints every 10 L2 blocks, 2s
/// block time, one hour finalization window.
pub fn test_params() -> LedgerParams {
    LedgerParams {
        submission_interval: 10,
        l2_block_time: 2,
        finalization_period: 3600,
    }
}

/// A fully distinct role assignment.
pub fn test_roles() -> Roles {
    Roles::new(proposer(), challenger(), manager_admin())
}

pub fn proposer() -> Address {
    Address::repeat_byte(0xb1)
}

pub fn challenger() -> Address {
    Address::repeat_byte(0xc2)
}

pub fn manager_admin() -> Address {
    Address::repeat_byte(0xa3)
}

/// An identity holding no role at all.
pub fn rando() -> Address {
    Address::repeat_byte(0xee)
}

/// A nonzero 32-byte digest derived from `tag`.
pub fn digest(tag: u8) -> B256 {
    B256::repeat_byte(tag)
}

/// A well-formed candidate execution payload for `block_number`, with every
/// field deterministic so encodings are stable across runs.
pub fn test_payload(block_number: u64) -> ExecutionPayloadV1 {
    let tag = (block_number % 0xff) as u8;
    ExecutionPayloadV1 {
        parent_hash: B256::repeat_byte(tag),
        fee_recipient: Address::repeat_byte(0x11),
        state_root: B256::repeat_byte(tag.wrapping_add(1)),
        receipts_root: B256::repeat_byte(tag.wrapping_add(2)),
        logs_bloom: Bloom::repeat_byte(0x00),
        prev_randao: B256::repeat_byte(tag.wrapping_add(3)),
        block_number,
        gas_limit: 30_000_000,
        gas_used: 21_000,
        timestamp: 1_700_000_000 + block_number * 2,
        extra_data: Bytes::from_static(b"outpost-test"),
        base_fee_per_gas: U256::from(7u64),
        block_hash: B256::repeat_byte(tag.wrapping_add(4)),
        transactions: vec![
            Bytes::from_static(&[0x02, 0x01, 0x02]),
            Bytes::from_static(&[0x02, 0x03]),
        ],
    }
}
