//! Canonical encoding of a candidate execution payload for screening.
//!
//! The policy function receives the full payload as one ABI-encoded tuple.
//! The layout is versioned: field order and representation are part of the
//! protocol and must not change within a target namespace.

use alloy_primitives::{Bytes, B256};
use alloy_rpc_types_engine::ExecutionPayloadV1;
use alloy_sol_types::{sol, SolValue};

sol! {
    /// V1 tuple layout the screening policy receives.
    struct CanonicalPayloadV1 {
        bytes32 parentHash;
        address feeRecipient;
        bytes32 stateRoot;
        bytes32 receiptsRoot;
        bytes logsBloom;
        bytes32 prevRandao;
        uint64 blockNumber;
        uint64 gasLimit;
        uint64 gasUsed;
        uint64 timestamp;
        bytes extraData;
        bytes32 baseFeePerGas;
        bytes32 blockHash;
        bytes transactions;
    }
}

/// ABI-encodes `payload` into the canonical byte string passed to the
/// policy as the screening value.  Deterministic: two calls on the same
/// payload always agree.
pub fn encode_payload(payload: &ExecutionPayloadV1) -> Vec<u8> {
    let canonical = CanonicalPayloadV1 {
        parentHash: payload.parent_hash,
        feeRecipient: payload.fee_recipient,
        stateRoot: payload.state_root,
        receiptsRoot: payload.receipts_root,
        // The bloom travels as its hex string form, not its raw bits.
        logsBloom: payload.logs_bloom.to_string().into_bytes().into(),
        prevRandao: payload.prev_randao,
        blockNumber: payload.block_number,
        gasLimit: payload.gas_limit,
        gasUsed: payload.gas_used,
        timestamp: payload.timestamp,
        extraData: payload.extra_data.clone(),
        baseFeePerGas: B256::from(payload.base_fee_per_gas),
        blockHash: payload.block_hash,
        transactions: concat_transactions(&payload.transactions),
    };
    canonical.abi_encode()
}

/// Flattens the raw transaction byte strings into one contiguous value.
fn concat_transactions(txs: &[Bytes]) -> Bytes {
    let mut out = Vec::with_capacity(txs.iter().map(|tx| tx.len()).sum());
    for tx in txs {
        out.extend_from_slice(tx);
    }
    out.into()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use outpost_test_utils::test_payload;

    use super::*;

    #[test]
    fn test_encoding_deterministic() {
        let payload = test_payload(110);
        assert_eq!(encode_payload(&payload), encode_payload(&payload));
    }

    #[test]
    fn test_encoding_senses_every_field() {
        let base = test_payload(110);
        let encoded = encode_payload(&base);

        let mut changed = base.clone();
        changed.gas_used += 1;
        assert_ne!(encode_payload(&changed), encoded);

        let mut changed = base.clone();
        changed.base_fee_per_gas = U256::from(8u64);
        assert_ne!(encode_payload(&changed), encoded);

        let mut changed = base.clone();
        changed.transactions.push(Bytes::from_static(&[0xff]));
        assert_ne!(encode_payload(&changed), encoded);
    }

    #[test]
    fn test_tuple_head_offset() {
        // The tuple is dynamic (it contains bytes fields), so the encoding
        // starts with the standard 0x20 head offset.
        let encoded = encode_payload(&test_payload(110));
        let mut head = [0u8; 32];
        head[31] = 0x20;
        assert_eq!(&encoded[..32], &head);
    }

    #[test]
    fn test_bloom_hex_string_form() {
        // 0x-prefixed hex of a 256-byte bloom: 514 ASCII bytes, padded to a
        // word boundary inside the encoding.
        let payload = test_payload(110);
        let encoded = encode_payload(&payload);
        let bloom_ascii = payload.logs_bloom.to_string().into_bytes();
        assert_eq!(bloom_ascii.len(), 514);
        assert!(encoded
            .windows(bloom_ascii.len())
            .any(|window| window == bloom_ascii.as_slice()));
    }

    #[test]
    fn test_transactions_concatenated_raw() {
        let mut payload = test_payload(110);
        payload.transactions = vec![
            Bytes::from_static(&[0xde, 0xad]),
            Bytes::from_static(&[0xbe, 0xef]),
        ];
        let encoded = encode_payload(&payload);
        let joined = [0xde, 0xad, 0xbe, 0xef];
        assert!(encoded.windows(joined.len()).any(|w| w == joined));
    }
}
