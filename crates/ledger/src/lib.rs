//! The output ledger: an append-only, truncatable checkpoint ledger that
//! anchors a rollup's execution history to its base chain, with every
//! mutation gated behind role, ordering, timing and commitment-screening
//! checks.
//!
//! [`state::LedgerState`] is the pure core (records, index algorithms,
//! precondition checks); [`oracle::OutputOracle`] wraps it in a serialized
//! service that consults the host clock, the base chain and the screening
//! policy.

pub mod chain;
pub mod errors;
pub mod oracle;
pub mod state;
pub mod stub;

pub use chain::{BaseChainView, ChainViewError};
pub use errors::LedgerError;
pub use oracle::{CheckpointProposal, OutputOracle, LEDGER_VERSION};
pub use state::LedgerState;
