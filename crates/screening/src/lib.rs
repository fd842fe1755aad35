//! Commitment screening gate placed in front of checkpoint acceptance.
//!
//! Before a proposal is admitted anywhere (ledger append or node-side
//! payload validation), the candidate execution payload is canonicalized
//! into a single byte string and run past an external policy function as
//! `(account, target, value)`.  The policy's verdict gates the operation;
//! the policy logic itself is opaque to this crate.

pub mod client;
pub mod encode;
pub mod errors;
pub mod gate;
pub mod stub;

pub use encode::encode_payload;
pub use errors::{ScreeningError, ScreeningResult};
pub use gate::{CommitmentScreener, ScreeningGate, SCREENING_TARGET_V1};
