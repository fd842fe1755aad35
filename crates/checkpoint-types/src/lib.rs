//! Checkpoint ledger types for the Outpost output oracle.

mod events;
mod record;

pub use events::*;
pub use record::*;
