use thiserror::Error;

/// Failures surfaced by the screening gate.
///
/// The two variants stay distinct all the way up so operators can tell
/// "policy said no" apart from "policy unreachable".
#[derive(Clone, Debug, Error)]
pub enum ScreeningError {
    /// The policy evaluated the commitment and rejected it.
    #[error("screening policy rejected the commitment")]
    Rejected,

    /// The policy function itself failed or could not be reached.  A hard
    /// failure, never folded into a rejection.
    #[error("screening policy unreachable: {0}")]
    PolicyUnreachable(String),
}

pub type ScreeningResult<T> = Result<T, ScreeningError>;
