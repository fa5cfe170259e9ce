use std::error::Error;
use std::fmt::{self, Display};

/// An error returned when a turn cannot be started.
///
/// Failures of the remote call are not errors of this kind; they are
/// reported through [`crate::TurnOutcome::Failed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnError {
    /// Another turn is still waiting for its reply.
    Busy,
}

impl Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Busy => write!(f, "a turn is already in progress"),
        }
    }
}

impl Error for TurnError {}
