use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not reach the endpoint, or the connection broke
    /// before a response was received.
    Transport,
    /// The endpoint answered with a non-success status code.
    Status,
    /// The response body is malformed or misses the expected fields.
    Parse,
    /// The request did not finish in time.
    Timeout,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Status => write!(f, "Unexpected status"),
            ErrorKind::Parse => write!(f, "Malformed response"),
            ErrorKind::Timeout => write!(f, "Timed out"),
        }
    }
}
