use clippy_chat_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// A scripted answer for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// The request succeeds with this text.
    #[serde(rename = "reply")]
    Reply(String),
    /// The request fails with this kind of error.
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

impl PresetResponse {
    /// Creates a successful preset.
    #[inline]
    pub fn reply<S: Into<String>>(content: S) -> Self {
        Self::Reply(content.into())
    }

    /// Creates a failing preset.
    #[inline]
    pub fn failure(failure: PresetFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Serializable mirror of [`ErrorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    Transport,
    Status,
    Parse,
    Timeout,
}

impl From<PresetFailure> for ErrorKind {
    #[inline]
    fn from(value: PresetFailure) -> Self {
        match value {
            PresetFailure::Transport => ErrorKind::Transport,
            PresetFailure::Status => ErrorKind::Status,
            PresetFailure::Parse => ErrorKind::Parse,
            PresetFailure::Timeout => ErrorKind::Timeout,
        }
    }
}
