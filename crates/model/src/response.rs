/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelResponse {
    /// The text of the first returned choice.
    pub content: String,
    /// The reason the model stopped generating, if reported.
    pub finish_reason: Option<String>,
}

impl ModelResponse {
    /// Creates a response with the given content and no finish reason.
    #[inline]
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            finish_reason: None,
        }
    }
}
