use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use clippy_chat_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelRequest,
};
use tracing::Instrument;

/// A failed completion.
///
/// The kind tells transport, status, parse and timeout failures apart,
/// while [`Display`] gives the underlying message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionError {
    kind: ErrorKind,
    message: String,
}

impl CompletionError {
    /// Creates a new error.
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the underlying error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CompletionError {}

impl ModelProviderError for CompletionError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

type CompleteResult = Result<String, CompletionError>;
type BoxedCompleteFuture = Pin<Box<dyn Future<Output = CompleteResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedCompleteFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules and bounds every call with a timeout.
///
/// The client is built once and shared; cloning it is cheap.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    timeout: Option<Duration>,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn =
            Arc::new(move |req: ModelRequest| -> BoxedCompleteFuture {
                let fut = provider.send_request(&req);
                Box::pin(
                    async move {
                        trace!("got a request: {:?}", req);
                        match fut.await {
                            Ok(resp) => {
                                trace!(
                                    finish_reason = ?resp.finish_reason,
                                    "finished a request"
                                );
                                Ok(resp.content)
                            }
                            Err(err) => {
                                error!("got an error: {err:?}");
                                Err(CompletionError::new(
                                    err.kind(),
                                    err.to_string(),
                                ))
                            }
                        }
                    }
                    .instrument(trace_span!("model client req")),
                )
            });
        Self {
            handler_fn,
            timeout: None,
        }
    }

    /// Sets the timeout applied to every call. `None` waits forever.
    #[inline]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends the transcript and returns the reply text.
    ///
    /// Makes a single attempt. Every failure is returned as a
    /// [`CompletionError`].
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The in-flight request is abandoned when
    /// this operation is cancelled.
    pub async fn complete(
        &self,
        messages: Vec<ModelMessage>,
        max_tokens: u32,
    ) -> CompleteResult {
        let fut = (self.handler_fn)(ModelRequest {
            messages,
            max_tokens,
        });
        let Some(timeout) = self.timeout else {
            return fut.await;
        };
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("request timed out after {timeout:?}");
                Err(CompletionError::new(
                    ErrorKind::Timeout,
                    format!("request timed out after {}s", timeout.as_secs_f32()),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clippy_chat_test_model::{
        PresetFailure, PresetResponse, TestModelProvider,
    };

    use super::*;

    fn transcript() -> Vec<ModelMessage> {
        vec![
            ModelMessage::System("sys".to_owned()),
            ModelMessage::User("Hi".to_owned()),
        ]
    }

    #[tokio::test]
    async fn test_complete() {
        let mut model_provider = TestModelProvider::default();
        model_provider.set_fallback(PresetResponse::reply("How are you?"));
        let model_client = ModelClient::new(model_provider.clone());

        for _ in 0..3 {
            let reply = model_client.complete(transcript(), 42).await.unwrap();
            assert_eq!(reply, "How are you?");
        }

        let requests = model_provider.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].messages, transcript());
        assert_eq!(requests[0].max_tokens, 42);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_response(PresetResponse::failure(PresetFailure::Parse));
        let model_client = ModelClient::new(model_provider);

        let err = model_client.complete(transcript(), 42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        // The script is exhausted now.
        let err = model_client.complete(transcript(), 42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let mut model_provider = TestModelProvider::default();
        model_provider.set_fallback(PresetResponse::reply("too late"));
        model_provider.set_delay(Duration::from_secs(120));
        let model_client = ModelClient::new(model_provider)
            .with_timeout(Some(Duration::from_secs(30)));

        let err = model_client.complete(transcript(), 42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
