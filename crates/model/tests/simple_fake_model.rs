use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use clippy_chat_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelRequest,
    ModelResponse,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back after a short delay.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        let max_tokens = req.max_tokens;
        async move {
            sleep(Duration::from_millis(1)).await;
            if max_tokens == 0 {
                return Err(FakeModelProviderError(ErrorKind::Status));
            }
            let Some(text) = last_user else {
                return Err(FakeModelProviderError(ErrorKind::Parse));
            };
            Ok(ModelResponse::with_content(format!("You said {text}")))
        }
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        messages: vec![
            ModelMessage::System("Be brief.".to_owned()),
            ModelMessage::User("Good morning".to_owned()),
        ],
        max_tokens: 16,
    };
    let resp = provider.send_request(&req).await.unwrap();
    assert_eq!(resp.content, "You said Good morning");
    assert_eq!(resp.finish_reason, None);
}

#[tokio::test]
async fn test_error() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        messages: vec![ModelMessage::System("Be brief.".to_owned())],
        max_tokens: 16,
    };
    let err = provider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let boxed: Box<dyn ModelProviderError> = Box::new(
        provider
            .send_request(&ModelRequest {
                messages: vec![],
                max_tokens: 0,
            })
            .await
            .unwrap_err(),
    );
    assert_eq!(boxed.kind(), ErrorKind::Status);
}

#[test]
fn test_message_roles() {
    let messages = [
        ModelMessage::System("a".to_owned()),
        ModelMessage::User("b".to_owned()),
        ModelMessage::Assistant("c".to_owned()),
    ];
    let roles: Vec<_> = messages.iter().map(ModelMessage::role).collect();
    assert_eq!(roles, ["system", "user", "assistant"]);
    let contents: Vec<_> = messages.iter().map(ModelMessage::content).collect();
    assert_eq!(contents, ["a", "b", "c"]);
}
