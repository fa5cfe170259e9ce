use clippy_chat_model::{ErrorKind, ModelMessage, ModelRequest, ModelResponse};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        max_tokens: req.max_tokens,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => Message::Assistant {
            content: content.clone(),
        },
    }
}

/// Parses a successful response body. Only the first choice is consumed.
pub fn parse_response(body: &str) -> Result<ModelResponse, Error> {
    let completion = serde_json::from_str::<ChatCompletion>(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Parse))?;
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new("response has no choices", ErrorKind::Parse));
    };
    let Some(content) = choice.message.content else {
        return Err(Error::new(
            "missing `choices[0].message.content`",
            ErrorKind::Parse,
        ));
    };
    Ok(ModelResponse {
        content,
        finish_reason: choice.finish_reason,
    })
}

/// Extracts a human-readable message from a failed response body.
///
/// Prefers the vendor's `error.message` and falls back to a truncated
/// snippet of the raw body.
pub fn error_message(body: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(body) {
        return body.error.message;
    }
    make_snippet(body)
}

const SNIPPET_LEN: usize = 200;

fn make_snippet(body: &str) -> String {
    let body = body.trim();
    let mut chars = body.char_indices();
    match chars.nth(SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}
