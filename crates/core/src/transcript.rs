//! Turns the conversation into the message list sent to the model.

use clippy_chat_model::ModelMessage;

use crate::conversation::{Message, Role};

/// The instruction sent as the system message of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are in an app that revives Microsoft Clippy in Windows. Speak in a Clippy style and try to stay as concise/short as possible and not output long messages.";

/// Sent in place of an empty message text, since chat-completion APIs
/// reject empty contents.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "(empty message)";

/// Builds the transcript for `messages`.
///
/// The result always holds `1 + messages.len()` entries: the system prompt
/// followed by every message in order.
pub fn build_transcript(
    messages: &[Message],
    system_prompt: &str,
) -> Vec<ModelMessage> {
    let mut transcript = Vec::with_capacity(messages.len() + 1);
    transcript.push(ModelMessage::System(system_prompt.to_owned()));
    transcript.extend(messages.iter().map(|msg| {
        let content = if msg.text.is_empty() {
            EMPTY_CONTENT_PLACEHOLDER.to_owned()
        } else {
            msg.text.clone()
        };
        match msg.role {
            Role::Assistant => ModelMessage::Assistant(content),
            Role::User => ModelMessage::User(content),
        }
    }));
    transcript
}
