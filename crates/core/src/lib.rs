//! Core logic including the conversation log, transcript building, and
//! turn sequencing against a model provider.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod assistant;
pub mod conversation;
mod error;
mod model_client;
pub mod settings;
pub mod transcript;

pub use assistant::{
    Assistant, AssistantBuilder, CANCELLED_TEXT, DEFAULT_TIMEOUT, TurnOutcome,
    TurnStage, failure_text,
};
pub use conversation::{
    Conversation, ConversationEvent, DEFAULT_GREETING, Message, MessageId,
    Role,
};
pub use error::TurnError;
pub use model_client::CompletionError;
pub use settings::{FixedSettings, Settings, SharedSettings};
pub use transcript::{DEFAULT_SYSTEM_PROMPT, EMPTY_CONTENT_PLACEHOLDER};
