mod builder;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::conversation::{Conversation, ConversationEvent, Message};
use crate::model_client::{CompletionError, ModelClient};
use crate::settings::Settings;
pub use builder::{AssistantBuilder, DEFAULT_TIMEOUT};
pub use state::{CANCELLED_TEXT, failure_text};

/// Where the assistant is in the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TurnStage {
    /// Ready to accept a turn.
    #[default]
    Idle,
    /// A turn has been sent and its reply has not arrived yet.
    AwaitingCompletion,
}

/// The result of a finished turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The placeholder now holds this reply.
    Replied(String),
    /// The placeholder now holds the error text.
    Failed(CompletionError),
}

/// An assistant instance, which owns the conversation and talks to the
/// model on behalf of the user.
///
/// Only one turn runs at a time. Starting a turn while another is waiting
/// for its reply fails with [`crate::TurnError::Busy`].
///
/// Cloned handles refer to the same assistant.
#[derive(Clone)]
pub struct Assistant {
    shared: Arc<Shared>,
}

struct Shared {
    model_client: ModelClient,
    settings: Arc<dyn Settings>,
    system_prompt: String,
    state: Mutex<AssistantState>,
}

struct AssistantState {
    conversation: Conversation,
    stage: TurnStage,
}

impl Assistant {
    /// Clears the conversation and restores the greeting.
    ///
    /// A turn in flight still completes, but its reply is discarded since
    /// its placeholder no longer exists.
    pub fn reset(&self) {
        debug!("resetting conversation");
        self.shared.lock_state().conversation.reset();
    }

    /// Returns a snapshot of the conversation.
    pub fn messages(&self) -> Vec<Message> {
        self.shared.lock_state().conversation.messages().to_vec()
    }

    /// Returns the stage of the current turn.
    pub fn stage(&self) -> TurnStage {
        self.shared.lock_state().stage
    }

    /// Registers an observer for conversation changes.
    ///
    /// The observer runs while the conversation is locked, so it must not
    /// call back into the assistant. Forward events to a channel instead.
    pub fn subscribe(
        &self,
        observer: impl Fn(&ConversationEvent) + Send + Sync + 'static,
    ) {
        self.shared.lock_state().conversation.subscribe(observer);
    }
}

impl Shared {
    #[inline]
    fn lock_state(&self) -> MutexGuard<'_, AssistantState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Assistant {
    fn from_builder(builder: AssistantBuilder) -> Self {
        let AssistantBuilder {
            model_client,
            settings,
            system_prompt,
            greeting,
            timeout,
            observers,
        } = builder;

        let mut conversation = Conversation::with_greeting(greeting);
        for observer in observers {
            conversation.subscribe(observer);
        }
        let shared = Shared {
            model_client: model_client.with_timeout(timeout),
            settings,
            system_prompt,
            state: Mutex::new(AssistantState {
                conversation,
                stage: TurnStage::Idle,
            }),
        };
        Self {
            shared: Arc::new(shared),
        }
    }
}
