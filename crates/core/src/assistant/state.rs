use super::{Assistant, Shared, TurnOutcome, TurnStage};
use crate::conversation::{MessageId, Role};
use crate::error::TurnError;
use crate::model_client::CompletionError;
use crate::transcript::build_transcript;

/// The text a placeholder gets when its turn is dropped before the reply
/// arrives.
pub const CANCELLED_TEXT: &str = "The request was cancelled before a reply arrived.";

/// Returns the text shown in place of a reply when the turn failed.
pub fn failure_text(err: &CompletionError) -> String {
    format!("Unfortunately, an error occurred `{}`", err.message())
}

impl Assistant {
    /// Sends a user message and waits for the reply.
    ///
    /// The user message and an empty placeholder reply are appended right
    /// away, and the placeholder is filled in once the model answers. On
    /// failure the placeholder gets the error text and loses its latest
    /// flag, and the error is returned as [`TurnOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Busy`] without touching the conversation if
    /// another turn is still waiting for its reply.
    ///
    /// # Cancel safety
    ///
    /// Dropping the returned future abandons the request and returns the
    /// assistant to idle. The placeholder then holds [`CANCELLED_TEXT`] and
    /// is no longer latest.
    pub async fn send_turn<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<TurnOutcome, TurnError> {
        let shared = &*self.shared;
        // Declared before the lock is taken, so that on unwind the lock is
        // released before the guard re-acquires it.
        let mut guard = AwaitingGuard {
            shared,
            armed: false,
            placeholder: None,
        };
        let (transcript, placeholder) = {
            let mut state = shared.lock_state();
            if state.stage != TurnStage::Idle {
                warn!("rejected a turn while another is in flight");
                return Err(TurnError::Busy);
            }
            state.stage = TurnStage::AwaitingCompletion;
            guard.armed = true;

            state.conversation.append(Role::User, text);
            // The new user message is the last transcript entry; it is not
            // repeated after the history.
            let transcript = build_transcript(
                state.conversation.messages(),
                &shared.system_prompt,
            );
            let placeholder = state.conversation.append(Role::Assistant, "");
            guard.placeholder = Some(placeholder);
            (transcript, placeholder)
        };

        let max_tokens = shared.settings.max_tokens();
        debug!(messages = transcript.len(), max_tokens, "sending turn");
        let result = shared.model_client.complete(transcript, max_tokens).await;

        let mut state = shared.lock_state();
        let (found, outcome) = match result {
            Ok(reply) => {
                info!("turn finished");
                let found = state.conversation.update_text(placeholder, &*reply);
                (found, TurnOutcome::Replied(reply))
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "turn failed: {err}");
                let text = failure_text(&err);
                let found = state.conversation.update(placeholder, |msg| {
                    msg.text = text;
                    msg.is_latest = false;
                });
                (found, TurnOutcome::Failed(err))
            }
        };
        if !found {
            debug!("placeholder is gone, conversation was reset");
        }
        state.stage = TurnStage::Idle;
        guard.armed = false;
        Ok(outcome)
    }
}

/// Returns the assistant to idle if a turn is dropped or panics before it
/// finishes.
///
/// A placeholder left behind gets [`CANCELLED_TEXT`] and loses its latest
/// flag, like a failed turn.
struct AwaitingGuard<'a> {
    shared: &'a Shared,
    armed: bool,
    placeholder: Option<MessageId>,
}

impl Drop for AwaitingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("turn cancelled");
        let mut state = self.shared.lock_state();
        state.stage = TurnStage::Idle;
        // Observers may be the reason we are unwinding, don't call them
        // again.
        if std::thread::panicking() {
            return;
        }
        if let Some(placeholder) = self.placeholder {
            state.conversation.update(placeholder, |msg| {
                msg.text = CANCELLED_TEXT.to_owned();
                msg.is_latest = false;
            });
        }
    }
}
