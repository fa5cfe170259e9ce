use std::sync::Arc;
use std::time::Duration;

use clippy_chat_model::ModelProvider;

use super::Assistant;
use crate::conversation::{ConversationEvent, DEFAULT_GREETING};
use crate::model_client::ModelClient;
use crate::settings::{FixedSettings, Settings};
use crate::transcript::DEFAULT_SYSTEM_PROMPT;

/// The timeout applied to model calls unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

type Observer = Box<dyn Fn(&ConversationEvent) + Send + Sync>;

/// [`Assistant`] builder.
pub struct AssistantBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) settings: Arc<dyn Settings>,
    pub(crate) system_prompt: String,
    pub(crate) greeting: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) observers: Vec<Observer>,
}

impl AssistantBuilder {
    /// Creates a new builder with the specified model provider.
    ///
    /// The provider is wrapped once here and reused by every turn.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            settings: Arc::new(FixedSettings::default()),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            greeting: DEFAULT_GREETING.to_owned(),
            timeout: Some(DEFAULT_TIMEOUT),
            observers: vec![],
        }
    }

    /// Sets the settings provider read at the start of each turn.
    #[inline]
    pub fn with_settings(mut self, settings: impl Settings + 'static) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// Sets the system prompt.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the greeting the conversation starts (and restarts) with.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the timeout for model calls. `None` disables it.
    #[inline]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attaches an observer for conversation changes.
    ///
    /// See [`Assistant::subscribe`] for the restrictions on observers.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&ConversationEvent) + Send + Sync + 'static,
    ) -> Self {
        self.observers.push(Box::new(on_event));
        self
    }

    /// Builds the assistant.
    #[inline]
    pub fn build(self) -> Assistant {
        Assistant::from_builder(self)
    }
}
