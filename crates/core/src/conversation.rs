//! Conversation-related types.

use std::fmt::{self, Debug, Formatter};

/// The greeting every conversation starts with.
pub const DEFAULT_GREETING: &str = "Hi! I'm Clippy, your Windows assistant. Would you like to get some assistance?";

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Written by the assistant (including the greeting and placeholders).
    Assistant,
    /// Written by the user.
    User,
}

/// Identifies a message within a conversation.
///
/// Ids are never reused, not even across [`Conversation::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

/// A message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub(crate) id: MessageId,
    pub(crate) role: Role,
    pub(crate) text: String,
    pub(crate) is_latest: bool,
}

impl Message {
    /// Returns the id of this message.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    ///
    /// The text of a pending reply is empty until the reply arrives.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether this is the assistant message the UI may offer to
    /// edit or retry.
    #[inline]
    pub fn is_latest(&self) -> bool {
        self.is_latest
    }
}

/// A change made to the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A message was added at the end.
    Appended(Message),
    /// A message was changed in place.
    Updated(Message),
    /// All messages were removed. An `Appended` event for the greeting
    /// follows immediately.
    Reset,
}

type Observer = Box<dyn Fn(&ConversationEvent) + Send + Sync>;

/// An ordered, append-only message log.
///
/// Invariant: at most one message is marked latest, and if there is one it
/// is the last assistant message that was appended.
pub struct Conversation {
    greeting: String,
    messages: Vec<Message>,
    next_id: u64,
    observers: Vec<Observer>,
}

impl Conversation {
    /// Creates a conversation that starts with `greeting`.
    pub fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        let mut conversation = Self {
            greeting: greeting.into(),
            messages: vec![],
            next_id: 0,
            observers: vec![],
        };
        conversation.push_greeting();
        conversation
    }

    /// Registers an observer that is notified after every change.
    ///
    /// Observers are called synchronously while the conversation is being
    /// mutated, so they must not call back into the owner of the
    /// conversation.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&ConversationEvent) + Send + Sync + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    /// Appends a message and returns its id.
    ///
    /// Every earlier assistant message loses its latest flag. The new
    /// message becomes latest if it is an assistant message.
    pub fn append<S: Into<String>>(&mut self, role: Role, text: S) -> MessageId {
        for msg in &mut self.messages {
            if msg.role == Role::Assistant {
                msg.is_latest = false;
            }
        }

        let id = MessageId(self.next_id);
        self.next_id += 1;
        let msg = Message {
            id,
            role,
            text: text.into(),
            is_latest: role == Role::Assistant,
        };
        self.messages.push(msg.clone());
        self.notify(&ConversationEvent::Appended(msg));
        id
    }

    /// Replaces the text of message `id`.
    ///
    /// Returns `false` if there is no such message, which happens when the
    /// conversation was reset after the message was appended.
    #[inline]
    pub fn update_text<S: Into<String>>(&mut self, id: MessageId, text: S) -> bool {
        let text = text.into();
        self.update(id, |msg| msg.text = text)
    }

    /// Clears the latest flag of message `id`.
    #[inline]
    pub fn clear_latest(&mut self, id: MessageId) -> bool {
        self.update(id, |msg| msg.is_latest = false)
    }

    /// Removes every message and restores the greeting.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.notify(&ConversationEvent::Reset);
        self.push_greeting();
    }

    /// Returns the messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the message with the given id.
    #[inline]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    /// Returns the message marked latest, if any.
    #[inline]
    pub fn latest(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|msg| msg.is_latest)
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the conversation has no messages.
    ///
    /// This only holds transiently; a conversation always carries at least
    /// its greeting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the greeting this conversation starts with.
    #[inline]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Mutates message `id` in place and notifies observers once.
    pub(crate) fn update(
        &mut self,
        id: MessageId,
        f: impl FnOnce(&mut Message),
    ) -> bool {
        let Some(msg) = self.messages.iter_mut().find(|msg| msg.id == id)
        else {
            return false;
        };
        f(msg);
        let msg = msg.clone();
        self.notify(&ConversationEvent::Updated(msg));
        true
    }

    fn push_greeting(&mut self) {
        let greeting = self.greeting.clone();
        self.append(Role::Assistant, greeting);
    }

    fn notify(&self, event: &ConversationEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }
}

impl Default for Conversation {
    #[inline]
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}

impl Debug for Conversation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("messages", &self.messages)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn latest_count(conversation: &Conversation) -> usize {
        conversation
            .messages()
            .iter()
            .filter(|msg| msg.is_latest())
            .count()
    }

    #[test]
    fn test_starts_with_greeting() {
        let conversation = Conversation::default();
        assert_eq!(conversation.len(), 1);
        let greeting = &conversation.messages()[0];
        assert_eq!(greeting.role(), Role::Assistant);
        assert_eq!(greeting.text(), DEFAULT_GREETING);
        assert!(greeting.is_latest());
    }

    #[test]
    fn test_latest_flag_moves() {
        let mut conversation = Conversation::with_greeting("Hi");

        conversation.append(Role::User, "hello");
        assert_eq!(latest_count(&conversation), 0);

        let reply = conversation.append(Role::Assistant, "");
        assert_eq!(latest_count(&conversation), 1);
        assert_eq!(conversation.latest().unwrap().id(), reply);

        conversation.append(Role::User, "again");
        let reply = conversation.append(Role::Assistant, "sure");
        assert_eq!(latest_count(&conversation), 1);
        assert_eq!(conversation.latest().unwrap().id(), reply);

        assert!(conversation.clear_latest(reply));
        assert_eq!(latest_count(&conversation), 0);
        assert_eq!(conversation.latest(), None);
    }

    #[test]
    fn test_update_text() {
        let mut conversation = Conversation::with_greeting("Hi");
        let id = conversation.append(Role::Assistant, "");
        assert!(conversation.update_text(id, "done"));
        assert_eq!(conversation.get(id).unwrap().text(), "done");
        assert!(conversation.get(id).unwrap().is_latest());
    }

    #[test]
    fn test_reset() {
        let mut conversation = Conversation::with_greeting("Hi");
        conversation.append(Role::User, "hello");
        let pending = conversation.append(Role::Assistant, "");
        conversation.reset();

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].text(), "Hi");
        assert!(conversation.messages()[0].is_latest());

        // The old placeholder is gone and its id is not reused.
        assert!(!conversation.update_text(pending, "late reply"));
        assert_ne!(conversation.messages()[0].id(), pending);

        conversation.reset();
        conversation.reset();
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_observers() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut conversation = Conversation::with_greeting("Hi");
        conversation.subscribe({
            let events = Arc::clone(&events);
            move |event| events.lock().unwrap().push(event.clone())
        });

        let id = conversation.append(Role::User, "hello");
        conversation.update_text(id, "hello!");
        conversation.reset();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], ConversationEvent::Appended(m) if m.text() == "hello"));
        assert!(matches!(&events[1], ConversationEvent::Updated(m) if m.text() == "hello!"));
        assert_eq!(events[2], ConversationEvent::Reset);
        assert!(matches!(&events[3], ConversationEvent::Appended(m) if m.text() == "Hi"));
    }
}
