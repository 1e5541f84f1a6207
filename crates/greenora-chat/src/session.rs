//! Append-only message log for one conversation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::Message;

/// Ordered messages of one conversation. Lives in memory only.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    messages: Vec<Message>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// A session whose first message is the assistant's `greeting`.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut session = Self::new();
        session.append(Message::assistant(greeting));
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Only the dialogue controller appends.
    pub(crate) fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
