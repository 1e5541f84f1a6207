//! Data types for the plant assistant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Knowledge
// =============================================================================

/// Structured facts about one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantFact {
    /// Normalized lowercase plant name, matched by substring against utterances.
    pub id: String,
    pub display_name: String,
    pub benefits: Vec<String>,
    pub growing_guide: String,
    pub harvest_window: String,
    pub export_markets: Vec<String>,
    pub price_range: String,
}

// =============================================================================
// Conversation
// =============================================================================

/// The inferred subject of the ongoing exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    None,
    Export,
    Growing,
    Health,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::None => "none",
            Topic::Export => "export",
            Topic::Growing => "growing",
            Topic::Health => "health",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    /// Newline-delimited text; each line renders as a paragraph.
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// The paragraphs a presentation layer renders, one per line.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

// =============================================================================
// Dialogue control
// =============================================================================

/// Dialogue controller state. `Idle -> Pending -> Idle`, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueState {
    Idle,
    Pending,
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueState::Idle => write!(f, "Idle"),
            DialogueState::Pending => write!(f, "Pending"),
        }
    }
}

/// Why a submission was dropped without touching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Blank or whitespace-only input.
    Empty,
    /// A reply is still being prepared.
    Pending,
    /// Input longer than the configured maximum.
    TooLong,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Empty => write!(f, "message is empty"),
            IgnoreReason::Pending => write!(f, "a reply is already pending"),
            IgnoreReason::TooLong => write!(f, "message is too long"),
        }
    }
}

/// Result of handing an utterance to the dialogue controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The utterance was appended; the reply becomes due at `ready_at`.
    Accepted { ready_at: tokio::time::Instant },
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

// =============================================================================
// Session views and events
// =============================================================================

/// Point-in-time view of a session for polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub topic: Topic,
    pub pending: bool,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub message_count: usize,
    pub topic: Topic,
    pub pending: bool,
}

/// State change broadcast to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub kind: ChatEventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEventKind {
    MessageAppended { message: Message },
    PendingChanged { pending: bool },
}
