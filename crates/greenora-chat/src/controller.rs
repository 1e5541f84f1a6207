//! Dialogue controller: one conversation's session, topic and pending reply.
//!
//! State machine:
//! - Idle -> Pending (utterance accepted and appended)
//! - Pending -> Idle (delay elapsed, reply appended)
//!
//! A pending reply cannot be cancelled. Dropping a [`DialogueController::settle`]
//! future part-way leaves the reply scheduled; the next `settle` or
//! `deliver` still appends exactly one assistant message.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use greenora_core::config::AssistantConfig;

use crate::context::ContextTracker;
use crate::knowledge::KnowledgeBase;
use crate::response::{ResponseResolver, WELCOME_MESSAGE};
use crate::session::ConversationSession;
use crate::types::{
    DialogueState, IgnoreReason, Message, SessionSnapshot, SessionSummary, SubmitOutcome, Topic,
};

/// Per-conversation settings.
#[derive(Debug, Clone)]
pub struct DialogueOptions {
    /// Simulated thinking time before each reply.
    pub response_delay: Duration,
    /// Longest accepted utterance, in characters.
    pub max_message_length: usize,
    /// Seed the session with the welcome message.
    pub welcome_message: bool,
}

impl Default for DialogueOptions {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

impl DialogueOptions {
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            response_delay: Duration::from_millis(config.response_delay_ms),
            max_message_length: config.max_message_length,
            welcome_message: config.welcome_message,
        }
    }
}

#[derive(Debug)]
struct PendingReply {
    utterance: String,
    ready_at: Instant,
}

/// Owns everything mutable about one conversation.
#[derive(Debug)]
pub struct DialogueController {
    resolver: ResponseResolver,
    context: ContextTracker,
    session: ConversationSession,
    pending: Option<PendingReply>,
    options: DialogueOptions,
}

impl DialogueController {
    pub fn new(knowledge: Arc<KnowledgeBase>, options: DialogueOptions) -> Self {
        let session = if options.welcome_message {
            ConversationSession::with_greeting(WELCOME_MESSAGE)
        } else {
            ConversationSession::new()
        };
        Self {
            resolver: ResponseResolver::new(knowledge),
            context: ContextTracker::new(),
            session,
            pending: None,
            options,
        }
    }

    pub fn id(&self) -> Uuid {
        self.session.id()
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn topic(&self) -> Topic {
        self.context.get()
    }

    pub fn state(&self) -> DialogueState {
        if self.pending.is_some() {
            DialogueState::Pending
        } else {
            DialogueState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending reply becomes due, if one is pending.
    pub fn ready_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.ready_at)
    }

    /// Accept a user utterance.
    ///
    /// Blank input, input over the length limit, and input arriving while a
    /// reply is pending are ignored without touching the session or topic.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        if raw.trim().is_empty() {
            return self.ignore(IgnoreReason::Empty);
        }
        if self.pending.is_some() {
            return self.ignore(IgnoreReason::Pending);
        }
        if raw.chars().count() > self.options.max_message_length {
            return self.ignore(IgnoreReason::TooLong);
        }

        self.session.append(Message::user(raw));
        let ready_at = Instant::now() + self.options.response_delay;
        self.pending = Some(PendingReply {
            utterance: raw.to_string(),
            ready_at,
        });
        debug!(
            session_id = %self.id(),
            delay_ms = self.options.response_delay.as_millis() as u64,
            "Utterance accepted, state: {} -> {}",
            DialogueState::Idle,
            DialogueState::Pending
        );
        SubmitOutcome::Accepted { ready_at }
    }

    /// Append the pending reply if its delay has elapsed.
    ///
    /// Returns `None` when idle or when the reply is not yet due.
    pub fn deliver(&mut self) -> Option<&Message> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| Instant::now() >= p.ready_at);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;

        let resolution = self.resolver.resolve(&pending.utterance, &mut self.context);
        debug!(
            session_id = %self.id(),
            rule = ?resolution.rule,
            topic = %self.context.get(),
            reply_len = resolution.text.len(),
            "Reply delivered, state: {} -> {}",
            DialogueState::Pending,
            DialogueState::Idle
        );
        Some(self.session.append(Message::assistant(resolution.text)))
    }

    /// Wait out the pending delay, then append the reply.
    pub async fn settle(&mut self) -> Option<&Message> {
        let ready_at = self.pending.as_ref()?.ready_at;
        tokio::time::sleep_until(ready_at).await;
        self.deliver()
    }

    /// Submit and wait for the reply. `None` if the utterance was ignored.
    pub async fn exchange(&mut self, raw: &str) -> Option<Message> {
        if !self.submit(raw).is_accepted() {
            return None;
        }
        self.settle().await.cloned()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id(),
            started_at: self.session.started_at(),
            topic: self.topic(),
            pending: self.is_pending(),
            messages: self.session.messages().to_vec(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id(),
            started_at: self.session.started_at(),
            message_count: self.session.len(),
            topic: self.topic(),
            pending: self.is_pending(),
        }
    }

    fn ignore(&self, reason: IgnoreReason) -> SubmitOutcome {
        debug!(session_id = %self.id(), %reason, "Utterance ignored");
        SubmitOutcome::Ignored(reason)
    }
}

// =============================================================================
// Tests
// =============================================================================
