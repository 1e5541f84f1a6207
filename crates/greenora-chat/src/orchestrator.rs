//! Multi-session host for the plant assistant.
//!
//! Keeps one [`DialogueController`] per conversation and delivers replies in
//! the background once their delay elapses. Every state change is broadcast
//! as a [`ChatEvent`] so streaming clients can follow along.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::controller::{DialogueController, DialogueOptions};
use crate::error::ChatError;
use crate::knowledge::KnowledgeBase;
use crate::types::{
    ChatEvent, ChatEventKind, Message, SessionSnapshot, SessionSummary, SubmitOutcome,
};

const EVENT_CAPACITY: usize = 256;

pub struct ChatOrchestrator {
    knowledge: Arc<KnowledgeBase>,
    options: DialogueOptions,
    sessions: Mutex<HashMap<Uuid, DialogueController>>,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl ChatOrchestrator {
    pub fn new(knowledge: Arc<KnowledgeBase>, options: DialogueOptions) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            knowledge,
            options,
            sessions: Mutex::new(HashMap::new()),
            event_tx,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn options(&self) -> &DialogueOptions {
        &self.options
    }

    /// Receive every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Start a new conversation and return its initial view.
    pub fn create_session(&self) -> Result<SessionSnapshot, ChatError> {
        let controller = DialogueController::new(Arc::clone(&self.knowledge), self.options.clone());
        let snapshot = controller.snapshot();
        self.lock()?.insert(snapshot.id, controller);
        info!(session_id = %snapshot.id, "Chat session created");
        Ok(snapshot)
    }

    /// Hand an utterance to a session.
    ///
    /// When accepted, the reply is delivered by a background task after the
    /// configured delay. Must be called from within a Tokio runtime.
    pub fn submit(
        self: &Arc<Self>,
        session_id: Uuid,
        text: &str,
    ) -> Result<SubmitOutcome, ChatError> {
        let ready_at = {
            let mut sessions = self.lock()?;
            let controller = sessions
                .get_mut(&session_id)
                .ok_or(ChatError::SessionNotFound(session_id))?;
            let outcome = controller.submit(text);
            let SubmitOutcome::Accepted { ready_at } = outcome else {
                return Ok(outcome);
            };

            // Emitted under the lock so a racing deliver cannot interleave.
            if let Some(message) = controller.session().last().cloned() {
                self.emit(session_id, ChatEventKind::MessageAppended { message });
            }
            self.emit(session_id, ChatEventKind::PendingChanged { pending: true });
            ready_at
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep_until(ready_at).await;
            match this.deliver(session_id) {
                Ok(Some(_)) => {}
                Ok(None) => warn!(session_id = %session_id, "Reply task woke with nothing due"),
                Err(e) => debug!(session_id = %session_id, error = %e, "Reply dropped"),
            }
        });

        Ok(SubmitOutcome::Accepted { ready_at })
    }

    /// Append a session's pending reply if it is due.
    pub fn deliver(&self, session_id: Uuid) -> Result<Option<Message>, ChatError> {
        let mut sessions = self.lock()?;
        let controller = sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        let reply = controller.deliver().cloned();

        if let Some(message) = &reply {
            self.emit(
                session_id,
                ChatEventKind::MessageAppended {
                    message: message.clone(),
                },
            );
            self.emit(session_id, ChatEventKind::PendingChanged { pending: false });
        }
        Ok(reply)
    }

    pub fn snapshot(&self, session_id: Uuid) -> Result<SessionSnapshot, ChatError> {
        self.lock()?
            .get(&session_id)
            .map(DialogueController::snapshot)
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    /// Whether the session is waiting on a reply.
    pub fn is_pending(&self, session_id: Uuid) -> Result<bool, ChatError> {
        self.lock()?
            .get(&session_id)
            .map(DialogueController::is_pending)
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    /// Summaries of all live sessions, oldest first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut summaries: Vec<SessionSummary> =
            sessions.values().map(DialogueController::summary).collect();
        summaries.sort_by_key(|s| s.started_at);
        summaries
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Drop a session. A reply still pending for it is discarded.
    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        self.lock()?
            .remove(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }

    fn emit(&self, session_id: Uuid, kind: ChatEventKind) {
        // No subscribers is fine.
        let _ = self.event_tx.send(ChatEvent { session_id, kind });
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, DialogueController>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::Internal(format!("Lock poisoned: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
