//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use greenora_chat::ChatOrchestrator;
use greenora_core::config::GreenoraConfig;

/// Shared application state.
///
/// Cloned per request; everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only once serving).
    pub config: Arc<GreenoraConfig>,
    /// Chat sessions and the event broadcast.
    pub chat: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: GreenoraConfig, chat: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            start_time: Instant::now(),
        }
    }
}
