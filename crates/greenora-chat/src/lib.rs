//! Plant assistant for Greenora.
//!
//! A scripted FAQ responder: a read-only plant knowledge base, a single-slot
//! topic tracker, an ordered rule cascade that produces replies, and a
//! dialogue controller that simulates response latency.

pub mod context;
pub mod controller;
pub mod error;
pub mod knowledge;
pub mod orchestrator;
pub mod response;
pub mod session;
pub mod types;

pub use context::{classify, ContextTracker};
pub use controller::{DialogueController, DialogueOptions};
pub use error::ChatError;
pub use knowledge::KnowledgeBase;
pub use orchestrator::ChatOrchestrator;
pub use response::{Resolution, ResponseResolver, RuleKind, QUICK_QUESTIONS, WELCOME_MESSAGE};
pub use session::ConversationSession;
pub use types::{
    ChatEvent, ChatEventKind, DialogueState, IgnoreReason, Message, PlantFact, Sender,
    SessionSnapshot, SessionSummary, SubmitOutcome, Topic,
};
