//! Greenora API crate - axum HTTP server, route handlers, SSE streaming.
//!
//! Exposes the plant assistant over REST: knowledge-base lookups, chat
//! sessions with background replies, and a per-session event stream.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
