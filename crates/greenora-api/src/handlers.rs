//! Route handler functions for all API endpoints.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use greenora_chat::{
    ChatEventKind, IgnoreReason, PlantFact, SessionSnapshot, SessionSummary, SubmitOutcome,
    QUICK_QUESTIONS,
};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlantsResponse {
    pub plants: Vec<PlantFact>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IgnoreReason>,
    pub pending: bool,
}

// =============================================================================
// Health and knowledge
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.chat.session_count(),
    })
}

/// GET /plants - every knowledge-base record, in declaration order.
pub async fn list_plants(State(state): State<AppState>) -> Json<PlantsResponse> {
    Json(PlantsResponse {
        plants: state.chat.knowledge().plants().to_vec(),
    })
}

/// GET /plants/{id}
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlantFact>, ApiError> {
    state
        .chat
        .knowledge()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("plant not found: {}", id)))
}

/// GET /chat/quick-questions
pub async fn quick_questions() -> Json<QuickQuestionsResponse> {
    Json(QuickQuestionsResponse {
        questions: QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}

// =============================================================================
// Chat sessions
// =============================================================================

/// POST /chat/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    let snapshot = state.chat.create_session()?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /chat/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.chat.list_sessions(),
    })
}

/// GET /chat/sessions/{id} - polling view.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.chat.snapshot(id)?))
}

/// POST /chat/sessions/{id}/messages
///
/// 202 when accepted (the reply follows in the background), 200 with
/// `accepted: false` when the input was ignored.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), ApiError> {
    let outcome = state.chat.submit(id, &body.text)?;
    let pending = state.chat.is_pending(id).unwrap_or(false);

    let (status, accepted, reason) = match outcome {
        SubmitOutcome::Accepted { .. } => (StatusCode::ACCEPTED, true, None),
        SubmitOutcome::Ignored(reason) => (StatusCode::OK, false, Some(reason)),
    };
    Ok((
        status,
        Json(SendMessageResponse {
            accepted,
            reason,
            pending,
        }),
    ))
}

/// DELETE /chat/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.chat.delete_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /chat/sessions/{id}/events - SSE stream of one session's events.
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>> + Send>, ApiError> {
    // Subscribe before the existence check so nothing slips between them.
    let rx = state.chat.subscribe();
    state.chat.snapshot(id)?;

    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.session_id == id => {
            let name = match &event.kind {
                ChatEventKind::MessageAppended { .. } => "message_appended",
                ChatEventKind::PendingChanged { .. } => "pending_changed",
            };
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().event(name).data(data)))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(session_id = %id, error = %e, "SSE subscriber lagged");
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
