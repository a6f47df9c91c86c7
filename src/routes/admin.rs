use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::post,
};
use tracing::debug;

use crate::{
    dto::admin::{
        ActionResponse, AdvancePhaseResponse, NextRoundResponse, StartGameRequest,
        StartGameResponse,
    },
    services::admin_service,
    state::SharedState,
};

/// Host controls. Unauthenticated: the game runs on a trusted classroom network.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/admin/start", post(start_game))
        .route("/api/admin/next_phase", post(next_phase))
        .route("/api/admin/next_round", post(next_round))
        .route("/api/admin/reset", post(reset))
}

#[utoipa::path(
    post,
    path = "/api/admin/start",
    tag = "admin",
    request_body(content = StartGameRequest, description = "Optional; malformed bodies select the default round total"),
    responses((status = 200, description = "Fresh game waiting in the lobby", body = StartGameResponse))
)]
/// Reset everything and configure the number of rounds.
pub async fn start_game(State(state): State<SharedState>, body: Bytes) -> Json<StartGameResponse> {
    let request = if body.is_empty() {
        StartGameRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|err| {
            debug!(error = %err, "ignoring malformed start body");
            StartGameRequest::default()
        })
    };
    Json(admin_service::start_game(&state, request).await)
}

#[utoipa::path(
    post,
    path = "/api/admin/next_phase",
    tag = "admin",
    responses((status = 200, description = "Phase entered", body = AdvancePhaseResponse))
)]
/// Advance to the next phase of the round cycle.
pub async fn next_phase(State(state): State<SharedState>) -> Json<AdvancePhaseResponse> {
    Json(admin_service::advance_phase(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/admin/next_round",
    tag = "admin",
    responses((status = 200, description = "Answer phase of the next round", body = NextRoundResponse))
)]
/// Jump to the answer phase of the next round.
pub async fn next_round(State(state): State<SharedState>) -> Json<NextRoundResponse> {
    Json(admin_service::next_round(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/admin/reset",
    tag = "admin",
    responses((status = 200, description = "Game reset", body = ActionResponse))
)]
/// Discard players, scores and rounds.
pub async fn reset(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(admin_service::reset(&state).await)
}
