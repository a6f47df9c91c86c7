use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::QueryRejection,
    },
    routing::{get, post},
};

use crate::{
    dto::public::{
        JoinRequest, JoinResponse, ResultsQuery, ResultsResponse, ScoreboardEntry, StateResponse,
        SubmissionAck, Submission, SubmitAnswerRequest, SubmitGuessRequest,
    },
    error::AppError,
    routes::extract::JsonBody,
    services::game_service,
    state::SharedState,
};

/// Player-facing endpoints polled by the phone clients.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/join", post(join))
        .route("/api/state", get(get_state))
        .route("/api/answer", post(submit_answer))
        .route("/api/guess", post(submit_guess))
        .route("/api/results", get(get_results))
        .route("/api/scoreboard", get(get_scoreboard))
}

#[utoipa::path(
    post,
    path = "/api/join",
    tag = "players",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Player registered", body = JoinResponse),
        (status = 400, description = "Name empty after trimming or malformed body"),
        (status = 415, description = "Content-Type present but not JSON")
    )
)]
/// Register a player under a display name.
pub async fn join(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<JoinRequest>,
) -> Result<Json<JoinResponse>, AppError> {
    let response = game_service::join(&state, request).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/state",
    tag = "players",
    responses((status = 200, description = "Current game snapshot", body = StateResponse))
)]
/// Return the phase, round, prompt and deadline clients render from.
pub async fn get_state(State(state): State<SharedState>) -> Json<StateResponse> {
    Json(game_service::get_state(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/answer",
    tag = "players",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = SubmissionAck),
        (status = 400, description = "Missing field or empty answer"),
        (status = 404, description = "Unknown player"),
        (status = 409, description = "Wrong phase, wrong round or already answered")
    )
)]
/// Submit the player's own answer for the current round.
pub async fn submit_answer(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<SubmitAnswerRequest>,
) -> Result<Json<SubmissionAck>, AppError> {
    let submission = Submission::try_from(request)?;
    let ack = game_service::submit_answer(&state, submission).await?;
    Ok(Json(ack))
}

#[utoipa::path(
    post,
    path = "/api/guess",
    tag = "players",
    request_body = SubmitGuessRequest,
    responses(
        (status = 200, description = "Guess recorded", body = SubmissionAck),
        (status = 400, description = "Missing field or empty guess"),
        (status = 404, description = "Unknown player"),
        (status = 409, description = "Wrong phase, wrong round or already guessed")
    )
)]
/// Submit the player's guess at the majority answer.
pub async fn submit_guess(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<SubmitGuessRequest>,
) -> Result<Json<SubmissionAck>, AppError> {
    let submission = Submission::try_from(request)?;
    let ack = game_service::submit_guess(&state, submission).await?;
    Ok(Json(ack))
}

#[utoipa::path(
    get,
    path = "/api/results",
    tag = "players",
    params(("round_id" = i64, Query, description = "Round to report on")),
    responses(
        (status = 200, description = "Answer breakdown", body = ResultsResponse),
        (status = 400, description = "round_id missing or not a number"),
        (status = 404, description = "Round not played yet"),
        (status = 409, description = "Current round still collecting answers or guesses")
    )
)]
/// Return the answer breakdown of a round.
pub async fn get_results(
    State(state): State<SharedState>,
    query: Result<Query<ResultsQuery>, QueryRejection>,
) -> Result<Json<ResultsResponse>, AppError> {
    let Query(query) = query?;
    let results = game_service::get_results(&state, query.round_id).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/scoreboard",
    tag = "players",
    responses((status = 200, description = "Players by descending score", body = [ScoreboardEntry]))
)]
/// Return every player ordered by score, ties by name.
pub async fn get_scoreboard(State(state): State<SharedState>) -> Json<Vec<ScoreboardEntry>> {
    Json(game_service::get_scoreboard(&state).await)
}
