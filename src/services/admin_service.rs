//! Business logic powering the admin REST routes. Each operation mutates the
//! game under a single write lock, then fans the outcome out to SSE subscribers.
//!
//! Events are published after the lock is released, so two concurrent admin
//! actions may reach subscribers out of order. Every `phase_changed` payload
//! carries the state machine `version`; clients order by it.

use tracing::info;

use crate::{
    dto::admin::{
        ActionResponse, AdvancePhaseResponse, NextRoundResponse, StartGameRequest,
        StartGameResponse,
    },
    services::sse_events,
    state::{SharedState, game::normalize_round_total},
};

/// Discard the current game and prepare a new one in the lobby.
///
/// An absent or out-of-range `round_total` selects the configured default.
pub async fn start_game(state: &SharedState, request: StartGameRequest) -> StartGameResponse {
    let round_total =
        normalize_round_total(request.round_total, state.config().default_round_total());
    let change = state.with_game_mut(|game| game.reset(round_total)).await;
    info!(round_total, "game started");
    sse_events::broadcast_phase_changed(state, &change);

    StartGameResponse {
        ok: true,
        round_total,
    }
}

/// Move to the next phase of the cycle.
pub async fn advance_phase(state: &SharedState) -> AdvancePhaseResponse {
    let now = state.now();
    let (change, scoreboard) = state
        .with_game_mut(|game| {
            let change = game.advance(now);
            let scoreboard = change.outcome.is_some().then(|| game.scoreboard());
            (change, scoreboard)
        })
        .await;

    sse_events::broadcast_phase_changed(state, &change);
    if let (Some(outcome), Some(scoreboard)) = (&change.outcome, scoreboard) {
        sse_events::broadcast_scores_updated(state, change.round_id, outcome, scoreboard);
    }
    AdvancePhaseResponse::from(&change)
}

/// Start the answer phase of the following round.
pub async fn next_round(state: &SharedState) -> NextRoundResponse {
    let now = state.now();
    let change = state.with_game_mut(|game| game.next_round(now)).await;
    sse_events::broadcast_phase_changed(state, &change);
    NextRoundResponse::from(&change)
}

/// Start over with the configured default number of rounds.
pub async fn reset(state: &SharedState) -> ActionResponse {
    let round_total = state.config().default_round_total();
    let change = state.with_game_mut(|game| game.reset(round_total)).await;
    sse_events::broadcast_phase_changed(state, &change);
    ActionResponse { ok: true }
}
