use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        format_timestamp,
        public::ScoreboardEntry,
        sse::{PhaseChangedEvent, PlayerJoinedEvent, ScoresUpdatedEvent, ServerEvent},
    },
    state::{
        SharedState,
        game::{Player, RoundId},
        scoring::RoundOutcome,
        transitions::PhaseChange,
    },
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_PLAYER_JOINED: &str = "player_joined";
const EVENT_SCORES_UPDATED: &str = "scores_updated";

/// Broadcast a gameplay phase change notification.
pub fn broadcast_phase_changed(state: &SharedState, change: &PhaseChange) {
    let payload = PhaseChangedEvent {
        phase: change.phase().into(),
        round_id: change.round_id,
        round_total: change.round_total,
        prompt: change.prompt.clone(),
        ends_at: change.deadline.map(format_timestamp),
        version: change.transition.version,
    };
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast that a new player registered.
pub fn broadcast_player_joined(state: &SharedState, player: &Player, players_connected: usize) {
    let payload = PlayerJoinedEvent {
        player_id: player.id,
        name: player.name.clone(),
        players_connected,
    };
    send_public_event(state, EVENT_PLAYER_JOINED, &payload);
}

/// Broadcast the scoreboard after a round was scored.
pub fn broadcast_scores_updated(
    state: &SharedState,
    round_id: RoundId,
    outcome: &RoundOutcome,
    scoreboard: Vec<Player>,
) {
    let payload = ScoresUpdatedEvent {
        round_id,
        majority_answers: outcome.majority_answers.clone(),
        scoreboard: scoreboard.into_iter().map(ScoreboardEntry::from).collect(),
    };
    send_public_event(state, EVENT_SCORES_UPDATED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
