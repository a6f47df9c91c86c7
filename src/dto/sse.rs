use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{phase::VisiblePhase, public::ScoreboardEntry};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream.
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every phase transition and reset.
pub struct PhaseChangedEvent {
    pub phase: VisiblePhase,
    pub round_id: u32,
    pub round_total: u32,
    pub prompt: Option<String>,
    pub ends_at: Option<String>,
    pub version: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player registers.
pub struct PlayerJoinedEvent {
    pub player_id: Uuid,
    pub name: String,
    pub players_connected: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a round was scored, carrying the full scoreboard.
pub struct ScoresUpdatedEvent {
    pub round_id: u32,
    pub majority_answers: Vec<String>,
    pub scoreboard: Vec<ScoreboardEntry>,
}
