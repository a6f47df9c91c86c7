use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{game::GameStatus, state_machine::GamePhase};

/// Game phase as reported to polling clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisiblePhase {
    /// Waiting for the host to start a round.
    Lobby,
    /// Players are writing their answers.
    Answer,
    /// Players are guessing the majority answer.
    Guess,
    /// Round results are on screen.
    Results,
    /// A timed phase ran past its deadline and awaits the host.
    Expired,
}

impl From<GamePhase> for VisiblePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Lobby => VisiblePhase::Lobby,
            GamePhase::Answer => VisiblePhase::Answer,
            GamePhase::Guess => VisiblePhase::Guess,
            GamePhase::Results => VisiblePhase::Results,
        }
    }
}

impl From<&GameStatus> for VisiblePhase {
    fn from(status: &GameStatus) -> Self {
        if status.expired {
            VisiblePhase::Expired
        } else {
            status.phase.into()
        }
    }
}
