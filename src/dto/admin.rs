//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::{format_timestamp, phase::VisiblePhase},
    state::{game::RoundId, transitions::PhaseChange},
};

/// Optional body of `POST /api/admin/start`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartGameRequest {
    /// Rounds to play (1 to 10); anything else selects the configured default.
    pub round_total: Option<i64>,
}

/// Confirms a fresh game was set up.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartGameResponse {
    pub ok: bool,
    pub round_total: u32,
}

/// Phase entered by `POST /api/admin/next_phase`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvancePhaseResponse {
    pub ok: bool,
    pub phase: VisiblePhase,
    pub ends_at: Option<String>,
}

impl From<&PhaseChange> for AdvancePhaseResponse {
    fn from(change: &PhaseChange) -> Self {
        Self {
            ok: true,
            phase: change.phase().into(),
            ends_at: change.deadline.map(format_timestamp),
        }
    }
}

/// Round entered by `POST /api/admin/next_round`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NextRoundResponse {
    pub ok: bool,
    pub round_id: RoundId,
    pub round_total: u32,
    pub prompt: Option<String>,
    pub ends_at: Option<String>,
}

impl From<&PhaseChange> for NextRoundResponse {
    fn from(change: &PhaseChange) -> Self {
        Self {
            ok: true,
            round_id: change.round_id,
            round_total: change.round_total,
            prompt: change.prompt.clone(),
            ends_at: change.deadline.map(format_timestamp),
        }
    }
}

/// Bare acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub ok: bool,
}
