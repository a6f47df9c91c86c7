use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    dto::{format_timestamp, phase::VisiblePhase, validation::require},
    state::game::{AnswerShare, GameStatus, Player, RoundId, RoundResults},
};

/// Prompt reported for rounds whose prompt is no longer kept.
pub const PROMPT_NOT_STORED: &str = "(prompt not stored)";

/// Request to register a player.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct JoinRequest {
    /// Display name; trimmed and truncated by the server.
    #[serde(default)]
    pub name: String,
}

/// Identity handed back to a newly registered player.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinResponse {
    pub player_id: Uuid,
    pub name: String,
}

impl From<Player> for JoinResponse {
    fn from(player: Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name,
        }
    }
}

/// Polling snapshot of the game.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateResponse {
    pub phase: VisiblePhase,
    pub round_id: RoundId,
    pub round_total: u32,
    pub prompt: Option<String>,
    /// RFC 3339 deadline of the current timed phase.
    pub ends_at: Option<String>,
    pub players_connected: usize,
    pub answers_received: usize,
    pub guesses_received: usize,
    /// Server clock at the time of the snapshot, for countdown correction.
    pub server_now: String,
    /// Bumped on every phase transition.
    pub version: usize,
}

impl StateResponse {
    /// Render `status` as observed at `server_now`.
    pub fn new(status: GameStatus, server_now: OffsetDateTime) -> Self {
        Self {
            phase: VisiblePhase::from(&status),
            round_id: status.round_id,
            round_total: status.round_total,
            prompt: status.prompt,
            ends_at: status.deadline.map(format_timestamp),
            players_connected: status.player_count,
            answers_received: status.answers_received,
            guesses_received: status.guesses_received,
            server_now: format_timestamp(server_now),
            version: status.version,
        }
    }
}

/// A player's answer for the current round.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitAnswerRequest {
    pub player_id: Option<String>,
    pub round_id: Option<i64>,
    pub answer: Option<String>,
}

/// A player's guess at the majority answer for the current round.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitGuessRequest {
    pub player_id: Option<String>,
    pub round_id: Option<i64>,
    pub guess: Option<String>,
}

/// Answer or guess with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub player_id: String,
    pub round_id: i64,
    pub text: String,
}

impl Submission {
    fn collect(
        player_id: Option<String>,
        round_id: Option<i64>,
        text_field: &'static str,
        text: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let player_id = require(
            &mut errors,
            "player_id",
            player_id.filter(|id| !id.is_empty()),
        );
        let round_id = require(&mut errors, "round_id", round_id);
        let text = require(&mut errors, text_field, text);

        match (player_id, round_id, text) {
            (Some(player_id), Some(round_id), Some(text)) => Ok(Self {
                player_id,
                round_id,
                text,
            }),
            _ => Err(errors),
        }
    }
}

impl TryFrom<SubmitAnswerRequest> for Submission {
    type Error = ValidationErrors;

    fn try_from(value: SubmitAnswerRequest) -> Result<Self, Self::Error> {
        Self::collect(value.player_id, value.round_id, "answer", value.answer)
    }
}

impl TryFrom<SubmitGuessRequest> for Submission {
    type Error = ValidationErrors;

    fn try_from(value: SubmitGuessRequest) -> Result<Self, Self::Error> {
        Self::collect(value.player_id, value.round_id, "guess", value.guess)
    }
}

/// Acknowledgement of an accepted answer or guess.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionAck {
    pub ok: bool,
    pub round_id: RoundId,
}

impl SubmissionAck {
    /// Acknowledge a submission recorded for `round_id`.
    pub fn accepted(round_id: RoundId) -> Self {
        Self { ok: true, round_id }
    }
}

/// Query string of `GET /api/results`.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    pub round_id: Option<i64>,
}

/// One row of a results breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownEntry {
    pub answer: String,
    pub count: usize,
    /// Percentage of all answers, one decimal.
    pub pct: f64,
}

impl From<AnswerShare> for BreakdownEntry {
    fn from(share: AnswerShare) -> Self {
        Self {
            answer: share.answer,
            count: share.count,
            pct: share.pct,
        }
    }
}

/// Answer breakdown of a finished round.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsResponse {
    pub round_id: RoundId,
    pub prompt: String,
    pub breakdown: Vec<BreakdownEntry>,
    pub majority_answers: Vec<String>,
    pub total_answers: usize,
}

impl From<RoundResults> for ResultsResponse {
    fn from(results: RoundResults) -> Self {
        Self {
            round_id: results.round_id,
            prompt: results
                .prompt
                .unwrap_or_else(|| PROMPT_NOT_STORED.to_string()),
            breakdown: results.breakdown.into_iter().map(Into::into).collect(),
            majority_answers: results.majority_answers,
            total_answers: results.total_answers,
        }
    }
}

/// One scoreboard line.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreboardEntry {
    pub player_id: Uuid,
    pub name: String,
    pub score: u32,
}

impl From<Player> for ScoreboardEntry {
    fn from(player: Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name,
            score: player.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_names_all_missing_fields() {
        let errors = Submission::try_from(SubmitGuessRequest {
            player_id: Some(String::new()),
            round_id: None,
            guess: Some("cats".into()),
        })
        .unwrap_err();

        let fields = errors.field_errors();
        assert!(fields.contains_key("player_id"));
        assert!(fields.contains_key("round_id"));
        assert!(!fields.contains_key("guess"));
    }

    #[test]
    fn complete_submission_converts() {
        let submission = Submission::try_from(SubmitAnswerRequest {
            player_id: Some("abc".into()),
            round_id: Some(2),
            answer: Some(" cats ".into()),
        })
        .unwrap();

        assert_eq!(
            submission,
            Submission {
                player_id: "abc".into(),
                round_id: 2,
                text: " cats ".into(),
            }
        );
    }

    #[test]
    fn missing_prompt_is_reported_as_not_stored() {
        let response = ResultsResponse::from(RoundResults {
            round_id: 1,
            prompt: None,
            breakdown: Vec::new(),
            majority_answers: Vec::new(),
            total_answers: 0,
        });
        assert_eq!(response.prompt, PROMPT_NOT_STORED);
    }
}
