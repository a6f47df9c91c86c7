use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::state::{
    game::{RoundId, SubmissionKind},
    state_machine::GamePhase,
};

/// Failures the game core reports back to callers. Nothing is mutated when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A required text field was blank after trimming.
    #[error("{field} cannot be empty")]
    EmptyInput {
        /// Request field that was empty.
        field: &'static str,
    },
    /// The player id is not registered in the current game.
    #[error("unknown player_id")]
    UnknownPlayer,
    /// The operation is not allowed in the current phase.
    #[error("{reason}")]
    PhaseMismatch {
        /// Rule that was violated.
        reason: &'static str,
        /// Phase the game was in.
        current: GamePhase,
    },
    /// The submission targets a round other than the current one.
    #[error("invalid or mismatched round_id")]
    RoundMismatch {
        /// Current round.
        expected: RoundId,
        /// Round named in the request.
        got: i64,
    },
    /// The player already has an entry of this kind for the round.
    #[error("already submitted {kind} for this round")]
    DuplicateSubmission {
        /// Answer or guess.
        kind: SubmissionKind,
        /// Round the earlier entry belongs to.
        round_id: RoundId,
    },
    /// The requested round has not been played.
    #[error("invalid round_id")]
    InvalidRound(i64),
    /// Required request fields were absent.
    #[error("missing parameter(s)")]
    MissingParam(Vec<String>),
}

impl GameError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::EmptyInput { .. } => "empty_input",
            GameError::UnknownPlayer => "unknown_player",
            GameError::PhaseMismatch { .. } => "phase_mismatch",
            GameError::RoundMismatch { .. } => "round_mismatch",
            GameError::DuplicateSubmission { .. } => "duplicate_submission",
            GameError::InvalidRound(_) => "invalid_round",
            GameError::MissingParam(_) => "missing_param",
        }
    }

    /// Extra context shown to clients next to the message.
    pub fn details(&self) -> Option<String> {
        match self {
            GameError::PhaseMismatch { current, .. } => Some(format!("current phase: {current}")),
            GameError::RoundMismatch { expected, got } => {
                Some(format!("expected round_id {expected}, got {got}"))
            }
            GameError::DuplicateSubmission { round_id, .. } => {
                Some(format!("round_id {round_id}"))
            }
            GameError::InvalidRound(round_id) => Some(format!("round_id {round_id} not available")),
            GameError::MissingParam(fields) => Some(fields.join(", ")),
            GameError::EmptyInput { .. } | GameError::UnknownPlayer => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GameError::EmptyInput { .. } | GameError::MissingParam(_) => StatusCode::BAD_REQUEST,
            GameError::UnknownPlayer | GameError::InvalidRound(_) => StatusCode::NOT_FOUND,
            GameError::PhaseMismatch { .. }
            | GameError::RoundMismatch { .. }
            | GameError::DuplicateSubmission { .. } => StatusCode::CONFLICT,
        }
    }
}

impl From<ValidationErrors> for GameError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        GameError::MissingParam(fields)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected by the game core.
    #[error(transparent)]
    Game(#[from] GameError),
    /// Body or query string could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Body was not sent as JSON.
    #[error("expected a JSON body: {0}")]
    UnsupportedMediaType(String),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Game(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(inner) => {
                AppError::UnsupportedMediaType(inner.body_text())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Game(err) => err.kind(),
            AppError::BadRequest(_) => "bad_request",
            AppError::UnsupportedMediaType(_) => "unsupported_media_type",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Game(err) => err.status(),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Game(err) => err.details(),
            AppError::BadRequest(_) | AppError::UnsupportedMediaType(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let payload = Json(ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            details: self.details(),
        });

        (status, payload).into_response()
    }
}
