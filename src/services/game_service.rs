//! Player-facing operations: joining, polling, submitting and reading results.

use tracing::debug;
use uuid::Uuid;

use crate::{
    dto::public::{
        JoinRequest, JoinResponse, ResultsResponse, ScoreboardEntry, StateResponse,
        SubmissionAck, Submission,
    },
    error::GameError,
    services::sse_events,
    state::{
        SharedState,
        game::{PlayerId, SubmissionKind},
    },
};

/// Register a new player and announce them on the public stream.
pub async fn join(state: &SharedState, request: JoinRequest) -> Result<JoinResponse, GameError> {
    let (player, players_connected) = state
        .with_game_mut(|game| {
            let player = game.join(&request.name)?;
            Ok::<_, GameError>((player, game.players().count()))
        })
        .await?;

    sse_events::broadcast_player_joined(state, &player, players_connected);
    Ok(player.into())
}

/// Snapshot the game for polling clients.
pub async fn get_state(state: &SharedState) -> StateResponse {
    let now = state.now();
    let status = state.read_game(|game| game.status(now)).await;
    StateResponse::new(status, now)
}

/// Record an answer for the current round.
pub async fn submit_answer(
    state: &SharedState,
    submission: Submission,
) -> Result<SubmissionAck, GameError> {
    submit(state, SubmissionKind::Answer, submission).await
}

/// Record a guess for the current round.
pub async fn submit_guess(
    state: &SharedState,
    submission: Submission,
) -> Result<SubmissionAck, GameError> {
    submit(state, SubmissionKind::Guess, submission).await
}

async fn submit(
    state: &SharedState,
    kind: SubmissionKind,
    submission: Submission,
) -> Result<SubmissionAck, GameError> {
    let player_id = parse_player_id(&submission.player_id);
    let round_id = state
        .with_game_mut(|game| {
            // an id that is not even a UUID cannot be registered, but the phase
            // is still reported first
            let player_id = player_id.unwrap_or_else(Uuid::nil);
            game.submit(kind, player_id, submission.round_id, &submission.text)
        })
        .await?;
    Ok(SubmissionAck::accepted(round_id))
}

/// Answer breakdown for `round_id`.
pub async fn get_results(
    state: &SharedState,
    round_id: Option<i64>,
) -> Result<ResultsResponse, GameError> {
    let Some(round_id) = round_id else {
        return Err(GameError::MissingParam(vec!["round_id".into()]));
    };
    let results = state.read_game(|game| game.results(round_id)).await?;
    Ok(results.into())
}

/// Every player ordered by score.
pub async fn get_scoreboard(state: &SharedState) -> Vec<ScoreboardEntry> {
    state
        .read_game(|game| game.scoreboard())
        .await
        .into_iter()
        .map(ScoreboardEntry::from)
        .collect()
}

fn parse_player_id(raw: &str) -> Option<PlayerId> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(err) => {
            debug!(player_id = raw, error = %err, "unparsable player id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::{
        config::AppConfig,
        dto::phase::VisiblePhase,
        services::admin_service,
        state::{AppState, clock::ManualClock},
    };

    fn test_state() -> (SharedState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        (
            AppState::with_clock(AppConfig::default(), clock.clone(), 9),
            clock,
        )
    }

    async fn join_as(state: &SharedState, name: &str) -> JoinResponse {
        join(state, JoinRequest { name: name.into() }).await.unwrap()
    }

    fn submission(player: &JoinResponse, round_id: i64, text: &str) -> Submission {
        Submission {
            player_id: player.player_id.to_string(),
            round_id,
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn full_round_over_the_service_layer() {
        let (state, _) = test_state();
        let players = [
            join_as(&state, "P1").await,
            join_as(&state, "P2").await,
            join_as(&state, "P3").await,
        ];

        admin_service::advance_phase(&state).await;
        for (player, answer) in players.iter().zip(["cats", "dogs", "cats"]) {
            submit_answer(&state, submission(player, 1, answer))
                .await
                .unwrap();
        }
        admin_service::advance_phase(&state).await;
        for (player, guess) in players.iter().zip(["cats", "cats", "dogs"]) {
            submit_guess(&state, submission(player, 1, guess)).await.unwrap();
        }
        admin_service::advance_phase(&state).await;

        let results = get_results(&state, Some(1)).await.unwrap();
        assert_eq!(results.majority_answers, vec!["cats".to_string()]);
        assert_eq!(results.total_answers, 3);

        let board = get_scoreboard(&state).await;
        let rows: Vec<(&str, u32)> = board.iter().map(|e| (e.name.as_str(), e.score)).collect();
        assert_eq!(rows, vec![("P1", 3), ("P2", 3), ("P3", 1)]);
    }

    #[tokio::test]
    async fn state_reports_expired_after_deadline() {
        let (state, clock) = test_state();
        admin_service::advance_phase(&state).await;

        let snapshot = get_state(&state).await;
        assert_eq!(snapshot.phase, VisiblePhase::Answer);
        assert_eq!(snapshot.round_id, 1);
        assert_eq!(snapshot.ends_at.as_deref(), Some("1970-01-01T00:00:45Z"));

        clock.advance(Duration::seconds(46));
        let snapshot = get_state(&state).await;
        assert_eq!(snapshot.phase, VisiblePhase::Expired);
        assert_eq!(snapshot.server_now, "1970-01-01T00:00:46Z");
    }

    #[tokio::test]
    async fn garbage_player_ids_are_unknown() {
        let (state, _) = test_state();
        admin_service::advance_phase(&state).await;

        let err = submit_answer(
            &state,
            Submission {
                player_id: "not-a-uuid".into(),
                round_id: 1,
                text: "cats".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer);
    }

    #[tokio::test]
    async fn results_require_round_id() {
        let (state, _) = test_state();
        assert_eq!(
            get_results(&state, None).await.unwrap_err(),
            GameError::MissingParam(vec!["round_id".into()])
        );
    }

    #[tokio::test]
    async fn joins_are_announced() {
        let (state, _) = test_state();
        let mut events = state.public_sse().subscribe();

        let player = join_as(&state, "Ada").await;

        let event = events.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("player_joined"));
        assert!(event.data.contains(&player.player_id.to_string()));
    }
}
