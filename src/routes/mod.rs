use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod docs;
pub mod extract;
pub mod health;
pub mod public;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(sse::router())
        .merge(public::router())
        .merge(admin::router())
        .merge(docs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, clock::ManualClock},
    };

    struct TestApp {
        router: Router<()>,
        clock: Arc<ManualClock>,
    }

    impl TestApp {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
            let state = AppState::with_clock(AppConfig::default(), clock.clone(), 17);
            Self {
                router: router(state),
                clock,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.send(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn admin(&self, action: &str) -> Value {
            let (status, body) = self
                .send(
                    Request::post(format!("/api/admin/{action}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "admin {action}: {body}");
            body
        }

        async fn join(&self, name: &str) -> String {
            let (status, body) = self.post("/api/join", json!({ "name": name })).await;
            assert_eq!(status, StatusCode::OK);
            body["player_id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let app = TestApp::new();
        let (status, body) = app.get("/healthcheck").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn initial_state_is_lobby() {
        let app = TestApp::new();
        let (status, body) = app.get("/api/state").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "LOBBY");
        assert_eq!(body["round_id"], 0);
        assert_eq!(body["round_total"], 3);
        assert_eq!(body["prompt"], Value::Null);
        assert_eq!(body["ends_at"], Value::Null);
        assert_eq!(body["players_connected"], 0);
        assert_eq!(body["server_now"], "1970-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn full_game_round_trip() {
        let app = TestApp::new();
        let start = app
            .send(
                Request::post("/api/admin/start")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"round_total": 2}"#))
                    .unwrap(),
            )
            .await;
        assert_eq!(start.1, json!({ "ok": true, "round_total": 2 }));

        let ids = [
            app.join("P1").await,
            app.join("P2").await,
            app.join("P3").await,
        ];

        let answer = app.admin("next_phase").await;
        assert_eq!(answer["phase"], "ANSWER");
        assert_eq!(answer["ends_at"], "1970-01-01T00:00:45Z");

        for (id, text) in ids.iter().zip(["cats", "dogs", "cats"]) {
            let (status, body) = app
                .post(
                    "/api/answer",
                    json!({ "player_id": id, "round_id": 1, "answer": text }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "ok": true, "round_id": 1 }));
        }

        let (status, body) = app.get("/api/results?round_id=1").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "phase_mismatch");

        app.admin("next_phase").await;
        for (id, text) in ids.iter().zip(["cats", "cats", "dogs"]) {
            let (status, _) = app
                .post(
                    "/api/guess",
                    json!({ "player_id": id, "round_id": 1, "guess": text }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, state) = app.get("/api/state").await;
        assert_eq!(state["answers_received"], 3);
        assert_eq!(state["guesses_received"], 3);

        let results = app.admin("next_phase").await;
        assert_eq!(results["phase"], "RESULTS");

        let (status, body) = app.get("/api/results?round_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_answers"], 3);
        assert_eq!(body["majority_answers"], json!(["cats"]));
        assert_eq!(
            body["breakdown"],
            json!([
                { "answer": "cats", "count": 2, "pct": 66.7 },
                { "answer": "dogs", "count": 1, "pct": 33.3 },
            ])
        );

        let (_, board) = app.get("/api/scoreboard").await;
        let scores: Vec<(String, u64)> = board
            .as_array()
            .unwrap()
            .iter()
            .map(|row| {
                (
                    row["name"].as_str().unwrap().to_string(),
                    row["score"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            scores,
            vec![
                ("P1".to_string(), 3u64),
                ("P2".to_string(), 3),
                ("P3".to_string(), 1),
            ]
        );

        let next = app.admin("next_round").await;
        assert_eq!(next["round_id"], 2);
        assert_eq!(next["round_total"], 2);
        assert!(next["prompt"].is_string());

        let (_, old) = app.get("/api/results?round_id=1").await;
        assert_eq!(old["prompt"], "(prompt not stored)");
    }

    #[tokio::test]
    async fn submissions_are_validated() {
        let app = TestApp::new();
        let id = app.join("Ada").await;

        let (status, body) = app
            .post("/api/answer", json!({ "player_id": id, "round_id": 1, "answer": "x" }))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "phase_mismatch");
        assert_eq!(body["details"], "current phase: LOBBY");

        app.admin("next_phase").await;

        let (status, body) = app.post("/api/answer", json!({ "answer": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "missing_param");
        assert_eq!(body["details"], "player_id, round_id");

        let (status, body) = app
            .post(
                "/api/answer",
                json!({ "player_id": "nobody", "round_id": 1, "answer": "x" }),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "unknown_player");

        let (status, body) = app
            .post("/api/answer", json!({ "player_id": id, "round_id": 7, "answer": "x" }))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "round_mismatch");

        let (status, body) = app
            .post("/api/answer", json!({ "player_id": id, "round_id": 1, "answer": "   " }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "empty_input");

        let (status, _) = app
            .post("/api/answer", json!({ "player_id": id, "round_id": 1, "answer": "x" }))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .post("/api/answer", json!({ "player_id": id, "round_id": 1, "answer": "y" }))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "duplicate_submission");
    }

    #[tokio::test]
    async fn join_rejects_blank_names_and_non_json() {
        let app = TestApp::new();

        let (status, body) = app.post("/api/join", json!({ "name": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "empty_input");

        let (status, body) = app
            .send(
                Request::post("/api/join")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("name=Ada"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["kind"], "unsupported_media_type");

        let (status, body) = app
            .send(
                Request::post("/api/join")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");
    }

    #[tokio::test]
    async fn json_body_without_content_type_is_accepted() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Request::post("/api/join")
                    .body(Body::from(r#"{"name": "Ada"}"#))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ada");

        let (status, body) = app
            .send(
                Request::post("/api/join")
                    .body(Body::from("name=Ada"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "bad_request");
    }

    #[tokio::test]
    async fn results_query_is_validated() {
        let app = TestApp::new();

        let (status, body) = app.get("/api/results").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "missing_param");

        let (status, body) = app.get("/api/results?round_id=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "invalid_round");

        let (status, _) = app.get("/api/results?round_id=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn state_turns_expired_without_auto_advance() {
        let app = TestApp::new();
        app.admin("next_phase").await;

        app.clock.advance(Duration::seconds(45));
        let (_, body) = app.get("/api/state").await;
        assert_eq!(body["phase"], "EXPIRED");

        let guess = app.admin("next_phase").await;
        assert_eq!(guess["phase"], "GUESS");
    }

    #[tokio::test]
    async fn malformed_start_body_uses_default_rounds() {
        let app = TestApp::new();
        let (status, body) = app
            .send(
                Request::post("/api/admin/start")
                    .body(Body::from("round_total=banana"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["round_total"], 3);

        let reset = app.admin("reset").await;
        assert_eq!(reset, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = TestApp::new();
        let (status, body) = app.get("/api-doc/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/join"].is_object());
    }
}
