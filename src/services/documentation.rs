use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Majority Rules server.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::public::join,
        crate::routes::public::get_state,
        crate::routes::public::submit_answer,
        crate::routes::public::submit_guess,
        crate::routes::public::get_results,
        crate::routes::public::get_scoreboard,
        crate::routes::admin::start_game,
        crate::routes::admin::next_phase,
        crate::routes::admin::next_round,
        crate::routes::admin::reset,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisiblePhase,
            crate::dto::sse::Handshake,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::PlayerJoinedEvent,
            crate::dto::sse::ScoresUpdatedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Join, poll, answer, guess and read results"),
        (name = "admin", description = "Host controls driving the round cycle"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/sse/public",
            "/api/join",
            "/api/state",
            "/api/answer",
            "/api/guess",
            "/api/results",
            "/api/scoreboard",
            "/api/admin/start",
            "/api/admin/next_phase",
            "/api/admin/next_round",
            "/api/admin/reset",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
