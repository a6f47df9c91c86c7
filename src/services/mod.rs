/// Admin operations driving the round cycle.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Player-facing operations.
pub mod game_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
