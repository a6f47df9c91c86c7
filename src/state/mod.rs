pub mod clock;
pub mod game;
pub mod prompts;
pub mod scoring;
mod sse;
pub mod state_machine;
pub mod transitions;

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::config::AppConfig;

pub use self::sse::SseHub;
use self::{
    clock::{Clock, SystemClock},
    game::GameState,
};

/// Reference-counted handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Capacity of the public SSE broadcast channel.
const PUBLIC_SSE_CAPACITY: usize = 64;

/// Central application state: the game record, its time source and the event hub.
pub struct AppState {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    game: RwLock<GameState>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Self::build(config, Arc::new(SystemClock), StdRng::from_os_rng())
    }

    /// Same as [`AppState::new`] with an explicit clock and a deterministic random source.
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>, seed: u64) -> SharedState {
        Self::build(config, clock, StdRng::seed_from_u64(seed))
    }

    fn build(config: AppConfig, clock: Arc<dyn Clock>, rng: StdRng) -> SharedState {
        let game = GameState::new(config.game_settings(), config.prompt_pool(), rng);
        Arc::new(Self {
            config,
            clock,
            game: RwLock::new(game),
            sse: SseHub::new(PUBLIC_SSE_CAPACITY),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current time according to the installed clock.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Run a query against the game under the read lock.
    pub async fn read_game<T>(&self, f: impl FnOnce(&GameState) -> T) -> T {
        let game = self.game.read().await;
        f(&game)
    }

    /// Run a mutation against the game under the write lock, so it is atomic
    /// with respect to every other operation.
    pub async fn with_game_mut<T>(&self, f: impl FnOnce(&mut GameState) -> T) -> T {
        let mut game = self.game.write().await;
        f(&mut game)
    }
}
