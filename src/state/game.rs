use std::{
    collections::HashMap,
    fmt,
};

use indexmap::IndexMap;
use rand::rngs::StdRng;
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::GameError,
    state::{
        clock::is_expired,
        prompts::PromptPool,
        scoring::{majority_answers, share_percent, tally_answers},
        state_machine::{GamePhase, GameStateMachine},
    },
};

/// Opaque player identifier handed out on join.
pub type PlayerId = Uuid;
/// Round number, starting at 1 once the first round is entered.
pub type RoundId = u32;
/// One accepted entry per player for a single round, in submission order.
pub type SubmissionSet = IndexMap<PlayerId, String>;

/// Smallest number of rounds a game can be configured with.
pub const MIN_ROUND_TOTAL: u32 = 1;
/// Largest number of rounds a game can be configured with.
pub const MAX_ROUND_TOTAL: u32 = 10;
/// Rounds per game when nothing else is configured.
pub const DEFAULT_ROUND_TOTAL: u32 = 3;
/// Default length cap for names, answers and guesses.
pub const DEFAULT_MAX_TEXT_LEN: usize = 80;

/// Timing and input limits applied by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// How long the answer phase runs.
    pub answer_window: Duration,
    /// How long the guess phase runs.
    pub guess_window: Duration,
    /// Maximum characters kept from names, answers and guesses.
    pub max_text_len: usize,
    /// Round total used when a start request does not provide a valid one.
    pub default_round_total: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            answer_window: Duration::seconds(45),
            guess_window: Duration::seconds(20),
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            default_round_total: DEFAULT_ROUND_TOTAL,
        }
    }
}

/// Player info tracked for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Identifier returned to the client on join.
    pub id: PlayerId,
    /// Sanitized display name.
    pub name: String,
    /// Cumulative score, only ever increased by round scoring.
    pub score: u32,
}

/// Which of the two per-round submission sets an entry goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    /// The player's own answer to the prompt.
    Answer,
    /// The player's guess at the majority answer.
    Guess,
}

impl SubmissionKind {
    /// Phase in which this kind of submission is accepted.
    pub fn accepted_in(self) -> GamePhase {
        match self {
            SubmissionKind::Answer => GamePhase::Answer,
            SubmissionKind::Guess => GamePhase::Guess,
        }
    }

    /// Request field carrying the submitted text.
    pub fn field(self) -> &'static str {
        match self {
            SubmissionKind::Answer => "answer",
            SubmissionKind::Guess => "guess",
        }
    }

    fn phase_rule(self) -> &'static str {
        match self {
            SubmissionKind::Answer => "answers only accepted in ANSWER phase",
            SubmissionKind::Guess => "guesses only accepted in GUESS phase",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Read-side view of the game used by polling clients.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStatus {
    /// Authoritative phase.
    pub phase: GamePhase,
    /// True when a timed phase is past its deadline.
    pub expired: bool,
    /// Current round, 0 before the first round.
    pub round_id: RoundId,
    /// Configured number of rounds.
    pub round_total: u32,
    /// Prompt of the current round.
    pub prompt: Option<String>,
    /// End of the current timed phase.
    pub deadline: Option<OffsetDateTime>,
    /// Number of registered players.
    pub player_count: usize,
    /// Answers accepted for the current round.
    pub answers_received: usize,
    /// Guesses accepted for the current round.
    pub guesses_received: usize,
    /// State machine version, bumped on every transition.
    pub version: usize,
}

/// One line of a round's answer breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerShare {
    /// Literal answer text.
    pub answer: String,
    /// How many players gave it.
    pub count: usize,
    /// Share of all answers, rounded to one decimal.
    pub pct: f64,
}

/// Released results of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResults {
    /// Round the results belong to.
    pub round_id: RoundId,
    /// Prompt of the round; only retained for the current round.
    pub prompt: Option<String>,
    /// Per-answer counts, most popular first.
    pub breakdown: Vec<AnswerShare>,
    /// Answers tied for the top count.
    pub majority_answers: Vec<String>,
    /// Number of answers submitted in the round.
    pub total_answers: usize,
}

/// Authoritative in-memory record of the game.
///
/// All mutation goes through `&mut self` methods; callers serialise access
/// (see [`crate::state::AppState`]), so every operation is atomic.
#[derive(Debug)]
pub struct GameState {
    pub(super) settings: GameSettings,
    pub(super) machine: GameStateMachine,
    pub(super) round_id: RoundId,
    pub(super) round_total: u32,
    pub(super) current_prompt: Option<String>,
    pub(super) phase_deadline: Option<OffsetDateTime>,
    pub(super) players: IndexMap<PlayerId, Player>,
    pub(super) answers_by_round: HashMap<RoundId, SubmissionSet>,
    pub(super) guesses_by_round: HashMap<RoundId, SubmissionSet>,
    pub(super) prompts: PromptPool,
    pub(super) rng: StdRng,
}

impl GameState {
    /// Fresh game in the lobby with no players.
    pub fn new(settings: GameSettings, prompts: PromptPool, rng: StdRng) -> Self {
        let round_total = settings.default_round_total;
        Self {
            settings,
            machine: GameStateMachine::new(),
            round_id: 0,
            round_total,
            current_prompt: None,
            phase_deadline: None,
            players: IndexMap::new(),
            answers_by_round: HashMap::new(),
            guesses_by_round: HashMap::new(),
            prompts,
            rng,
        }
    }

    /// Limits this game runs with.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current authoritative phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// State machine version.
    pub fn version(&self) -> usize {
        self.machine.version()
    }

    /// Current round, 0 before the first round.
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// Configured number of rounds.
    pub fn round_total(&self) -> u32 {
        self.round_total
    }

    /// Prompt of the current round.
    pub fn current_prompt(&self) -> Option<&str> {
        self.current_prompt.as_deref()
    }

    /// Deadline of the current timed phase.
    pub fn phase_deadline(&self) -> Option<OffsetDateTime> {
        self.phase_deadline
    }

    /// Prompts shown in the current prompt cycle.
    pub fn prompts_used(&self) -> &[String] {
        self.prompts.used()
    }

    /// Registered players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Look up a player.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Accepted answers for `round_id`, if that round has been entered.
    pub fn answers(&self, round_id: RoundId) -> Option<&SubmissionSet> {
        self.answers_by_round.get(&round_id)
    }

    /// Accepted guesses for `round_id`, if that round has been entered.
    pub fn guesses(&self, round_id: RoundId) -> Option<&SubmissionSet> {
        self.guesses_by_round.get(&round_id)
    }

    /// Register a new player under a sanitized display name.
    pub fn join(&mut self, name: &str) -> Result<Player, GameError> {
        let name = sanitize(name, self.settings.max_text_len);
        if name.is_empty() {
            return Err(GameError::EmptyInput { field: "name" });
        }

        let player = Player {
            id: Uuid::new_v4(),
            name,
            score: 0,
        };
        self.players.insert(player.id, player.clone());
        info!(player_id = %player.id, name = %player.name, "player joined");
        Ok(player)
    }

    /// Record a player's answer for the current round.
    pub fn submit_answer(
        &mut self,
        player_id: PlayerId,
        round_id: i64,
        text: &str,
    ) -> Result<RoundId, GameError> {
        self.submit(SubmissionKind::Answer, player_id, round_id, text)
    }

    /// Record a player's guess for the current round.
    pub fn submit_guess(
        &mut self,
        player_id: PlayerId,
        round_id: i64,
        text: &str,
    ) -> Result<RoundId, GameError> {
        self.submit(SubmissionKind::Guess, player_id, round_id, text)
    }

    /// Shared intake for answers and guesses. The first accepted entry per
    /// player and round wins; nothing is recorded on failure.
    pub fn submit(
        &mut self,
        kind: SubmissionKind,
        player_id: PlayerId,
        round_id: i64,
        text: &str,
    ) -> Result<RoundId, GameError> {
        let phase = self.phase();
        if phase != kind.accepted_in() {
            return Err(GameError::PhaseMismatch {
                reason: kind.phase_rule(),
                current: phase,
            });
        }

        if !self.players.contains_key(&player_id) {
            return Err(GameError::UnknownPlayer);
        }

        let current = self.round_id;
        if current < 1 || round_id != i64::from(current) {
            return Err(GameError::RoundMismatch {
                expected: current,
                got: round_id,
            });
        }

        let text = sanitize(text, self.settings.max_text_len);
        if text.is_empty() {
            return Err(GameError::EmptyInput { field: kind.field() });
        }

        let submissions = match kind {
            SubmissionKind::Answer => &mut self.answers_by_round,
            SubmissionKind::Guess => &mut self.guesses_by_round,
        }
        .entry(current)
        .or_default();

        if submissions.contains_key(&player_id) {
            return Err(GameError::DuplicateSubmission {
                kind,
                round_id: current,
            });
        }

        info!(%player_id, round_id = current, %kind, text = %text, "submission accepted");
        submissions.insert(player_id, text);
        Ok(current)
    }

    /// Snapshot for polling clients, with advisory expiry evaluated at `now`.
    pub fn status(&self, now: OffsetDateTime) -> GameStatus {
        let phase = self.phase();
        GameStatus {
            phase,
            expired: phase.is_timed() && is_expired(self.phase_deadline, now),
            round_id: self.round_id,
            round_total: self.round_total,
            prompt: self.current_prompt.clone(),
            deadline: self.phase_deadline,
            player_count: self.players.len(),
            answers_received: self.answers(self.round_id).map_or(0, IndexMap::len),
            guesses_received: self.guesses(self.round_id).map_or(0, IndexMap::len),
            version: self.version(),
        }
    }

    /// Breakdown of a round's answers once they may be released.
    pub fn results(&self, round_id: i64) -> Result<RoundResults, GameError> {
        if round_id < 1 || round_id > i64::from(self.round_id) {
            return Err(GameError::InvalidRound(round_id));
        }
        let round = self.round_id;
        let requested = RoundId::try_from(round_id).map_err(|_| GameError::InvalidRound(round_id))?;

        let phase = self.phase();
        if requested == round && phase.is_timed() {
            return Err(GameError::PhaseMismatch {
                reason: "results available only in RESULTS phase",
                current: phase,
            });
        }

        let empty = SubmissionSet::new();
        let answers = self.answers(requested).unwrap_or(&empty);
        let total_answers = answers.len();
        let tallies = tally_answers(answers);
        let majority_answers = majority_answers(&tallies);
        let breakdown = tallies
            .into_iter()
            .map(|tally| AnswerShare {
                pct: share_percent(tally.count, total_answers),
                answer: tally.answer,
                count: tally.count,
            })
            .collect();

        Ok(RoundResults {
            round_id: requested,
            prompt: (requested == round)
                .then(|| self.current_prompt.clone())
                .flatten(),
            breakdown,
            majority_answers,
            total_answers,
        })
    }

    /// Players by descending score, ties by ascending name.
    pub fn scoreboard(&self) -> Vec<Player> {
        let mut rows: Vec<Player> = self.players.values().cloned().collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}

/// Trim surrounding whitespace and keep at most `max_len` characters.
pub fn sanitize(input: &str, max_len: usize) -> String {
    input.trim().chars().take(max_len).collect()
}

/// Use `requested` when it is a valid round total, otherwise `default`.
pub fn normalize_round_total(requested: Option<i64>, default: u32) -> u32 {
    requested
        .and_then(|value| u32::try_from(value).ok())
        .filter(|value| (MIN_ROUND_TOTAL..=MAX_ROUND_TOTAL).contains(value))
        .unwrap_or(default)
}
