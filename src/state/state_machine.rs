use std::fmt;

/// Phases a round moves through, in their fixed cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Players join; no round is running.
    Lobby,
    /// Players submit their own answer to the prompt.
    Answer,
    /// Players guess which answer the majority gave.
    Guess,
    /// Scores are applied and the breakdown is released.
    Results,
}

impl GamePhase {
    /// Cyclic order followed by [`GamePhase::next`].
    pub const CYCLE: [GamePhase; 4] = [
        GamePhase::Lobby,
        GamePhase::Answer,
        GamePhase::Guess,
        GamePhase::Results,
    ];

    /// Phase that follows `self` in the cycle (RESULTS wraps to LOBBY).
    pub fn next(self) -> Self {
        let index = Self::CYCLE
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    /// Whether the phase runs against a deadline.
    pub fn is_timed(self) -> bool {
        matches!(self, GamePhase::Answer | GamePhase::Guess)
    }

    /// Upper-case wire name of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Lobby => "LOBBY",
            GamePhase::Answer => "ANSWER",
            GamePhase::Guess => "GUESS",
            GamePhase::Results => "RESULTS",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Admin moves to the next phase of the cycle.
    Advance,
    /// Admin skips straight into the answer phase of the next round.
    NextRound,
    /// Admin starts over from the lobby.
    Reset,
}

/// Outcome of applying a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Phase before the event.
    pub from: GamePhase,
    /// Phase after the event.
    pub to: GamePhase,
    /// Event that caused the transition.
    pub event: GameEvent,
    /// Version number after the transition.
    pub version: usize,
}

/// State machine implementing the LOBBY → ANSWER → GUESS → RESULTS cycle.
///
/// Every event is accepted from every phase: the admin is trusted to drive the
/// game, so the machine only decides where an event lands.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::Lobby,
            version: 0,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised in the lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Apply an event and return the resulting transition.
    pub fn apply(&mut self, event: GameEvent) -> Transition {
        let from = self.phase;
        let to = match event {
            GameEvent::Advance => from.next(),
            GameEvent::NextRound => GamePhase::Answer,
            GameEvent::Reset => GamePhase::Lobby,
        };

        self.phase = to;
        self.version += 1;

        Transition {
            from,
            to,
            event,
            version: self.version,
        }
    }
}
