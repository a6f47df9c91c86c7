//! Phase controller: applies admin events to the state machine and runs the
//! entry actions of the phase that was entered.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::state::{
    clock::deadline_after,
    game::{GameState, RoundId, SubmissionSet},
    scoring::{RoundOutcome, score_round},
    state_machine::{GameEvent, GamePhase, Transition},
};

/// Everything observable about a transition once its entry actions have run.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseChange {
    /// State machine transition that was applied.
    pub transition: Transition,
    /// Round after the transition.
    pub round_id: RoundId,
    /// Configured number of rounds.
    pub round_total: u32,
    /// Prompt after the transition.
    pub prompt: Option<String>,
    /// Deadline of the entered phase, if timed.
    pub deadline: Option<OffsetDateTime>,
    /// Scoring applied on entering RESULTS.
    pub outcome: Option<RoundOutcome>,
}

impl PhaseChange {
    /// Phase that was entered.
    pub fn phase(&self) -> GamePhase {
        self.transition.to
    }
}

impl GameState {
    /// Move to the next phase of the cycle, wrapping RESULTS back to LOBBY.
    pub fn advance(&mut self, now: OffsetDateTime) -> PhaseChange {
        let transition = self.machine.apply(GameEvent::Advance);
        let outcome = match transition.to {
            GamePhase::Answer => {
                self.enter_answer(now);
                None
            }
            GamePhase::Guess => {
                self.phase_deadline = Some(deadline_after(now, self.settings.guess_window));
                None
            }
            GamePhase::Results => {
                self.phase_deadline = None;
                self.score_current_round()
            }
            GamePhase::Lobby => {
                self.phase_deadline = None;
                None
            }
        };
        self.phase_change(transition, outcome)
    }

    /// Jump into the answer phase of the following round from any phase.
    ///
    /// The round counter saturates at the round total; re-entering the last
    /// round starts it over with empty submissions and a fresh prompt.
    pub fn next_round(&mut self, now: OffsetDateTime) -> PhaseChange {
        let transition = self.machine.apply(GameEvent::NextRound);
        self.round_id = (self.round_id + 1).min(self.round_total);
        self.begin_round(self.round_id);
        self.current_prompt = Some(self.prompts.select(&mut self.rng));
        self.phase_deadline = Some(deadline_after(now, self.settings.answer_window));
        self.phase_change(transition, None)
    }

    /// Throw the game away and return to the lobby with `round_total` rounds.
    ///
    /// Players, scores, submissions and prompt history are all discarded; only
    /// the settings, the random source and the state machine version survive.
    pub fn reset(&mut self, round_total: u32) -> PhaseChange {
        let transition = self.machine.apply(GameEvent::Reset);
        self.round_id = 0;
        self.round_total = round_total;
        self.current_prompt = None;
        self.phase_deadline = None;
        self.players.clear();
        self.answers_by_round = HashMap::new();
        self.guesses_by_round = HashMap::new();
        self.prompts.clear_used();
        info!(round_total, "game reset");
        self.phase_change(transition, None)
    }

    fn enter_answer(&mut self, now: OffsetDateTime) {
        self.phase_deadline = Some(deadline_after(now, self.settings.answer_window));
        if self.round_id == 0 {
            self.round_id = 1;
            self.begin_round(1);
        }
        if self.current_prompt.is_none() {
            self.current_prompt = Some(self.prompts.select(&mut self.rng));
        }
    }

    fn begin_round(&mut self, round_id: RoundId) {
        self.answers_by_round.insert(round_id, SubmissionSet::new());
        self.guesses_by_round.insert(round_id, SubmissionSet::new());
        debug!(round_id, "round submissions initialised");
    }

    /// Apply the current round's points. Every entry into RESULTS scores the
    /// round's submissions again, so cycling back through the same round
    /// without `next_round` awards its points twice.
    fn score_current_round(&mut self) -> Option<RoundOutcome> {
        let round_id = self.round_id;
        if round_id == 0 {
            return None;
        }

        let empty = SubmissionSet::new();
        let answers = self.answers_by_round.get(&round_id).unwrap_or(&empty);
        let guesses = self.guesses_by_round.get(&round_id).unwrap_or(&empty);
        let outcome = score_round(answers, guesses);

        for (player_id, delta) in &outcome.deltas {
            if let Some(player) = self.players.get_mut(player_id) {
                player.score += delta;
            }
        }
        info!(
            round_id,
            majority = ?outcome.majority_answers,
            scored_players = outcome.deltas.len(),
            "round scored"
        );
        Some(outcome)
    }

    fn phase_change(&self, transition: Transition, outcome: Option<RoundOutcome>) -> PhaseChange {
        info!(
            from = %transition.from,
            to = %transition.to,
            event = ?transition.event,
            round_id = self.round_id,
            version = transition.version,
            "phase transition"
        );
        PhaseChange {
            transition,
            round_id: self.round_id,
            round_total: self.round_total,
            prompt: self.current_prompt.clone(),
            deadline: self.phase_deadline,
            outcome,
        }
    }
}
