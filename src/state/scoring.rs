//! Pure scoring over one round's answers and guesses.
//!
//! Nothing here knows about phases, timers, or players beyond their identifiers,
//! so every function is reproducible from the two submission mappings alone.

use std::collections::{BTreeMap, HashMap};

use crate::state::game::{PlayerId, SubmissionSet};

/// Points for submitting any answer.
pub const PARTICIPATION_POINTS: u32 = 1;
/// Bonus for guessing one of the majority answers.
pub const MAJORITY_GUESS_POINTS: u32 = 2;

/// How many players gave one distinct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerTally {
    /// Literal answer text.
    pub answer: String,
    /// Number of players who submitted it.
    pub count: usize,
}

/// Majority answers plus the points each player earns for the round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Every answer tied for the highest count.
    pub majority_answers: Vec<String>,
    /// Points to add per player. Players earning nothing are absent.
    pub deltas: BTreeMap<PlayerId, u32>,
}

/// Group answers by exact text, most popular first, ties by ascending text.
pub fn tally_answers(answers: &SubmissionSet) -> Vec<AnswerTally> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for answer in answers.values() {
        *counts.entry(answer.as_str()).or_default() += 1;
    }

    let mut tallies: Vec<AnswerTally> = counts
        .into_iter()
        .map(|(answer, count)| AnswerTally {
            answer: answer.to_string(),
            count,
        })
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.answer.cmp(&b.answer)));
    tallies
}

/// Answers sharing the top count of an already sorted tally.
pub fn majority_answers(tallies: &[AnswerTally]) -> Vec<String> {
    let Some(top) = tallies.first().map(|tally| tally.count) else {
        return Vec::new();
    };

    tallies
        .iter()
        .take_while(|tally| tally.count == top)
        .map(|tally| tally.answer.clone())
        .collect()
}

/// Share of `count` in `total` as a percentage rounded to one decimal.
pub fn share_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = 100.0 * count as f64 / total as f64;
    (pct * 10.0).round() / 10.0
}

/// Score a round: +1 to every answerer, +2 to every guesser who named a majority answer.
///
/// A round without answers changes nothing, even for players who guessed.
pub fn score_round(answers: &SubmissionSet, guesses: &SubmissionSet) -> RoundOutcome {
    if answers.is_empty() {
        return RoundOutcome::default();
    }

    let majority = majority_answers(&tally_answers(answers));
    let mut deltas = BTreeMap::new();

    for player_id in answers.keys() {
        *deltas.entry(*player_id).or_insert(0) += PARTICIPATION_POINTS;
    }
    for (player_id, guess) in guesses {
        if majority.iter().any(|answer| answer == guess) {
            *deltas.entry(*player_id).or_insert(0) += MAJORITY_GUESS_POINTS;
        }
    }

    RoundOutcome {
        majority_answers: majority,
        deltas,
    }
}
