//! Catalog of fill-in-the-blank prompts with no-repeat selection.

use rand::Rng;
use tracing::{debug, warn};

/// Built-in catalog used when the configuration does not supply one.
pub const DEFAULT_PROMPTS: &[&str] = &[
    "The real reason Thanos did it was ___",
    "What Dumbledore actually said in the mirror was ___",
    "The real villain in every Disney movie is ___",
    "What the One Ring whispered to you when you were alone: ___",
    "The real reason Barbie left Ken: ___",
    "What Walter White's second career should have been: ___",
    "The real plot twist in every M. Night Shyamalan movie: ___",
    "What the cast of Friends would be doing in 2025: ___",
    "The real reason Squid Game was so popular: ___",
    "What the dinosaurs in Jurassic Park were really thinking: ___",
    "The real reason Tony Stark built the suit: ___",
    "What Stranger Things would be called if it was honest: ___",
    "The real villain in every rom-com is ___",
    "What the Hogwarts sorting hat really wanted to say: ___",
    "The real reason everyone left the group chat: ___",
    "What the iceberg said to the Titanic: ___",
    "The real plot of every true crime documentary: ___",
    "What the cast of The Office would post on LinkedIn: ___",
    "The real reason the dinosaurs went extinct: ___",
    "What the yellow Minion is actually saying: ___",
];

/// Built-in catalog as owned strings.
pub fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|prompt| prompt.to_string()).collect()
}

/// Prompt catalog plus the prompts already shown in the current cycle.
#[derive(Debug, Clone)]
pub struct PromptPool {
    catalog: Vec<String>,
    used: Vec<String>,
}

impl PromptPool {
    /// Build a pool over `catalog`. An empty catalog is replaced by [`DEFAULT_PROMPTS`]
    /// so selection can always produce a prompt.
    pub fn new(catalog: Vec<String>) -> Self {
        let catalog = if catalog.is_empty() {
            warn!("empty prompt catalog supplied; using built-in prompts");
            default_prompts()
        } else {
            catalog
        };

        Self {
            catalog,
            used: Vec::new(),
        }
    }

    /// Number of prompts in the catalog.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Always false: the catalog is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Prompts shown since the pool last recycled, in selection order.
    pub fn used(&self) -> &[String] {
        &self.used
    }

    /// Forget every prompt shown so far.
    pub fn clear_used(&mut self) {
        self.used.clear();
    }

    /// Pick a prompt not shown in the current cycle, uniformly at random, and record it.
    ///
    /// Once every prompt has been shown the exclusion set is cleared and the whole
    /// catalog becomes eligible again.
    pub fn select<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        if self.catalog.iter().all(|prompt| self.used.contains(prompt)) {
            debug!(catalog = self.catalog.len(), "prompt pool exhausted; recycling");
            self.used.clear();
        }

        // catalog is non-empty, so after recycling at least one prompt is eligible
        let chosen = {
            let eligible = self.eligible();
            eligible[rng.random_range(0..eligible.len())].clone()
        };
        debug!(prompt = %chosen, used = self.used.len() + 1, "selected prompt");
        self.used.push(chosen.clone());
        chosen
    }

    fn eligible(&self) -> Vec<&String> {
        self.catalog
            .iter()
            .filter(|prompt| !self.used.contains(prompt))
            .collect()
    }
}

impl Default for PromptPool {
    fn default() -> Self {
        Self::new(default_prompts())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn pool(prompts: &[&str]) -> PromptPool {
        PromptPool::new(prompts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn never_repeats_within_a_cycle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = PromptPool::default();

        let picked: HashSet<String> = (0..pool.len()).map(|_| pool.select(&mut rng)).collect();
        assert_eq!(picked.len(), DEFAULT_PROMPTS.len());
        assert_eq!(pool.used().len(), DEFAULT_PROMPTS.len());
    }

    #[test]
    fn recycles_once_exhausted() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = pool(&["a ___", "b ___", "c ___"]);

        for _ in 0..3 {
            pool.select(&mut rng);
        }
        assert_eq!(pool.used().len(), 3);

        let fourth = pool.select(&mut rng);
        assert!(["a ___", "b ___", "c ___"].contains(&fourth.as_str()));
        assert_eq!(pool.used(), &[fourth]);
    }

    #[test]
    fn single_prompt_catalog_keeps_returning_it() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = pool(&["only ___"]);

        for _ in 0..5 {
            assert_eq!(pool.select(&mut rng), "only ___");
        }
    }

    #[test]
    fn empty_catalog_falls_back_to_defaults() {
        let pool = PromptPool::new(Vec::new());
        assert_eq!(pool.len(), DEFAULT_PROMPTS.len());
        assert!(!pool.is_empty());
    }

    #[test]
    fn clear_used_makes_everything_eligible() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = pool(&["a ___", "b ___"]);
        pool.select(&mut rng);
        pool.clear_used();
        assert!(pool.used().is_empty());
    }
}
