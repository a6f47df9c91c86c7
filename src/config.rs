//! Application-level configuration loading: prompt catalog, phase timers and input limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use crate::state::{
    game::{
        DEFAULT_MAX_TEXT_LEN, DEFAULT_ROUND_TOTAL, GameSettings, MAX_ROUND_TOTAL, MIN_ROUND_TOTAL,
    },
    prompts::{PromptPool, default_prompts},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MAJORITY_RULES_CONFIG_PATH";
const DEFAULT_ANSWER_SECONDS: u32 = 45;
const DEFAULT_GUESS_SECONDS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    prompts: Vec<String>,
    answer_seconds: u32,
    guess_seconds: u32,
    default_round_total: u32,
    max_text_len: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        prompts = app_config.prompts.len(),
                        answer_seconds = app_config.answer_seconds,
                        guess_seconds = app_config.guess_seconds,
                        "loaded game configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Prompt catalog the game draws from.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Round total used when a start request does not name a valid one.
    pub fn default_round_total(&self) -> u32 {
        self.default_round_total
    }

    /// Timers and limits handed to the game core.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            answer_window: Duration::seconds(i64::from(self.answer_seconds)),
            guess_window: Duration::seconds(i64::from(self.guess_seconds)),
            max_text_len: self.max_text_len,
            default_round_total: self.default_round_total,
        }
    }

    /// Fresh prompt pool over the configured catalog.
    pub fn prompt_pool(&self) -> PromptPool {
        PromptPool::new(self.prompts.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prompts: default_prompts(),
            answer_seconds: DEFAULT_ANSWER_SECONDS,
            guess_seconds: DEFAULT_GUESS_SECONDS,
            default_round_total: DEFAULT_ROUND_TOTAL,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    prompts: Vec<String>,
    answer_seconds: Option<u32>,
    guess_seconds: Option<u32>,
    default_round_total: Option<u32>,
    max_text_len: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let prompts: Vec<String> = value
            .prompts
            .into_iter()
            .map(|prompt| prompt.trim().to_string())
            .filter(|prompt| !prompt.is_empty())
            .collect();

        Self {
            prompts: if prompts.is_empty() {
                defaults.prompts
            } else {
                prompts
            },
            answer_seconds: value
                .answer_seconds
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.answer_seconds),
            guess_seconds: value
                .guess_seconds
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.guess_seconds),
            default_round_total: value
                .default_round_total
                .map(|total| total.clamp(MIN_ROUND_TOTAL, MAX_ROUND_TOTAL))
                .unwrap_or(defaults.default_round_total),
            max_text_len: value
                .max_text_len
                .filter(|len| *len > 0)
                .unwrap_or(defaults.max_text_len),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::prompts::DEFAULT_PROMPTS;

    fn parse(json: &str) -> AppConfig {
        serde_json::from_str::<RawConfig>(json).unwrap().into()
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(parse("{}"), AppConfig::default());
        let settings = AppConfig::default().game_settings();
        assert_eq!(settings, GameSettings::default());
        assert_eq!(AppConfig::default().prompts().len(), DEFAULT_PROMPTS.len());
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse(
            r#"{"prompts": ["  a ___ ", "", "b ___"], "answer_seconds": 30,
                "guess_seconds": 10, "default_round_total": 5, "max_text_len": 40}"#,
        );

        assert_eq!(config.prompts(), &["a ___".to_string(), "b ___".to_string()]);
        let settings = config.game_settings();
        assert_eq!(settings.answer_window, Duration::seconds(30));
        assert_eq!(settings.guess_window, Duration::seconds(10));
        assert_eq!(settings.max_text_len, 40);
        assert_eq!(config.default_round_total(), 5);
        assert_eq!(config.prompt_pool().len(), 2);
    }

    #[test]
    fn out_of_range_values_are_tamed() {
        let config = parse(
            r#"{"prompts": ["   "], "answer_seconds": 0, "default_round_total": 50, "max_text_len": 0}"#,
        );

        assert_eq!(config.prompts().len(), DEFAULT_PROMPTS.len());
        assert_eq!(config.game_settings().answer_window, Duration::seconds(45));
        assert_eq!(config.default_round_total(), MAX_ROUND_TOTAL);
        assert_eq!(config.game_settings().max_text_len, DEFAULT_MAX_TEXT_LEN);
    }
}
