//! Configuration model.
//!
//! `InterviewSettings` is read from `config.toml`, credentials from
//! `secret.json`. Loading lives in `intervue-interaction`; this module only
//! defines the shapes and their defaults.

use crate::session::{DEFAULT_HEAD_KEEP, DEFAULT_MAX_ENTRIES, HistoryWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional technical interviewer. \
Conduct a structured mock interview: introduce yourself, check that the candidate is ready, \
ask the prepared questions one at a time, ask at most one follow-up per question, \
and close with a short warm-up conversation. Keep every reply concise and friendly.";

/// Tunables for the interview orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewSettings {
    pub history_max_entries: usize,
    pub history_head_keep: usize,
    pub collaborator_timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// How many questions the opening exchange asks for.
    pub question_count: usize,
    /// Consecutive follow-ups allowed per question; unset leaves it to the collaborator.
    pub max_followups_per_question: Option<u32>,
    /// Idle lifetime of a session; unset keeps sessions until deleted.
    pub session_ttl_secs: Option<u64>,
    pub system_prompt: String,
    pub log: LogSettings,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            history_max_entries: DEFAULT_MAX_ENTRIES,
            history_head_keep: DEFAULT_HEAD_KEEP,
            collaborator_timeout_secs: 40,
            temperature: 0.3,
            max_output_tokens: 500,
            question_count: 10,
            max_followups_per_question: None,
            session_ttl_secs: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            log: LogSettings::default(),
        }
    }
}

impl InterviewSettings {
    pub fn history_window(&self) -> HistoryWindow {
        HistoryWindow::new(self.history_max_entries, self.history_head_keep)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI-compatible endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    #[serde(default)]
    pub base_url: Option<String>,
}
