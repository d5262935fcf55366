//! Session domain model.
//!
//! This module contains the `Session` record that holds the full state of one
//! candidate's interview run.

use super::message::ConversationMessage;
use super::phase::InterviewPhase;
use super::roster::{QuestionProgress, QuestionRoster};
use crate::error::{IntervueError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initial values for a new session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    pub phase: Option<InterviewPhase>,
    pub system_prompt: String,
    /// Job description data, passed through into prompts.
    pub jd_context: Option<Value>,
    /// Candidate resume data, passed through into prompts.
    pub cv_context: Option<Value>,
}

impl SessionConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_jd_context(mut self, jd_context: Value) -> Self {
        self.jd_context = Some(jd_context);
        self
    }

    pub fn with_cv_context(mut self, cv_context: Value) -> Self {
        self.cv_context = Some(cv_context);
        self
    }
}

/// The state of one interview run.
///
/// The transcript is append-only and always starts with the system prompt.
/// The phase only moves forward, one step at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique token (short hex)
    pub id: String,
    phase: InterviewPhase,
    system_prompt: String,
    pub jd_context: Option<Value>,
    pub cv_context: Option<Value>,
    roster: QuestionRoster,
    transcript: Vec<ConversationMessage>,
    /// Consecutive follow-ups asked on the current question
    followups: u32,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, config: SessionConfig) -> Self {
        let now = Utc::now();
        let transcript = vec![ConversationMessage::system(config.system_prompt.clone())];
        Self {
            id,
            phase: config.phase.unwrap_or(InterviewPhase::Unknown),
            system_prompt: config.system_prompt,
            jd_context: config.jd_context,
            cv_context: config.cv_context,
            roster: QuestionRoster::new(),
            transcript,
            followups: 0,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn roster(&self) -> &QuestionRoster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut QuestionRoster {
        &mut self.roster
    }

    pub fn transcript(&self) -> &[ConversationMessage] {
        &self.transcript
    }

    pub fn progress(&self) -> QuestionProgress {
        self.roster.progress()
    }

    pub fn followups(&self) -> u32 {
        self.followups
    }

    pub fn set_followups(&mut self, followups: u32) {
        self.followups = followups;
    }

    pub fn append(&mut self, message: ConversationMessage) {
        self.transcript.push(message);
    }

    /// Moves to `to`, which must be the phase directly after the current one.
    pub fn advance_phase(&mut self, to: InterviewPhase) -> Result<()> {
        if self.phase.next() != Some(to) {
            return Err(IntervueError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
