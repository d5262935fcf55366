//! Interview use case implementation.
//!
//! `InterviewUseCase` is the session lifecycle API consumed by an outer
//! surface (HTTP handlers, CLI). It owns the store and wires the opening
//! exchange, the turn dispatcher and the report generator to one
//! collaborator.

use crate::dispatcher::{ResponseDispatcher, TurnReply};
use crate::opening::OpeningExchange;
use crate::prompts::PromptBuilder;
use crate::report_service::ReportGenerator;
use intervue_core::Result;
use intervue_core::collaborator::ReasoningCollaborator;
use intervue_core::config::InterviewSettings;
use intervue_core::report::InterviewReport;
use intervue_core::session::{QuestionProgress, Session, SessionConfig, SessionStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Context supplied when an interview starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewContext {
    /// Overrides the configured system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub jd_context: Option<Value>,
    #[serde(default)]
    pub cv_context: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    pub session_id: String,
    pub opening_reply_text: String,
    pub progress: QuestionProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionEnded {
    pub deleted: bool,
}

/// Use case for running mock interviews.
///
/// # Responsibilities
///
/// - Creating sessions and running their opening exchange
/// - Dispatching submitted answers
/// - Ending sessions (idempotent)
/// - Generating the evaluation report
/// - Purging idle sessions when a TTL is configured
pub struct InterviewUseCase {
    store: Arc<SessionStore>,
    opening: OpeningExchange,
    dispatcher: ResponseDispatcher,
    reports: ReportGenerator,
    settings: InterviewSettings,
}

impl InterviewUseCase {
    pub fn new(
        store: Arc<SessionStore>,
        collaborator: Arc<dyn ReasoningCollaborator>,
        settings: InterviewSettings,
    ) -> Result<Self> {
        let prompts = Arc::new(PromptBuilder::new()?);
        Ok(Self {
            opening: OpeningExchange::new(
                store.clone(),
                collaborator.clone(),
                prompts.clone(),
                &settings,
            ),
            dispatcher: ResponseDispatcher::new(
                store.clone(),
                collaborator.clone(),
                prompts.clone(),
                &settings,
            ),
            reports: ReportGenerator::new(store.clone(), collaborator, prompts, &settings),
            store,
            settings,
        })
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Creates a session and runs its opening exchange.
    ///
    /// If the opening exchange fails the session is removed again, so a
    /// failed start leaves nothing behind.
    pub async fn start_session(&self, context: InterviewContext) -> Result<SessionStarted> {
        let system_prompt = context
            .system_prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| self.settings.system_prompt.clone());

        let mut config = SessionConfig::new(system_prompt);
        if let Some(jd) = context.jd_context {
            config = config.with_jd_context(jd);
        }
        if let Some(cv) = context.cv_context {
            config = config.with_cv_context(cv);
        }

        let session_id = self.store.create(config).await;
        match self.opening.run(&session_id).await {
            Ok(opened) => {
                info!(session_id = %session_id, total = opened.progress.total, "session started");
                Ok(SessionStarted {
                    session_id,
                    opening_reply_text: opened.introduction_text,
                    progress: opened.progress,
                })
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "opening exchange failed");
                self.store.delete(&session_id).await;
                Err(err)
            }
        }
    }

    pub async fn submit_answer(&self, session_id: &str, answer: &str) -> Result<TurnReply> {
        self.dispatcher.submit_answer(session_id, answer).await
    }

    /// Deletes the session. Ending an unknown or already-ended session is
    /// not an error.
    pub async fn end_session(&self, session_id: &str) -> SessionEnded {
        let deleted = self.store.delete(session_id).await;
        info!(session_id, deleted, "session ended");
        SessionEnded { deleted }
    }

    pub async fn generate_report(&self, session_id: &str) -> Result<InterviewReport> {
        self.reports.generate(session_id).await
    }

    /// Read-only copy of the session record.
    pub async fn session_snapshot(&self, session_id: &str) -> Option<Session> {
        self.store.get(session_id).await
    }

    /// Evicts sessions idle longer than the configured TTL.
    ///
    /// Returns the number of evicted sessions; always 0 when no TTL is set.
    pub async fn purge_expired(&self) -> usize {
        match self.settings.session_ttl() {
            Some(ttl) => self.store.evict_idle(ttl).await,
            None => 0,
        }
    }
}
