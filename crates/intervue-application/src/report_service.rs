//! Interview evaluation report.

use crate::invoke::{CallOptions, request_fields};
use crate::prompts::{PromptBuilder, REPORT_SYSTEM_PROMPT};
use intervue_core::collaborator::{PromptMessage, ReasoningCollaborator};
use intervue_core::config::InterviewSettings;
use intervue_core::report::InterviewReport;
use intervue_core::schema;
use intervue_core::session::{InterviewPhase, MessageRole, SessionStore};
use intervue_core::{IntervueError, Result};
use std::sync::Arc;
use tracing::info;

/// Produces an evaluation once the technical part of an interview is over.
///
/// Reads a snapshot of the session; the stored record is never changed.
/// The whole transcript is evaluated, without the turn-prompt window.
pub struct ReportGenerator {
    store: Arc<SessionStore>,
    collaborator: Arc<dyn ReasoningCollaborator>,
    prompts: Arc<PromptBuilder>,
    options: CallOptions,
}

impl ReportGenerator {
    pub fn new(
        store: Arc<SessionStore>,
        collaborator: Arc<dyn ReasoningCollaborator>,
        prompts: Arc<PromptBuilder>,
        settings: &InterviewSettings,
    ) -> Self {
        Self {
            store,
            collaborator,
            prompts,
            options: CallOptions::from_settings(settings),
        }
    }

    pub async fn generate(&self, session_id: &str) -> Result<InterviewReport> {
        let session = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| IntervueError::session_not_found(session_id))?;

        if session.phase() < InterviewPhase::Warmup {
            return Err(IntervueError::InvalidPhase {
                expected: InterviewPhase::Warmup,
                actual: session.phase(),
            });
        }

        let messages = vec![
            PromptMessage::new(MessageRole::System, REPORT_SYSTEM_PROMPT),
            PromptMessage::new(
                MessageRole::User,
                self.prompts.report_instruction(&session, session.transcript())?,
            ),
        ];

        let request = self
            .options
            .request(messages, schema::interview_report_schema());
        let fields =
            request_fields(self.collaborator.as_ref(), request, self.options.timeout).await?;
        let report = InterviewReport::parse(fields)?;

        info!(
            session_id,
            passed = report.passed,
            overall_score = report.overall_score,
            "interview report generated"
        );
        Ok(report)
    }
}
