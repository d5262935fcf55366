//! The opening exchange: introduction text plus the question roster.

use crate::invoke::{CallOptions, request_fields};
use crate::prompts::PromptBuilder;
use intervue_core::collaborator::{PromptMessage, ReasoningCollaborator};
use intervue_core::config::InterviewSettings;
use intervue_core::schema::{self, InterviewPlan};
use intervue_core::session::{
    ConversationMessage, InterviewPhase, MessageRole, QuestionProgress, SessionStore,
};
use intervue_core::{IntervueError, Result};
use std::sync::Arc;
use tracing::info;

/// Result of a successful opening exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOpened {
    pub introduction_text: String,
    pub progress: QuestionProgress,
}

/// Asks the collaborator for an introduction and the interview questions.
///
/// Runs once per session, while the session is still in `UNKNOWN`.
pub struct OpeningExchange {
    store: Arc<SessionStore>,
    collaborator: Arc<dyn ReasoningCollaborator>,
    prompts: Arc<PromptBuilder>,
    options: CallOptions,
    question_count: usize,
}

impl OpeningExchange {
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
            question_count: settings.question_count,
        }
    }

    pub async fn run(&self, session_id: &str) -> Result<SessionOpened> {
        let handle = self
            .store
            .handle(session_id)
            .await
            .ok_or_else(|| IntervueError::session_not_found(session_id))?;
        let mut session = handle.lock().await;

        if session.phase() != InterviewPhase::Unknown || session.roster().is_populated() {
            return Err(IntervueError::InvalidPhase {
                expected: InterviewPhase::Unknown,
                actual: session.phase(),
            });
        }

        let mut messages: Vec<PromptMessage> =
            session.transcript().iter().map(PromptMessage::from).collect();
        messages.push(PromptMessage::new(
            MessageRole::User,
            self.prompts
                .opening_instruction(&session, self.question_count)?,
        ));

        let request = self.options.request(messages, schema::interview_plan_schema());
        let fields =
            request_fields(self.collaborator.as_ref(), request, self.options.timeout).await?;
        let plan = InterviewPlan::parse(fields)?;

        let mut next = session.clone();
        next.roster_mut().populate(plan.questions);
        next.append(ConversationMessage::assistant(plan.introduction_text.clone()));
        next.advance_phase(InterviewPhase::Intro)?;
        next.touch();
        *session = next;

        info!(
            target: "intervue::turn",
            session_id,
            phase = %session.phase(),
            cursor = session.roster().cursor(),
            total = session.roster().total(),
            "opening exchange completed"
        );

        Ok(SessionOpened {
            introduction_text: plan.introduction_text,
            progress: session.progress(),
        })
    }
}
