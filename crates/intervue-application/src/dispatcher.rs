//! One conversational turn of an interview.

use crate::invoke::{CallOptions, request_fields};
use crate::prompts::PromptBuilder;
use intervue_core::collaborator::{PromptMessage, ReasoningCollaborator};
use intervue_core::config::InterviewSettings;
use intervue_core::schema;
use intervue_core::session::{
    ConversationMessage, CursorMove, HistoryWindow, InterviewPhase, MessageRole, PhaseReply,
    QuestionProgress, Session, SessionStore, TurnContext, TurnPlan, plan_turn,
};
use intervue_core::{IntervueError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the candidate sees after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub reply_text: String,
    /// The question surfaced by this turn, if the cursor moved onto one.
    pub followup_question: Option<String>,
    pub phase: InterviewPhase,
    pub progress: QuestionProgress,
}

/// Runs answer submissions against the session store.
///
/// Each turn holds the session's lock from prompt construction until the
/// updated record is stored, including the collaborator call. A turn either
/// applies completely or leaves the record untouched.
pub struct ResponseDispatcher {
    store: Arc<SessionStore>,
    collaborator: Arc<dyn ReasoningCollaborator>,
    prompts: Arc<PromptBuilder>,
    window: HistoryWindow,
    options: CallOptions,
    followup_cap: Option<u32>,
}

impl ResponseDispatcher {
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
            window: settings.history_window(),
            options: CallOptions::from_settings(settings),
            followup_cap: settings.max_followups_per_question,
        }
    }

    pub async fn submit_answer(&self, session_id: &str, answer: &str) -> Result<TurnReply> {
        let handle = self
            .store
            .handle(session_id)
            .await
            .ok_or_else(|| IntervueError::session_not_found(session_id))?;
        let mut session = handle.lock().await;

        let phase = session.phase();
        let turn_schema = match phase {
            InterviewPhase::Completed => return Err(IntervueError::session_closed(session_id)),
            InterviewPhase::Unknown => return Err(IntervueError::session_not_started(session_id)),
            _ => schema::turn_schema(phase).ok_or_else(|| {
                IntervueError::internal(format!("no response schema for phase {phase}"))
            })?,
        };

        let mut messages: Vec<PromptMessage> = self
            .window
            .apply(session.transcript())
            .iter()
            .map(PromptMessage::from)
            .collect();
        messages.push(PromptMessage::new(
            MessageRole::User,
            self.prompts.turn_instruction(&session, answer)?,
        ));

        debug!(
            session_id,
            phase = %phase,
            prompt_entries = messages.len(),
            collaborator = self.collaborator.name(),
            "requesting turn"
        );

        let request = self.options.request(messages, turn_schema);
        let fields = request_fields(self.collaborator.as_ref(), request, self.options.timeout)
            .await
            .inspect_err(|err| warn!(session_id, phase = %phase, error = %err, "turn failed"))?;
        let reply = PhaseReply::parse(phase, fields)
            .inspect_err(|err| warn!(session_id, phase = %phase, error = %err, "turn rejected"))?;

        let roster = session.roster();
        let plan = plan_turn(
            &reply,
            TurnContext {
                progress: QuestionProgress {
                    current: roster.cursor(),
                    total: roster.total(),
                },
                followups: session.followups(),
                followup_cap: self.followup_cap,
            },
        );

        let (next, followup_question) = apply_turn(&session, answer, &reply, &plan)?;
        *session = next;

        info!(
            target: "intervue::turn",
            session_id,
            from = %phase,
            phase = %session.phase(),
            cursor = session.roster().cursor(),
            total = session.roster().total(),
            followups = session.followups(),
            "turn applied"
        );

        Ok(TurnReply {
            reply_text: reply.text().to_string(),
            followup_question,
            phase: session.phase(),
            progress: session.progress(),
        })
    }
}

/// Applies `plan` to a copy of `current`.
///
/// Transcript order: the candidate's entry, the reply text, then the surfaced
/// question if any.
fn apply_turn(
    current: &Session,
    answer: &str,
    reply: &PhaseReply,
    plan: &TurnPlan,
) -> Result<(Session, Option<String>)> {
    let mut next = current.clone();

    let user_entry = reply
        .answer_summary()
        .map(str::to_string)
        .unwrap_or_else(|| answer.trim().to_string());
    next.append(ConversationMessage::user(user_entry));
    next.append(ConversationMessage::assistant(reply.text()));

    match plan.cursor {
        CursorMove::Stay => {}
        CursorMove::Start => {
            next.roster_mut().seek(1);
        }
        CursorMove::Advance => {
            next.roster_mut().advance();
        }
    }
    next.set_followups(plan.followups);

    for phase in &plan.phase_path {
        next.advance_phase(*phase)?;
    }

    let followup_question = if plan.surface_question {
        next.roster().current_text().map(str::to_string)
    } else {
        None
    };
    if let Some(question) = &followup_question {
        next.append(ConversationMessage::assistant(question.clone()));
    }

    next.touch();
    Ok((next, followup_question))
}
