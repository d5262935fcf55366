//! Interview phases and the per-phase dispatch table.
//!
//! `PhaseReply` is the typed form of the structured fields the collaborator
//! returns for a phase, and [`plan_turn`] maps a reply onto a declarative
//! [`TurnPlan`]. The dispatcher applies plans uniformly; no other code
//! branches on phase-specific reply fields.

use super::roster::QuestionProgress;
use crate::error::{IntervueError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// A discrete stage of the interview conversation.
///
/// Declaration order is the progression order, so the derived `Ord` is the
/// monotonic order phases move through.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewPhase {
    /// Created, opening exchange not yet run.
    Unknown,
    Intro,
    Readiness,
    Interview,
    Warmup,
    /// Terminal; no further answers are accepted.
    Completed,
}

impl InterviewPhase {
    /// The phase that directly follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Unknown => Some(Self::Intro),
            Self::Intro => Some(Self::Readiness),
            Self::Readiness => Some(Self::Interview),
            Self::Interview => Some(Self::Warmup),
            Self::Warmup => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Whether answers are dispatched through the phase table in this phase.
    pub fn accepts_answers(self) -> bool {
        !matches!(self, Self::Unknown | Self::Completed)
    }
}

/// Candidate readiness as classified by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Readiness {
    Ready,
    NotReady,
    Uncertain,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroReply {
    pub text: String,
    pub next_stage: bool,
    #[serde(default)]
    pub answer_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReply {
    pub text: String,
    pub readiness: Readiness,
    pub next_stage: bool,
    #[serde(default)]
    pub answer_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewReply {
    pub text: String,
    pub followup_needed: bool,
    pub next_question: bool,
    pub next_stage: bool,
    #[serde(default)]
    pub answer_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmupReply {
    pub text: String,
    pub followup_needed: bool,
    pub complete_interview: bool,
    #[serde(default)]
    pub answer_summary: Option<String>,
}

/// Structured reply for one conversational turn, tagged by phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseReply {
    Intro(IntroReply),
    Readiness(ReadinessReply),
    Interview(InterviewReply),
    Warmup(WarmupReply),
}

impl PhaseReply {
    /// Parses collaborator fields according to the contract of `phase`.
    pub fn parse(phase: InterviewPhase, fields: Value) -> Result<Self> {
        let schema = crate::schema::turn_schema_name(phase)
            .ok_or_else(|| IntervueError::internal(format!("phase {phase} has no reply contract")))?;

        fn decode<T: DeserializeOwned>(schema: &str, fields: Value) -> Result<T> {
            serde_json::from_value(fields).map_err(|e| IntervueError::malformed(schema, e.to_string()))
        }

        let reply = match phase {
            InterviewPhase::Intro => Self::Intro(decode(schema, fields)?),
            InterviewPhase::Readiness => Self::Readiness(decode(schema, fields)?),
            InterviewPhase::Interview => Self::Interview(decode(schema, fields)?),
            InterviewPhase::Warmup => Self::Warmup(decode(schema, fields)?),
            InterviewPhase::Unknown | InterviewPhase::Completed => {
                return Err(IntervueError::internal(format!(
                    "phase {phase} has no reply contract"
                )));
            }
        };

        if reply.text().trim().is_empty() {
            return Err(IntervueError::malformed(schema, "field `text` is empty"));
        }
        Ok(reply)
    }

    pub fn phase(&self) -> InterviewPhase {
        match self {
            Self::Intro(_) => InterviewPhase::Intro,
            Self::Readiness(_) => InterviewPhase::Readiness,
            Self::Interview(_) => InterviewPhase::Interview,
            Self::Warmup(_) => InterviewPhase::Warmup,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Intro(r) => &r.text,
            Self::Readiness(r) => &r.text,
            Self::Interview(r) => &r.text,
            Self::Warmup(r) => &r.text,
        }
    }

    pub fn answer_summary(&self) -> Option<&str> {
        let summary = match self {
            Self::Intro(r) => r.answer_summary.as_deref(),
            Self::Readiness(r) => r.answer_summary.as_deref(),
            Self::Interview(r) => r.answer_summary.as_deref(),
            Self::Warmup(r) => r.answer_summary.as_deref(),
        };
        summary.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// How the question cursor moves during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Stay,
    /// Jump to the first question.
    Start,
    /// Move to the next question.
    Advance,
}

/// Counters the dispatch table needs besides the reply itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnContext {
    pub progress: QuestionProgress,
    /// Consecutive follow-ups already asked on the current question.
    pub followups: u32,
    /// Upper bound on consecutive follow-ups; `None` leaves it to the collaborator.
    pub followup_cap: Option<u32>,
}

/// Declarative outcome of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    /// Phases entered during this turn, in order. Empty means stay.
    pub phase_path: Vec<InterviewPhase>,
    pub cursor: CursorMove,
    /// Whether the (new) current question text is appended to the reply.
    pub surface_question: bool,
    /// Follow-up counter after the turn.
    pub followups: u32,
}

impl TurnPlan {
    fn stay(followups: u32) -> Self {
        Self {
            phase_path: Vec::new(),
            cursor: CursorMove::Stay,
            surface_question: false,
            followups,
        }
    }

    fn enter(phase: InterviewPhase) -> Self {
        Self {
            phase_path: vec![phase],
            cursor: CursorMove::Stay,
            surface_question: false,
            followups: 0,
        }
    }

    /// Moves onto a question at `new_cursor`; runs into WARMUP once the roster is exhausted.
    fn move_cursor(mut self, cursor: CursorMove, new_cursor: usize, total: usize) -> Self {
        self.cursor = cursor;
        self.followups = 0;
        if new_cursor > total {
            self.phase_path.push(InterviewPhase::Warmup);
            self.surface_question = false;
        } else {
            self.surface_question = true;
        }
        self
    }

    /// Final phase after the turn, given the phase it started in.
    pub fn final_phase(&self, start: InterviewPhase) -> InterviewPhase {
        self.phase_path.last().copied().unwrap_or(start)
    }
}

/// The phase dispatch table.
///
/// | Phase | Reply | Outcome |
/// |---|---|---|
/// | INTRO | `nextStage` | READINESS |
/// | READINESS | `nextStage` | INTERVIEW, cursor = 1, surface question 1 |
/// | INTERVIEW | `nextStage` | WARMUP |
/// | INTERVIEW | `followupNeeded` | stay (unless the follow-up cap is reached) |
/// | INTERVIEW | `nextQuestion` | cursor + 1, WARMUP when past the last question |
/// | WARMUP | `completeInterview` | COMPLETED |
///
/// Anything else stays in place and only returns the reply text.
pub fn plan_turn(reply: &PhaseReply, ctx: TurnContext) -> TurnPlan {
    let total = ctx.progress.total;
    match reply {
        PhaseReply::Intro(r) if r.next_stage => TurnPlan::enter(InterviewPhase::Readiness),
        PhaseReply::Intro(_) => TurnPlan::stay(ctx.followups),

        PhaseReply::Readiness(r) if r.next_stage => {
            TurnPlan::enter(InterviewPhase::Interview).move_cursor(CursorMove::Start, 1, total)
        }
        PhaseReply::Readiness(_) => TurnPlan::stay(ctx.followups),

        PhaseReply::Interview(r) if r.next_stage => TurnPlan::enter(InterviewPhase::Warmup),
        PhaseReply::Interview(r)
            if r.followup_needed && ctx.followup_cap.is_none_or(|cap| ctx.followups < cap) =>
        {
            TurnPlan::stay(ctx.followups + 1)
        }
        PhaseReply::Interview(r) if r.next_question || r.followup_needed => TurnPlan::stay(0)
            .move_cursor(CursorMove::Advance, ctx.progress.current + 1, total),
        PhaseReply::Interview(_) => TurnPlan::stay(ctx.followups),

        PhaseReply::Warmup(r) if r.complete_interview => TurnPlan::enter(InterviewPhase::Completed),
        PhaseReply::Warmup(_) => TurnPlan::stay(ctx.followups),
    }
}
