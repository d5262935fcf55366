//! Session domain module.
//!
//! This module contains the interview session record and everything that
//! governs how it changes.
//!
//! # Module Structure
//!
//! - `model`: Session record (`Session`, `SessionConfig`)
//! - `message`: Transcript entry types (`MessageRole`, `ConversationMessage`)
//! - `phase`: Phase state machine and dispatch table (`InterviewPhase`, `plan_turn`)
//! - `roster`: Question roster and cursor (`QuestionRoster`)
//! - `history`: Transcript windowing for prompts (`window`)
//! - `store`: Keyed session registry (`SessionStore`)

mod history;
mod message;
mod model;
mod phase;
mod roster;
mod store;

// Re-export public API
pub use history::{DEFAULT_HEAD_KEEP, DEFAULT_MAX_ENTRIES, HistoryWindow, window};
pub use message::{ConversationMessage, MessageRole};
pub use model::{Session, SessionConfig};
pub use phase::{
    CursorMove, InterviewPhase, InterviewReply, IntroReply, PhaseReply, Readiness, ReadinessReply,
    TurnContext, TurnPlan, WarmupReply, plan_turn,
};
pub use roster::{Difficulty, QuestionItem, QuestionProgress, QuestionRoster};
pub use store::{SessionHandle, SessionStore};
