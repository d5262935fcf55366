//! Application layer for Intervue.
//!
//! This crate provides the interview use cases that coordinate the session
//! store in `intervue-core` with a reasoning collaborator implementation.

pub mod dispatcher;
pub mod interview_usecase;
mod invoke;
pub mod opening;
pub mod prompts;
pub mod report_service;

pub use dispatcher::{ResponseDispatcher, TurnReply};
pub use interview_usecase::{InterviewContext, InterviewUseCase, SessionEnded, SessionStarted};
pub use opening::{OpeningExchange, SessionOpened};
pub use prompts::PromptBuilder;
pub use report_service::ReportGenerator;
