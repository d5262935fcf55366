//! Prompt rendering.
//!
//! Instruction texts are minijinja templates rendered against the session
//! record. Structured context (job description, resume, transcript) is
//! pre-serialized to JSON before it reaches a template.

use intervue_core::schema;
use intervue_core::session::{ConversationMessage, InterviewPhase, Session};
use intervue_core::{IntervueError, Result};
use minijinja::{Environment, context};
use serde_json::Value;

const TURN_TEMPLATE: &str = "turn";
const OPENING_TEMPLATE: &str = "opening";
const REPORT_TEMPLATE: &str = "report";

const TURN_SOURCE: &str = r#"Interview stage: {{ phase }}.
Task: {{ task }}
{%- if question %}
Current question ({{ current }} of {{ total }}): "{{ question }}"
{%- endif %}

Candidate's latest message:
"""
{{ answer }}
"""

Respond only by calling `{{ schema }}`."#;

const OPENING_SOURCE: &str = r#"Prepare a mock interview.
{%- if jd %}

Job description:
{{ jd }}
{%- endif %}
{%- if cv %}

Candidate resume:
{{ cv }}
{%- endif %}

Write a short, friendly introduction in which you present yourself as the interviewer and ask the candidate to introduce themselves.
Then prepare exactly {{ question_count }} interview questions, ordered from easier to harder, each with a stable id, a topic and a difficulty of easy, medium or hard.
Respond only by calling `{{ schema }}`."#;

pub const REPORT_SYSTEM_PROMPT: &str =
    "You are an experienced technical interviewer evaluating a finished mock interview.";

const REPORT_SOURCE: &str = r#"Evaluate the following interview.

Prepared questions:
{{ questions }}

Conversation:
{% for entry in transcript -%}
[{{ entry.role }}] {{ entry.content }}
{% endfor %}
Score every dimension from 0 to 100, list strengths and weaknesses, and summarize the performance in one or two sentences.
Respond only by calling `{{ schema }}`."#;

/// What the interviewer should do with the candidate's message in `phase`.
pub fn phase_task(phase: InterviewPhase) -> &'static str {
    match phase {
        InterviewPhase::Intro => {
            "Acknowledge the candidate's self-introduction. Set nextStage to true once they have introduced themselves, and ask whether they are ready to begin."
        }
        InterviewPhase::Readiness => {
            "Classify whether the candidate is ready to start (ready, not_ready, uncertain, skip). Set nextStage to true only when they are ready; otherwise reassure them and ask again."
        }
        InterviewPhase::Interview => {
            "Evaluate the answer to the current question. Ask at most one follow-up (followupNeeded) when the answer is incomplete, otherwise move on (nextQuestion). Set nextStage to true only if the candidate wants to stop the technical part."
        }
        InterviewPhase::Warmup => {
            "Wrap up the interview with light conversation and answer the candidate's questions. Set completeInterview to true when the conversation has come to an end."
        }
        InterviewPhase::Unknown | InterviewPhase::Completed => "No task.",
    }
}

/// Renders instruction prompts for the collaborator.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            (TURN_TEMPLATE, TURN_SOURCE),
            (OPENING_TEMPLATE, OPENING_SOURCE),
            (REPORT_TEMPLATE, REPORT_SOURCE),
        ] {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    /// The per-turn user instruction embedding the candidate's answer.
    pub fn turn_instruction(&self, session: &Session, answer: &str) -> Result<String> {
        let phase = session.phase();
        let roster = session.roster();
        let question = match phase {
            InterviewPhase::Interview => roster.current_text(),
            _ => None,
        };

        self.render(
            TURN_TEMPLATE,
            context! {
                phase => phase.to_string(),
                task => phase_task(phase),
                question => question,
                current => roster.cursor(),
                total => roster.total(),
                answer => answer.trim(),
                schema => schema::turn_schema_name(phase).unwrap_or_default(),
            },
        )
    }

    /// The opening-exchange instruction asking for an introduction and questions.
    pub fn opening_instruction(&self, session: &Session, question_count: usize) -> Result<String> {
        self.render(
            OPENING_TEMPLATE,
            context! {
                jd => pretty_json(session.jd_context.as_ref())?,
                cv => pretty_json(session.cv_context.as_ref())?,
                question_count => question_count,
                schema => schema::INTERVIEW_PLAN,
            },
        )
    }

    /// The evaluation instruction over the given transcript.
    pub fn report_instruction(
        &self,
        session: &Session,
        transcript: &[ConversationMessage],
    ) -> Result<String> {
        let questions = serde_json::to_string_pretty(session.roster().items())?;
        let transcript: Vec<_> = transcript
            .iter()
            .map(|entry| context! { role => entry.role.to_string(), content => entry.content.as_str() })
            .collect();

        self.render(
            REPORT_TEMPLATE,
            context! {
                questions => questions,
                transcript => transcript,
                schema => schema::INTERVIEW_REPORT,
            },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(template_error)
    }
}

fn pretty_json(value: Option<&Value>) -> Result<Option<String>> {
    value
        .filter(|v| !v.is_null())
        .map(serde_json::to_string_pretty)
        .transpose()
        .map_err(Into::into)
}

fn template_error(err: minijinja::Error) -> IntervueError {
    IntervueError::internal(format!("prompt template error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervue_core::session::{Difficulty, QuestionItem, SessionConfig};
    use serde_json::json;

    fn interview_session() -> Session {
        let mut session = Session::new("abcd1234".into(), SessionConfig::new("sys"));
        for phase in [
            InterviewPhase::Intro,
            InterviewPhase::Readiness,
            InterviewPhase::Interview,
        ] {
            session.advance_phase(phase).unwrap();
        }
        session.roster_mut().populate(vec![
            QuestionItem {
                id: "1".into(),
                text: "What is a lifetime?".into(),
                topic: "rust".into(),
                difficulty: Difficulty::Easy,
            },
            QuestionItem {
                id: "2".into(),
                text: "How does Send differ from Sync?".into(),
                topic: "rust".into(),
                difficulty: Difficulty::Medium,
            },
        ]);
        session.roster_mut().seek(2);
        session
    }

    #[test]
    fn test_interview_turn_embeds_counters_and_question() {
        let prompts = PromptBuilder::new().unwrap();
        let text = prompts
            .turn_instruction(&interview_session(), "  Send is about moving.  ")
            .unwrap();

        assert!(text.contains("Interview stage: INTERVIEW."));
        assert!(text.contains("Current question (2 of 2): \"How does Send differ from Sync?\""));
        assert!(text.contains("Send is about moving."));
        assert!(text.contains("`interview_turn`"));
    }

    #[test]
    fn test_intro_turn_has_no_question_line() {
        let prompts = PromptBuilder::new().unwrap();
        let mut session = Session::new("abcd1234".into(), SessionConfig::new("sys"));
        session.advance_phase(InterviewPhase::Intro).unwrap();

        let text = prompts.turn_instruction(&session, "I'm Sam").unwrap();
        assert!(!text.contains("Current question"));
        assert!(text.contains("`intro_turn`"));
    }

    #[test]
    fn test_opening_includes_contexts() {
        let prompts = PromptBuilder::new().unwrap();
        let session = Session::new(
            "abcd1234".into(),
            SessionConfig::new("sys")
                .with_jd_context(json!({"title": "Backend Engineer"}))
                .with_cv_context(json!({"name": "Sam", "skills": ["Rust"]})),
        );

        let text = prompts.opening_instruction(&session, 5).unwrap();
        assert!(text.contains("Backend Engineer"));
        assert!(text.contains("\"Rust\""));
        assert!(text.contains("exactly 5 interview questions"));
        assert!(text.contains("`publish_interview_plan`"));
    }

    #[test]
    fn test_opening_without_contexts() {
        let prompts = PromptBuilder::new().unwrap();
        let session = Session::new("abcd1234".into(), SessionConfig::new("sys"));
        let text = prompts.opening_instruction(&session, 3).unwrap();
        assert!(!text.contains("Job description"));
        assert!(!text.contains("Candidate resume"));
    }

    #[test]
    fn test_report_lists_transcript() {
        let prompts = PromptBuilder::new().unwrap();
        let session = interview_session();
        let text = prompts
            .report_instruction(&session, session.transcript())
            .unwrap();
        assert!(text.contains("[system] sys"));
        assert!(text.contains("What is a lifetime?"));
    }
}
