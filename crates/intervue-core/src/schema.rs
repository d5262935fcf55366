//! Response schemas requested from the reasoning collaborator.
//!
//! Each phase that accepts answers has exactly one schema; the opening
//! exchange and the report have their own.

use crate::collaborator::ResponseSchema;
use crate::error::{IntervueError, Result};
use crate::session::{InterviewPhase, QuestionItem};
use serde::Deserialize;
use serde_json::{Value, json};

pub const INTRO_TURN: &str = "intro_turn";
pub const READINESS_TURN: &str = "readiness_turn";
pub const INTERVIEW_TURN: &str = "interview_turn";
pub const WARMUP_TURN: &str = "warmup_turn";
pub const INTERVIEW_PLAN: &str = "publish_interview_plan";
pub const INTERVIEW_REPORT: &str = "submit_interview_report";

/// Name of the schema expected for a turn in `phase`.
pub fn turn_schema_name(phase: InterviewPhase) -> Option<&'static str> {
    match phase {
        InterviewPhase::Intro => Some(INTRO_TURN),
        InterviewPhase::Readiness => Some(READINESS_TURN),
        InterviewPhase::Interview => Some(INTERVIEW_TURN),
        InterviewPhase::Warmup => Some(WARMUP_TURN),
        InterviewPhase::Unknown | InterviewPhase::Completed => None,
    }
}

fn answer_summary_property() -> Value {
    json!({
        "type": "string",
        "description": "One-sentence normalized summary of the candidate's latest answer"
    })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// The structured-field contract for a turn in `phase`.
pub fn turn_schema(phase: InterviewPhase) -> Option<ResponseSchema> {
    let name = turn_schema_name(phase)?;
    let text = json!({"type": "string", "description": "Reply spoken to the candidate"});

    let (description, parameters) = match phase {
        InterviewPhase::Intro => (
            "Reply during the introduction and decide whether to move on to the readiness check",
            object_schema(
                json!({
                    "text": text,
                    "nextStage": {"type": "boolean"},
                    "answerSummary": answer_summary_property(),
                }),
                &["text", "nextStage"],
            ),
        ),
        InterviewPhase::Readiness => (
            "Classify the candidate's readiness and decide whether to start the questions",
            object_schema(
                json!({
                    "text": text,
                    "readiness": {
                        "type": "string",
                        "enum": ["ready", "not_ready", "uncertain", "skip"]
                    },
                    "nextStage": {"type": "boolean"},
                    "answerSummary": answer_summary_property(),
                }),
                &["text", "readiness", "nextStage"],
            ),
        ),
        InterviewPhase::Interview => (
            "React to the answer for the current question and choose how to continue",
            object_schema(
                json!({
                    "text": text,
                    "followupNeeded": {"type": "boolean"},
                    "nextQuestion": {"type": "boolean"},
                    "nextStage": {"type": "boolean"},
                    "answerSummary": answer_summary_property(),
                }),
                &["text", "followupNeeded", "nextQuestion", "nextStage"],
            ),
        ),
        InterviewPhase::Warmup => (
            "Close the interview with wrap-up conversation",
            object_schema(
                json!({
                    "text": text,
                    "followupNeeded": {"type": "boolean"},
                    "completeInterview": {"type": "boolean"},
                    "answerSummary": answer_summary_property(),
                }),
                &["text", "followupNeeded", "completeInterview"],
            ),
        ),
        InterviewPhase::Unknown | InterviewPhase::Completed => return None,
    };

    Some(ResponseSchema {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    })
}

/// Schema for the opening exchange: an introduction plus the question roster.
pub fn interview_plan_schema() -> ResponseSchema {
    ResponseSchema {
        name: INTERVIEW_PLAN.to_string(),
        description: "Publish the opening introduction and the ordered interview questions"
            .to_string(),
        parameters: object_schema(
            json!({
                "introductionText": {"type": "string"},
                "questions": {
                    "type": "array",
                    "items": object_schema(
                        json!({
                            "id": {"type": "string"},
                            "text": {"type": "string"},
                            "topic": {"type": "string"},
                            "difficulty": {"type": "string", "enum": ["easy", "medium", "hard"]},
                        }),
                        &["id", "text", "topic", "difficulty"],
                    ),
                },
            }),
            &["introductionText", "questions"],
        ),
    }
}

/// Schema for the post-interview evaluation.
pub fn interview_report_schema() -> ResponseSchema {
    let score = json!({"type": "integer", "minimum": 0, "maximum": 100});
    ResponseSchema {
        name: INTERVIEW_REPORT.to_string(),
        description: "Evaluate the finished interview".to_string(),
        parameters: object_schema(
            json!({
                "passed": {"type": "boolean"},
                "overallScore": score,
                "technicalSkill": score,
                "problemSolving": score,
                "communication": score,
                "experience": score,
                "pros": {"type": "array", "items": {"type": "string"}},
                "cons": {"type": "array", "items": {"type": "string"}},
                "summary": {"type": "string"},
            }),
            &[
                "passed",
                "overallScore",
                "technicalSkill",
                "problemSolving",
                "communication",
                "experience",
                "pros",
                "cons",
                "summary",
            ],
        ),
    }
}

/// Typed result of the opening exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPlan {
    pub introduction_text: String,
    pub questions: Vec<QuestionItem>,
}

impl InterviewPlan {
    pub fn parse(fields: Value) -> Result<Self> {
        let plan: Self = serde_json::from_value(fields)
            .map_err(|e| IntervueError::malformed(INTERVIEW_PLAN, e.to_string()))?;
        if plan.introduction_text.trim().is_empty() {
            return Err(IntervueError::malformed(
                INTERVIEW_PLAN,
                "field `introductionText` is empty",
            ));
        }
        if let Some(blank) = plan.questions.iter().find(|q| q.text.trim().is_empty()) {
            return Err(IntervueError::malformed(
                INTERVIEW_PLAN,
                format!("question '{}' has no text", blank.id),
            ));
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Difficulty;

    #[test]
    fn test_every_answering_phase_has_a_schema() {
        for phase in [
            InterviewPhase::Intro,
            InterviewPhase::Readiness,
            InterviewPhase::Interview,
            InterviewPhase::Warmup,
        ] {
            let schema = turn_schema(phase).expect("schema");
            assert_eq!(Some(schema.name.as_str()), turn_schema_name(phase));
            assert!(schema.parameters["required"]
                .as_array()
                .unwrap()
                .contains(&json!("text")));
        }
        assert!(turn_schema(InterviewPhase::Unknown).is_none());
        assert!(turn_schema(InterviewPhase::Completed).is_none());
    }

    #[test]
    fn test_parse_interview_plan() {
        let plan = InterviewPlan::parse(json!({
            "introductionText": "Hello, I'm your interviewer.",
            "questions": [
                {"id": "1", "text": "What is ownership?", "topic": "rust", "difficulty": "easy"},
                {"id": "2", "text": "Explain Pin.", "topic": "async", "difficulty": "hard"}
            ]
        }))
        .unwrap();
        assert_eq!(plan.questions.len(), 2);
        assert_eq!(plan.questions[1].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_parse_interview_plan_rejects_bad_difficulty() {
        let err = InterviewPlan::parse(json!({
            "introductionText": "Hello",
            "questions": [{"id": "1", "text": "Q?", "topic": "t", "difficulty": "extreme"}]
        }))
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_interview_plan_rejects_missing_intro() {
        let err = InterviewPlan::parse(json!({"questions": []})).unwrap_err();
        assert!(err.is_malformed());
    }
}
