//! In-process collaborator that replays a queue of canned results.

#![allow(dead_code)]

use async_trait::async_trait;
use intervue_application::{InterviewContext, InterviewUseCase};
use intervue_core::collaborator::{
    CollaboratorError, GenerationOutput, GenerationRequest, ReasoningCollaborator,
};
use intervue_core::config::InterviewSettings;
use intervue_core::schema;
use intervue_core::session::SessionStore;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Scripted = Result<GenerationOutput, CollaboratorError>;

#[derive(Default)]
pub struct ScriptedCollaborator {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Mutex<Duration>,
}

impl ScriptedCollaborator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, schema: &str, fields: Value) {
        self.push_result(Ok(GenerationOutput::Structured {
            name: schema.to_string(),
            fields,
        }));
    }

    pub fn push_text(&self, text: &str) {
        self.push_result(Ok(GenerationOutput::Text(text.to_string())));
    }

    pub fn push_error(&self, err: CollaboratorError) {
        self.push_result(Err(err));
    }

    pub fn push_result(&self, result: Scripted) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> GenerationRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ReasoningCollaborator for ScriptedCollaborator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutput, CollaboratorError> {
        self.requests.lock().unwrap().push(request);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CollaboratorError::Service {
                    status: None,
                    message: "script exhausted".to_string(),
                    retryable: false,
                })
            })
    }
}

// ============================================================================
// Canned structured fields
// ============================================================================

pub fn plan(questions: usize) -> Value {
    let questions: Vec<Value> = (1..=questions)
        .map(|i| {
            json!({
                "id": format!("q{i}"),
                "text": format!("Question {i}?"),
                "topic": "rust",
                "difficulty": "medium",
            })
        })
        .collect();
    json!({
        "introductionText": "Hi, I'm Alex and I'll be your interviewer. Could you introduce yourself?",
        "questions": questions,
    })
}

pub fn intro(next_stage: bool) -> Value {
    json!({"text": "Nice to meet you. Are you ready to start?", "nextStage": next_stage})
}

pub fn readiness(next_stage: bool) -> Value {
    let readiness = if next_stage { "ready" } else { "not_ready" };
    json!({"text": "Alright.", "readiness": readiness, "nextStage": next_stage})
}

pub fn interview(followup: bool, next_question: bool, next_stage: bool) -> Value {
    json!({
        "text": "Thanks for the answer.",
        "followupNeeded": followup,
        "nextQuestion": next_question,
        "nextStage": next_stage,
    })
}

pub fn warmup(complete: bool) -> Value {
    json!({
        "text": "It was a pleasure talking to you.",
        "followupNeeded": false,
        "completeInterview": complete,
    })
}

pub fn report() -> Value {
    json!({
        "passed": true,
        "overallScore": 78,
        "technicalSkill": 80,
        "problemSolving": 75,
        "communication": 85,
        "experience": 70,
        "pros": ["clear reasoning"],
        "cons": ["shallow on async"],
        "summary": "Solid candidate.",
    })
}

// ============================================================================
// Use case setup
// ============================================================================

pub fn settings() -> InterviewSettings {
    InterviewSettings {
        question_count: 2,
        ..InterviewSettings::default()
    }
}

pub fn usecase(collaborator: &Arc<ScriptedCollaborator>, settings: InterviewSettings) -> InterviewUseCase {
    let collaborator: Arc<dyn ReasoningCollaborator> = collaborator.clone();
    InterviewUseCase::new(Arc::new(SessionStore::new()), collaborator, settings)
        .expect("templates compile")
}

/// Starts a session whose roster holds `questions` questions.
pub async fn start(
    collaborator: &Arc<ScriptedCollaborator>,
    usecase: &InterviewUseCase,
    questions: usize,
) -> String {
    collaborator.push(schema::INTERVIEW_PLAN, plan(questions));
    usecase
        .start_session(InterviewContext::default())
        .await
        .expect("session starts")
        .session_id
}

/// Starts a session and walks it into INTERVIEW with the cursor on question 1.
pub async fn start_interview(
    collaborator: &Arc<ScriptedCollaborator>,
    usecase: &InterviewUseCase,
    questions: usize,
) -> String {
    let id = start(collaborator, usecase, questions).await;
    collaborator.push(schema::INTRO_TURN, intro(true));
    usecase.submit_answer(&id, "I'm Sam.").await.expect("intro turn");
    collaborator.push(schema::READINESS_TURN, readiness(true));
    usecase.submit_answer(&id, "Ready.").await.expect("readiness turn");
    id
}
