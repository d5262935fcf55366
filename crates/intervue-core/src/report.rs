//! Interview evaluation report.

use crate::error::{IntervueError, Result};
use crate::schema::INTERVIEW_REPORT;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Evaluation of a finished interview. Scores range from 0 to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewReport {
    pub passed: bool,
    pub overall_score: u8,
    pub technical_skill: u8,
    pub problem_solving: u8,
    pub communication: u8,
    pub experience: u8,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    pub summary: String,
}

impl InterviewReport {
    pub fn parse(fields: Value) -> Result<Self> {
        let report: Self = serde_json::from_value(fields)
            .map_err(|e| IntervueError::malformed(INTERVIEW_REPORT, e.to_string()))?;

        let scores = [
            ("overallScore", report.overall_score),
            ("technicalSkill", report.technical_skill),
            ("problemSolving", report.problem_solving),
            ("communication", report.communication),
            ("experience", report.experience),
        ];
        if let Some((field, score)) = scores.iter().find(|(_, score)| *score > 100) {
            return Err(IntervueError::malformed(
                INTERVIEW_REPORT,
                format!("`{field}` = {score} is outside 0..=100"),
            ));
        }
        Ok(report)
    }
}
