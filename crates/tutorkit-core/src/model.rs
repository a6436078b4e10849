//! Core data model types for tutorkit.
//!
//! Questions come from a static, read-only bank. Everything the engine
//! derives from them (assessment results, dialogue turns, interaction
//! records) is immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single question from the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable, unique identifier.
    pub id: u32,
    /// Category label (e.g. "algebra", "geometry").
    #[serde(default)]
    pub category: String,
    /// The question text shown to the student.
    pub content: String,
}

/// One judged question from a completed quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// The question that was answered.
    pub question: Question,
    /// The final submitted answer.
    pub answer: String,
    /// Verdict from the Judge capability. Fail-closed: an unobtainable
    /// judgment is recorded as `false`.
    pub is_correct: bool,
}

/// Who produced a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a tutoring dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// An append-only interaction record handed to the logging collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub question_id: u32,
    pub actor_id: String,
    pub query_text: String,
    pub response_text: String,
    /// Reserved for future misuse detection. The engine always writes 0.
    pub leak_flag: u8,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Build a record stamped with the current time and `leak_flag = 0`.
    pub fn new(
        question_id: u32,
        actor_id: impl Into<String>,
        query_text: impl Into<String>,
        response_text: impl Into<String>,
    ) -> Self {
        Self {
            question_id,
            actor_id: actor_id.into(),
            query_text: query_text.into(),
            response_text: response_text.into(),
            leak_flag: 0,
            timestamp: Utc::now(),
        }
    }
}
