//! The active quiz: sampled questions, answer drafts, and a cursor.

use crate::model::Question;

/// Mutable quiz state between session start and submission.
///
/// The cursor is always a valid index; drafts exist for every position from
/// the moment the session starts (empty string, never absent).
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    drafts: Vec<String>,
    cursor: usize,
}

impl QuizSession {
    /// Start a fresh session over the given questions. Any prior state is
    /// replaced wholesale.
    pub fn start(questions: Vec<Question>) -> Self {
        let drafts = vec![String::new(); questions.len()];
        Self {
            questions,
            drafts,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The question under the cursor.
    pub fn current(&self) -> &Question {
        &self.questions[self.cursor]
    }

    pub fn draft(&self, position: usize) -> Option<&str> {
        self.drafts.get(position).map(String::as_str)
    }

    pub fn drafts(&self) -> &[String] {
        &self.drafts
    }

    /// Overwrite the draft at `position`. Out-of-range positions are ignored.
    pub fn set_draft(&mut self, position: usize, text: impl Into<String>) {
        if let Some(slot) = self.drafts.get_mut(position) {
            *slot = text.into();
        }
    }

    /// Move the cursor forward, clamped at the last position.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor back, clamped at position 0.
    pub fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// True once every draft has non-whitespace content. This is the
    /// precondition for submission.
    pub fn is_complete(&self) -> bool {
        self.drafts.iter().all(|d| !d.trim().is_empty())
    }

    /// 1-indexed positions whose drafts are still blank, for the
    /// incomplete-submission error.
    pub fn missing_positions(&self) -> Vec<usize> {
        self.drafts
            .iter()
            .enumerate()
            .filter(|(_, d)| d.trim().is_empty())
            .map(|(i, _)| i + 1)
            .collect()
    }
}
