//! Per-question tutoring dialogue and its state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;

use crate::counters::SessionCounters;
use crate::error::Error;
use crate::logging::{record_interaction, InteractionSink};
use crate::model::{AssessmentResult, InteractionRecord, Role, Turn};
use crate::traits::{HintRequest, Tutor, INCORRECT_OPENER};

/// Lifecycle of a tutoring thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Created but never seeded; the answer was correct.
    Uninitialized,
    /// Seeded with the local diagnostic opener; no student turn yet.
    Seeded,
    /// At least one (user, assistant) exchange has completed.
    Active,
}

/// One independent conversation per question.
///
/// Turns strictly alternate after the optional seed turn. The literal final
/// answer never appearing in assistant turns is a contractual obligation of
/// the Tutor's system protocol, not something this type can verify.
#[derive(Debug)]
pub struct TutoringThread {
    question_id: u32,
    turns: Vec<Turn>,
    state: ThreadState,
    in_flight: Arc<AtomicBool>,
}

/// Releases the per-thread stream slot even if the request future is
/// dropped mid-stream (timeout or cancellation).
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TutoringThread {
    /// Open the thread for a reviewed result. Threads for incorrect answers
    /// are seeded locally with the fixed diagnostic opener; threads for
    /// correct answers start empty.
    pub fn open(result: &AssessmentResult) -> Self {
        let (turns, state) = if result.is_correct {
            (Vec::new(), ThreadState::Uninitialized)
        } else {
            (
                vec![Turn::assistant(INCORRECT_OPENER)],
                ThreadState::Seeded,
            )
        };
        Self {
            question_id: result.question.id,
            turns,
            state,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn question_id(&self) -> u32 {
        self.question_id
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Submit a student request and stream the Tutor's reply.
    ///
    /// The user turn is appended before the Tutor is called and survives a
    /// stream failure, so a failed request can be retried; a retry replaces
    /// the unanswered user turn instead of stacking a second one. Fragments
    /// are delivered to `on_fragment` as they arrive. On completion the
    /// buffer is normalized to dollar-delimited math and appended as the
    /// assistant turn; on any mid-stream failure the partial buffer is
    /// discarded and the error surfaced.
    #[allow(clippy::too_many_arguments)]
    pub async fn request_hint<F>(
        &mut self,
        tutor: &dyn Tutor,
        result: &AssessmentResult,
        request: &str,
        sink: &dyn InteractionSink,
        counters: &SessionCounters,
        actor_id: &str,
        mut on_fragment: F,
    ) -> Result<String, Error>
    where
        F: FnMut(&str),
    {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(Error::HintInFlight)?;

        match self.turns.last_mut() {
            Some(turn) if turn.role == Role::User => turn.text = request.to_string(),
            _ => self.turns.push(Turn::user(request)),
        }

        let history_len = self.turns.len() - 1;
        let hint_request = HintRequest {
            question: result.question.clone(),
            answer: result.answer.clone(),
            is_correct: result.is_correct,
            history: self.turns[..history_len].to_vec(),
            request: request.to_string(),
        };

        let mut stream = tutor.hint_stream(&hint_request).await?;
        let mut buffer = String::new();
        while let Some(item) = stream.next().await {
            let fragment = item?;
            on_fragment(&fragment);
            buffer.push_str(&fragment);
        }

        if buffer.is_empty() {
            return Err(Error::TutorStream("stream completed without content".into()));
        }

        let reply = normalize_math_delimiters(&buffer);
        self.turns.push(Turn::assistant(reply.clone()));
        self.state = ThreadState::Active;
        counters.record_assistant_turn();

        record_interaction(
            sink,
            InteractionRecord::new(
                self.question_id,
                actor_id,
                format!("hint_request:{request}"),
                reply.clone(),
            ),
        )
        .await;

        Ok(reply)
    }
}

/// Rewrite bracket-delimited LaTeX markers to dollar-delimited ones:
/// `\[`/`\]` become `$$`, `\(`/`\)` become `$`.
pub fn normalize_math_delimiters(text: &str) -> String {
    text.replace("\\[", "$$")
        .replace("\\]", "$$")
        .replace("\\(", "$")
        .replace("\\)", "$")
}
