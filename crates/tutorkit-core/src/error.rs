//! Error taxonomy for the session engine.
//!
//! Capability-boundary failures (Judge, Tutor, logging sink) are caught at
//! the point of call and converted into these variants. They never propagate
//! as raw transport errors into orchestrator state transitions.

use thiserror::Error;

/// Errors surfaced by the session engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A capability is structurally unreachable (missing API key, no bank
    /// file, ...). Fatal to the whole session; surfaced immediately.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A single Judge call failed (timeout, malformed reply). Recovered by
    /// fail-closed classification; the pass continues.
    #[error("judge call failed: {0}")]
    JudgeCall(String),

    /// A Tutor stream failed mid-delivery. The partial assistant buffer is
    /// discarded; the user turn is preserved so the request can be retried.
    #[error("tutor stream failed: {0}")]
    TutorStream(String),

    /// A hint request arrived while a stream for the same question was
    /// already in flight.
    #[error("a hint stream is already in flight for this question")]
    HintInFlight,

    /// Submission attempted before every draft was filled in. Positions are
    /// 1-indexed for display.
    #[error("submission incomplete, missing answers for questions {missing:?}")]
    IncompleteSubmission { missing: Vec<usize> },

    /// The question bank is empty, so no session can be started.
    #[error("question bank is empty")]
    InsufficientBank,

    /// An operation was issued in the wrong orchestrator phase.
    #[error("invalid phase: expected {expected}, currently {actual}")]
    InvalidPhase {
        expected: &'static str,
        actual: &'static str,
    },

    /// A review or hint request named a question outside this session.
    #[error("question {0} is not part of this session")]
    UnknownQuestion(u32),

    /// A hint was requested before any result was put under review.
    #[error("no result is under review")]
    SelectionRequired,
}

impl Error {
    /// Returns `true` if the operation that produced this error can be
    /// retried without restarting the session.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::TutorStream(_) | Error::HintInFlight | Error::IncompleteSubmission { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::TutorStream("boom".into()).is_retryable());
        assert!(Error::HintInFlight.is_retryable());
        assert!(!Error::Configuration("no key".into()).is_retryable());
        assert!(!Error::InsufficientBank.is_retryable());
    }

    #[test]
    fn incomplete_submission_lists_positions() {
        let err = Error::IncompleteSubmission { missing: vec![2] };
        assert!(err.to_string().contains("[2]"));
    }
}
