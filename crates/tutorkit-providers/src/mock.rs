//! Mock capabilities for testing without real API calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tutorkit_core::model::Question;
use tutorkit_core::traits::{HintRequest, HintStream, Judge, Tutor};
use tutorkit_core::Error;

/// A scripted Judge: per-question verdicts with optional failure injection.
pub struct MockJudge {
    /// Verdicts keyed by question id.
    verdicts: HashMap<u32, bool>,
    /// Verdict for questions with no entry.
    default_verdict: bool,
    /// Question ids whose calls fail instead of returning a verdict.
    failing: Vec<u32>,
    call_count: AtomicU32,
}

impl MockJudge {
    pub fn new(verdicts: HashMap<u32, bool>) -> Self {
        Self {
            verdicts,
            default_verdict: false,
            failing: Vec::new(),
            call_count: AtomicU32::new(0),
        }
    }

    /// A judge that gives every answer the same verdict.
    pub fn with_fixed_verdict(verdict: bool) -> Self {
        Self {
            verdicts: HashMap::new(),
            default_verdict: verdict,
            failing: Vec::new(),
            call_count: AtomicU32::new(0),
        }
    }

    /// Make calls for the given question ids fail.
    pub fn failing_on(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.failing = ids.into_iter().collect();
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Judge for MockJudge {
    async fn evaluate(&self, question: &Question, _answer: &str) -> Result<bool, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&question.id) {
            return Err(Error::JudgeCall("injected failure".into()));
        }
        Ok(*self
            .verdicts
            .get(&question.id)
            .unwrap_or(&self.default_verdict))
    }
}

/// A scripted Tutor: replays fixed fragments, optionally failing mid-stream.
pub struct MockTutor {
    fragments: Vec<String>,
    /// Inject a stream error after this many fragments.
    fail_after: Option<usize>,
    call_count: AtomicU32,
    last_request: Mutex<Option<HintRequest>>,
}

impl MockTutor {
    pub fn new(fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            fail_after: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Truncate the stream with an error after `n` fragments.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<HintRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tutor for MockTutor {
    async fn hint_stream(&self, request: &HintRequest) -> Result<HintStream, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let mut items: Vec<Result<String, Error>> = self
            .fragments
            .iter()
            .take(self.fail_after.unwrap_or(self.fragments.len()))
            .cloned()
            .map(Ok)
            .collect();
        if self.fail_after.is_some() {
            items.push(Err(Error::TutorStream("injected stream failure".into())));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
