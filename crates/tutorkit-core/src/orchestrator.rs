//! Top-level session state machine: home → quiz → results.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::assessment::{self, AssessmentConfig};
use crate::bank::QuestionBank;
use crate::counters::SessionCounters;
use crate::error::Error;
use crate::logging::InteractionSink;
use crate::model::AssessmentResult;
use crate::sampler;
use crate::session::QuizSession;
use crate::thread::TutoringThread;
use crate::traits::{Judge, Tutor};

/// Orchestrator settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Questions per quiz (the sampler caps this at the bank size).
    pub sample_size: usize,
    /// Max concurrent Judge calls during an assessment pass.
    pub parallelism: usize,
    /// Actor id stamped onto interaction records.
    pub actor_id: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sample_size: 5,
            parallelism: 4,
            actor_id: "anonymous".to_string(),
        }
    }
}

/// Results-phase state: the ordered verdicts plus lazily created tutoring
/// threads, at most one of which is under review.
#[derive(Debug, Default)]
struct ResultsView {
    results: Vec<AssessmentResult>,
    threads: HashMap<u32, TutoringThread>,
    selected: Option<u32>,
}

/// Tagged session phase. Each variant carries only the state valid in that
/// phase, so e.g. reviewing a result mid-quiz is unrepresentable.
enum Phase {
    Home,
    Quiz(QuizSession),
    Results(ResultsView),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Home => "home",
            Phase::Quiz(_) => "quiz",
            Phase::Results(_) => "results",
        }
    }
}

/// Owns the active session and mediates every state transition.
pub struct SessionOrchestrator {
    bank: QuestionBank,
    judge: Arc<dyn Judge>,
    tutor: Arc<dyn Tutor>,
    sink: Arc<dyn InteractionSink>,
    counters: Arc<SessionCounters>,
    config: OrchestratorConfig,
    phase: Phase,
}

impl SessionOrchestrator {
    pub fn new(
        bank: QuestionBank,
        judge: Arc<dyn Judge>,
        tutor: Arc<dyn Tutor>,
        sink: Arc<dyn InteractionSink>,
        counters: Arc<SessionCounters>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            bank,
            judge,
            tutor,
            sink,
            counters,
            config,
            phase: Phase::Home,
        }
    }

    pub fn phase(&self) -> &'static str {
        self.phase.name()
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    /// Entry action shared by `begin` and `new_session`: sample a fresh quiz
    /// and hard-reset all phase-owned state.
    fn enter_quiz(&mut self) -> Result<(), Error> {
        let questions = sampler::sample(&self.bank, self.config.sample_size)?;
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, count = questions.len(), "quiz session started");
        self.phase = Phase::Quiz(QuizSession::start(questions));
        Ok(())
    }

    /// Leave the home screen and start the quiz.
    pub fn begin(&mut self) -> Result<(), Error> {
        match self.phase {
            Phase::Home => self.enter_quiz(),
            _ => Err(self.invalid_phase("home")),
        }
    }

    /// Discard all results-phase state and start over with a fresh sample.
    pub fn new_session(&mut self) -> Result<(), Error> {
        match self.phase {
            Phase::Results(_) => self.enter_quiz(),
            _ => Err(self.invalid_phase("results")),
        }
    }

    pub fn quiz(&self) -> Result<&QuizSession, Error> {
        match &self.phase {
            Phase::Quiz(session) => Ok(session),
            _ => Err(self.invalid_phase("quiz")),
        }
    }

    fn quiz_mut(&mut self) -> Result<&mut QuizSession, Error> {
        match &mut self.phase {
            Phase::Quiz(session) => Ok(session),
            other => Err(Error::InvalidPhase {
                expected: "quiz",
                actual: other.name(),
            }),
        }
    }

    pub fn set_draft(&mut self, position: usize, text: impl Into<String>) -> Result<(), Error> {
        self.quiz_mut()?.set_draft(position, text);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), Error> {
        self.quiz_mut()?.advance();
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<(), Error> {
        self.quiz_mut()?.retreat();
        Ok(())
    }

    /// Submit the completed quiz, run the assessment pass, and move to the
    /// results phase. Blocked (with the 1-indexed missing positions) while
    /// any draft is blank.
    pub async fn submit(&mut self) -> Result<&[AssessmentResult], Error> {
        let session = self.quiz()?;
        if !session.is_complete() {
            return Err(Error::IncompleteSubmission {
                missing: session.missing_positions(),
            });
        }

        let assessment_config = AssessmentConfig {
            parallelism: self.config.parallelism,
            actor_id: self.config.actor_id.clone(),
        };
        let results = assessment::run(
            session,
            self.judge.as_ref(),
            self.sink.as_ref(),
            &self.counters,
            &assessment_config,
        )
        .await;

        // Entering results discards the quiz state and any prior threads.
        self.phase = Phase::Results(ResultsView {
            results,
            threads: HashMap::new(),
            selected: None,
        });
        self.results()
    }

    pub fn results(&self) -> Result<&[AssessmentResult], Error> {
        match &self.phase {
            Phase::Results(view) => Ok(&view.results),
            _ => Err(self.invalid_phase("results")),
        }
    }

    /// Put one result under review. The tutoring thread is created lazily on
    /// first inspection, seeding the diagnostic opener when the answer was
    /// incorrect.
    pub fn select_result(&mut self, question_id: u32) -> Result<&TutoringThread, Error> {
        let view = match &mut self.phase {
            Phase::Results(view) => view,
            other => {
                return Err(Error::InvalidPhase {
                    expected: "results",
                    actual: other.name(),
                })
            }
        };
        let result = view
            .results
            .iter()
            .find(|r| r.question.id == question_id)
            .ok_or(Error::UnknownQuestion(question_id))?;
        let thread = view
            .threads
            .entry(question_id)
            .or_insert_with(|| TutoringThread::open(result));
        view.selected = Some(question_id);
        Ok(thread)
    }

    pub fn selected(&self) -> Option<u32> {
        match &self.phase {
            Phase::Results(view) => view.selected,
            _ => None,
        }
    }

    pub fn thread(&self, question_id: u32) -> Option<&TutoringThread> {
        match &self.phase {
            Phase::Results(view) => view.threads.get(&question_id),
            _ => None,
        }
    }

    /// Send a hint request to the thread under review, streaming fragments
    /// through `on_fragment`.
    pub async fn request_hint<F>(&mut self, request: &str, on_fragment: F) -> Result<String, Error>
    where
        F: FnMut(&str),
    {
        let tutor = Arc::clone(&self.tutor);
        let sink = Arc::clone(&self.sink);
        let counters = Arc::clone(&self.counters);
        let actor_id = self.config.actor_id.clone();

        let view = match &mut self.phase {
            Phase::Results(view) => view,
            other => {
                return Err(Error::InvalidPhase {
                    expected: "results",
                    actual: other.name(),
                })
            }
        };
        let question_id = view.selected.ok_or(Error::SelectionRequired)?;
        let result = view
            .results
            .iter()
            .find(|r| r.question.id == question_id)
            .cloned()
            .ok_or(Error::UnknownQuestion(question_id))?;
        let thread = view
            .threads
            .get_mut(&question_id)
            .ok_or(Error::UnknownQuestion(question_id))?;

        thread
            .request_hint(
                tutor.as_ref(),
                &result,
                request,
                sink.as_ref(),
                &counters,
                &actor_id,
                on_fragment,
            )
            .await
    }

    fn invalid_phase(&self, expected: &'static str) -> Error {
        Error::InvalidPhase {
            expected,
            actual: self.phase.name(),
        }
    }
}
