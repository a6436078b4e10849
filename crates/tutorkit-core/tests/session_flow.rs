//! End-to-end orchestrator flow against scripted capabilities.

use std::sync::Arc;

use async_trait::async_trait;

use tutorkit_core::bank::QuestionBank;
use tutorkit_core::counters::SessionCounters;
use tutorkit_core::error::Error;
use tutorkit_core::logging::MemorySink;
use tutorkit_core::model::{Question, Role};
use tutorkit_core::orchestrator::{OrchestratorConfig, SessionOrchestrator};
use tutorkit_core::thread::ThreadState;
use tutorkit_core::traits::{HintRequest, HintStream, Judge, Tutor, INCORRECT_OPENER};

/// Judge that passes any answer containing "ok".
struct KeywordJudge;

#[async_trait]
impl Judge for KeywordJudge {
    async fn evaluate(&self, _question: &Question, answer: &str) -> Result<bool, Error> {
        Ok(answer.contains("ok"))
    }
}

/// Tutor that streams a fixed two-fragment hint.
struct CannedTutor;

#[async_trait]
impl Tutor for CannedTutor {
    async fn hint_stream(&self, _request: &HintRequest) -> Result<HintStream, Error> {
        Ok(Box::pin(futures::stream::iter(vec![
            Ok("consider ".to_string()),
            Ok("\\(2x\\) first".to_string()),
        ])))
    }
}

fn bank_of(n: u32) -> QuestionBank {
    let questions = (1..=n)
        .map(|id| Question {
            id,
            category: "algebra".into(),
            content: format!("question {id}"),
        })
        .collect();
    QuestionBank::new("t", "Test Bank", questions)
}

fn orchestrator(bank_size: u32, sample_size: usize) -> (SessionOrchestrator, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let orchestrator = SessionOrchestrator::new(
        bank_of(bank_size),
        Arc::new(KeywordJudge),
        Arc::new(CannedTutor),
        sink.clone(),
        Arc::new(SessionCounters::new()),
        OrchestratorConfig {
            sample_size,
            parallelism: 2,
            actor_id: "s-100".into(),
        },
    );
    (orchestrator, sink)
}

#[tokio::test]
async fn full_session_flow() {
    let (mut orch, sink) = orchestrator(10, 3);
    assert_eq!(orch.phase(), "home");

    orch.begin().unwrap();
    assert_eq!(orch.phase(), "quiz");
    assert_eq!(orch.quiz().unwrap().len(), 3);

    orch.set_draft(0, "ok answer").unwrap();
    orch.set_draft(1, "wrong").unwrap();
    orch.set_draft(2, "ok too").unwrap();

    let results = orch.submit().await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_correct);
    assert!(!results[1].is_correct);
    assert_eq!(orch.phase(), "results");
    assert_eq!(orch.counters().assessment_passes(), 1);
    assert_eq!(sink.records().len(), 3);

    // Review the incorrect result: the thread seeds the fixed opener.
    let wrong_id = orch.results().unwrap()[1].question.id;
    let thread = orch.select_result(wrong_id).unwrap();
    assert_eq!(thread.state(), ThreadState::Seeded);
    assert_eq!(thread.turns()[0].text, INCORRECT_OPENER);

    let mut streamed = String::new();
    let reply = orch
        .request_hint("where do I start?", |f| streamed.push_str(f))
        .await
        .unwrap();
    assert_eq!(reply, "consider $2x$ first");
    assert_eq!(streamed, "consider \\(2x\\) first");
    assert_eq!(orch.counters().assistant_turns(), 1);
    assert_eq!(sink.records().len(), 4);
}

#[tokio::test]
async fn incomplete_submission_lists_missing_positions() {
    let (mut orch, _) = orchestrator(2, 2);
    orch.begin().unwrap();
    orch.set_draft(0, "x=1").unwrap();
    orch.set_draft(1, "").unwrap();

    let err = orch.submit().await.unwrap_err();
    match err {
        Error::IncompleteSubmission { missing } => assert_eq!(missing, vec![2]),
        other => panic!("expected IncompleteSubmission, got {other}"),
    }
    // Still in the quiz phase; the submission was blocked, not consumed.
    assert_eq!(orch.phase(), "quiz");
}

#[tokio::test]
async fn small_bank_uses_every_question_without_error() {
    let (mut orch, _) = orchestrator(4, 5);
    orch.begin().unwrap();
    let quiz = orch.quiz().unwrap();
    assert_eq!(quiz.len(), 4);
    let mut ids: Vec<u32> = quiz.questions().iter().map(|q| q.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn new_session_clears_all_results_state() {
    let (mut orch, _) = orchestrator(3, 3);
    orch.begin().unwrap();
    for i in 0..3 {
        orch.set_draft(i, "wrong").unwrap();
    }
    orch.submit().await.unwrap();

    let reviewed = orch.results().unwrap()[0].question.id;
    orch.select_result(reviewed).unwrap();
    orch.request_hint("help", |_| {}).await.unwrap();
    assert!(orch.thread(reviewed).is_some());

    orch.new_session().unwrap();
    assert_eq!(orch.phase(), "quiz");
    assert!(orch.thread(reviewed).is_none());
    assert!(orch.results().is_err());
    assert!(orch.selected().is_none());

    // Complete the new quiz and check the old thread history is really gone.
    for i in 0..3 {
        orch.set_draft(i, "wrong again").unwrap();
    }
    orch.submit().await.unwrap();
    let thread = orch.select_result(reviewed).unwrap();
    assert_eq!(thread.turns().len(), 1, "only the fresh seed turn");
    assert_eq!(thread.turns()[0].role, Role::Assistant);
}

#[tokio::test]
async fn phase_guards_reject_out_of_phase_operations() {
    let (mut orch, _) = orchestrator(3, 3);

    assert!(matches!(
        orch.submit().await.unwrap_err(),
        Error::InvalidPhase { .. }
    ));
    assert!(matches!(
        orch.select_result(1).unwrap_err(),
        Error::InvalidPhase { .. }
    ));
    assert!(matches!(
        orch.new_session().unwrap_err(),
        Error::InvalidPhase { .. }
    ));

    orch.begin().unwrap();
    assert!(matches!(orch.begin().unwrap_err(), Error::InvalidPhase { .. }));
    assert!(matches!(
        orch.request_hint("hi", |_| {}).await.unwrap_err(),
        Error::InvalidPhase { .. }
    ));
}

#[tokio::test]
async fn empty_bank_blocks_session_start() {
    let (mut orch, _) = orchestrator(0, 5);
    assert!(matches!(orch.begin().unwrap_err(), Error::InsufficientBank));
    assert_eq!(orch.phase(), "home");
}

#[tokio::test]
async fn cursor_passthroughs_stay_clamped() {
    let (mut orch, _) = orchestrator(2, 2);
    orch.begin().unwrap();
    orch.retreat().unwrap();
    assert_eq!(orch.quiz().unwrap().cursor(), 0);
    orch.advance().unwrap();
    orch.advance().unwrap();
    orch.advance().unwrap();
    assert_eq!(orch.quiz().unwrap().cursor(), 1);
}
