//! The assessment pass: one Judge verdict per question, in queue order.

use futures::stream::{self, StreamExt};

use crate::counters::SessionCounters;
use crate::logging::{record_interaction, InteractionSink};
use crate::model::{AssessmentResult, InteractionRecord};
use crate::session::QuizSession;
use crate::traits::Judge;

/// Configuration for an assessment pass.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Max concurrent Judge calls. Concurrency is a latency optimization
    /// only; results are reassembled into queue order regardless.
    pub parallelism: usize,
    /// Actor id stamped onto interaction records.
    pub actor_id: String,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            actor_id: "anonymous".to_string(),
        }
    }
}

/// Judge every question in the completed session.
///
/// Always returns one result per question, in queue order. A failed Judge
/// call fails closed (`is_correct = false`) and does not abort the rest of
/// the pass. Emits one `submitted:` record per question and bumps the pass
/// counter exactly once at the end.
pub async fn run(
    session: &QuizSession,
    judge: &dyn Judge,
    sink: &dyn InteractionSink,
    counters: &SessionCounters,
    config: &AssessmentConfig,
) -> Vec<AssessmentResult> {
    let parallelism = config.parallelism.max(1);

    // `buffered` preserves input order, so the result vector matches the
    // question queue even when calls overlap.
    let results: Vec<AssessmentResult> = stream::iter(session.questions().iter().enumerate())
        .map(|(position, question)| {
            let answer = session.draft(position).unwrap_or_default().to_string();
            async move {
                let is_correct = match judge.evaluate(question, &answer).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        tracing::warn!(
                            question_id = question.id,
                            "judge call failed, marking incorrect: {e}"
                        );
                        false
                    }
                };
                AssessmentResult {
                    question: question.clone(),
                    answer,
                    is_correct,
                }
            }
        })
        .buffered(parallelism)
        .collect()
        .await;

    for result in &results {
        let verdict = if result.is_correct {
            "correct"
        } else {
            "incorrect"
        };
        record_interaction(
            sink,
            InteractionRecord::new(
                result.question.id,
                config.actor_id.clone(),
                format!("submitted:{}", result.answer),
                verdict,
            ),
        )
        .await;
    }

    counters.record_pass();
    results
}
