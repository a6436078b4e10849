//! Judge capability over the chat API.

use async_trait::async_trait;
use tracing::instrument;

use tutorkit_core::model::Question;
use tutorkit_core::traits::{Judge, JUDGE_SYSTEM_PROMPT};
use tutorkit_core::Error;

use crate::chat::{ChatClient, ChatMessage};

const PASS_TOKEN: &str = "PASS";
const FAIL_TOKEN: &str = "FAIL";

/// Parse the classifier's reply under the containment rule: correct iff the
/// reply mentions the pass token and not the fail token. Both tokens,
/// neither token, or anything else reads as incorrect.
pub fn parse_verdict(reply: &str) -> bool {
    reply.contains(PASS_TOKEN) && !reply.contains(FAIL_TOKEN)
}

/// LLM-backed correctness classifier.
pub struct ChatJudge {
    client: ChatClient,
}

impl ChatJudge {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Judge for ChatJudge {
    #[instrument(skip(self, question, answer), fields(question_id = question.id))]
    async fn evaluate(&self, question: &Question, answer: &str) -> Result<bool, Error> {
        let messages = [
            ChatMessage::system(JUDGE_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Problem: {}\nStudent answer: {}\nJudge the answer.",
                question.content, answer
            )),
        ];
        let reply = self
            .client
            .complete(&messages)
            .await
            .map_err(|e| Error::JudgeCall(e.to_string()))?;
        Ok(parse_verdict(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn verdict_containment_rule() {
        assert!(parse_verdict("PASS"));
        assert!(parse_verdict("The verdict is PASS."));
        assert!(!parse_verdict("FAIL"));
        assert!(!parse_verdict("PASS or FAIL, hard to say"));
        assert!(!parse_verdict("the answer looks right"));
        assert!(!parse_verdict(""));
    }

    async fn judge_for(reply: &str) -> (MockServer, ChatJudge) {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": reply}, "index": 0}],
        });
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        let judge = ChatJudge::new(ChatClient::new("k", &server.uri(), "deepseek-chat"));
        (server, judge)
    }

    fn question() -> Question {
        Question {
            id: 1,
            category: String::new(),
            content: "2 + 2 = ?".into(),
        }
    }

    #[tokio::test]
    async fn pass_reply_is_correct() {
        let (_server, judge) = judge_for("PASS").await;
        assert!(judge.evaluate(&question(), "4").await.unwrap());
    }

    #[tokio::test]
    async fn fail_reply_is_incorrect() {
        let (_server, judge) = judge_for("FAIL").await;
        assert!(!judge.evaluate(&question(), "5").await.unwrap());
    }

    #[tokio::test]
    async fn transport_failure_becomes_judge_call_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let judge = ChatJudge::new(ChatClient::new("k", &server.uri(), "deepseek-chat"));
        let err = judge.evaluate(&question(), "4").await.unwrap_err();
        assert!(matches!(err, Error::JudgeCall(_)));
    }
}
