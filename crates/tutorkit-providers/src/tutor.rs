//! Tutor capability over the chat API, with SSE streaming.

use async_trait::async_trait;
use tracing::instrument;

use tutorkit_core::model::Role;
use tutorkit_core::traits::{
    format_hint_context, HintRequest, HintStream, Tutor, TUTOR_SYSTEM_PROMPT,
};
use tutorkit_core::Error;

use crate::chat::{ChatClient, ChatMessage};

/// LLM-backed scaffolding tutor. The answer-non-disclosure rule lives in the
/// system protocol; this type only moves messages and fragments.
pub struct ChatTutor {
    client: ChatClient,
}

impl ChatTutor {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    fn build_messages(request: &HintRequest) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage::system(TUTOR_SYSTEM_PROMPT));
        for turn in &request.history {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(turn.text.clone()),
                Role::Assistant => ChatMessage::assistant(turn.text.clone()),
            });
        }
        messages.push(ChatMessage::user(format_hint_context(request)));
        messages
    }
}

#[async_trait]
impl Tutor for ChatTutor {
    #[instrument(skip(self, request), fields(question_id = request.question.id))]
    async fn hint_stream(&self, request: &HintRequest) -> Result<HintStream, Error> {
        let messages = Self::build_messages(request);
        self.client
            .stream(&messages)
            .await
            .map_err(|e| Error::TutorStream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tutorkit_core::model::{Question, Turn};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> HintRequest {
        HintRequest {
            question: Question {
                id: 4,
                category: "algebra".into(),
                content: "Solve 2x + 3 = 11".into(),
            },
            answer: "x = 5".into(),
            is_correct: false,
            history: vec![
                Turn::assistant("Where did you get stuck?"),
                Turn::user("after subtracting 3"),
                Turn::assistant("Good, what remains on the left?"),
            ],
            request: "what do I divide by?".into(),
        }
    }

    #[test]
    fn messages_carry_protocol_history_and_bundle() {
        let messages = ChatTutor::build_messages(&request());
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Answer Blocking"));
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[3].role, "assistant");
        assert_eq!(messages[4].role, "user");
        assert!(messages[4].content.contains("[Problem]: Solve 2x + 3 = 11"));
        assert!(messages[4].content.contains("[Student Request]: what do I divide by?"));
    }

    #[tokio::test]
    async fn streams_fragments_from_the_api() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Look at \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"the coefficient\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("Student Request"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let tutor = ChatTutor::new(ChatClient::new("k", &server.uri(), "deepseek-chat"));
        let mut stream = tutor.hint_stream(&request()).await.unwrap();

        let mut fragments = Vec::new();
        while let Some(item) = stream.next().await {
            fragments.push(item.unwrap());
        }
        assert_eq!(fragments.join(""), "Look at the coefficient");
    }

    #[tokio::test]
    async fn http_failure_maps_to_tutor_stream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let tutor = ChatTutor::new(ChatClient::new("k", &server.uri(), "deepseek-chat"));
        let err = tutor.hint_stream(&request()).await.err().unwrap();
        assert!(matches!(err, Error::TutorStream(_)));
    }
}
