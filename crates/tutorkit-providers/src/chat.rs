//! Minimal OpenAI-compatible chat-completions client.
//!
//! Two entry points: [`ChatClient::complete`] for one-shot replies (the
//! Judge) and [`ChatClient::stream`] for SSE token streaming (the Tutor).

use std::collections::VecDeque;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use tutorkit_core::traits::HintStream;
use tutorkit_core::Error;

use crate::error::ProviderError;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// One chat message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct SseChunk {
    choices: Vec<SseChoice>,
}

#[derive(Deserialize)]
struct SseChoice {
    #[serde(default)]
    delta: SseDelta,
}

#[derive(Deserialize, Default)]
struct SseDelta {
    #[serde(default)]
    content: Option<String>,
}

/// A decoded server-sent event line.
#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Delta(String),
    Done,
    Ignore,
}

/// Decode one SSE line into an event.
fn decode_sse_line(line: &str) -> Result<SseEvent, ProviderError> {
    let Some(payload) = line.trim().strip_prefix("data:") else {
        return Ok(SseEvent::Ignore);
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return Ok(SseEvent::Done);
    }
    let chunk: SseChunk = serde_json::from_str(payload)
        .map_err(|e| ProviderError::MalformedResponse(format!("bad stream event: {e}")))?;
    let delta = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default();
    if delta.is_empty() {
        Ok(SseEvent::Ignore)
    } else {
        Ok(SseEvent::Delta(delta))
    }
}

/// Chat-completions client bound to one endpoint and model.
pub struct ChatClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self::with_timeout(api_key, base_url, model, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(api_key: &str, base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
            client,
        }
    }

    async fn post(
        &self,
        messages: &[ChatMessage],
        streaming: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: streaming,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            });
        }

        Ok(response)
    }

    /// One-shot completion; returns the first choice's content.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let response = self.post(messages, false).await?;
        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("response had no choices".into()))
    }

    /// Streaming completion; yields content deltas as they arrive.
    ///
    /// The stream terminates cleanly on the `[DONE]` marker. A transport
    /// failure, a malformed event, or a body that ends without the marker
    /// all surface as a terminal error item.
    pub async fn stream(&self, messages: &[ChatMessage]) -> Result<HintStream, ProviderError> {
        let response = self.post(messages, true).await?;

        struct SseState<S> {
            inner: S,
            buf: String,
            pending: VecDeque<String>,
            done: bool,
        }

        let state = SseState {
            inner: response.bytes_stream().boxed(),
            buf: String::new(),
            pending: VecDeque::new(),
            done: false,
        };

        let stream = stream::unfold(state, |mut st| async move {
            loop {
                if let Some(fragment) = st.pending.pop_front() {
                    return Some((Ok(fragment), st));
                }
                if st.done {
                    return None;
                }
                match st.inner.next().await {
                    Some(Ok(bytes)) => {
                        st.buf.push_str(&String::from_utf8_lossy(&bytes));
                        while !st.done {
                            let Some(pos) = st.buf.find('\n') else { break };
                            let line: String = st.buf.drain(..=pos).collect();
                            match decode_sse_line(&line) {
                                Ok(SseEvent::Delta(delta)) => st.pending.push_back(delta),
                                Ok(SseEvent::Done) => st.done = true,
                                Ok(SseEvent::Ignore) => {}
                                Err(e) => {
                                    st.done = true;
                                    return Some((Err(Error::TutorStream(e.to_string())), st));
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        st.done = true;
                        return Some((
                            Err(Error::TutorStream(format!("transport failed mid-stream: {e}"))),
                            st,
                        ));
                    }
                    None => {
                        st.done = true;
                        return Some((
                            Err(Error::TutorStream(
                                "stream ended without completion marker".into(),
                            )),
                            st,
                        ));
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
