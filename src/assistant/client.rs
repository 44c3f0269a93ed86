use anyhow::{Context, Result};
use futures_util::Stream;
use reqwest::Client;
use std::pin::Pin;
use std::time::{Duration, Instant};
use thiserror::Error;

use super::dispatcher::{ChatEvent, StreamDispatcher};
use crate::history::ChatRecord;

/// One user turn addressed to a chat session.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub chat_id: String,
}

/// Transport-level failures. Each is surfaced at most once per exchange;
/// a failed exchange never also reports completion.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Failed to connect to assistant endpoint: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("Assistant request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read assistant stream: {0}")]
    Read(#[source] reqwest::Error),
}

/// Result of the non-streaming fallback call.
#[derive(Debug, Clone)]
pub struct SyncReply {
    /// The complete answer text.
    pub content: String,
    /// Wall-clock time spent waiting for the answer.
    pub elapsed: Duration,
}

/// HTTP client for the dispatch assistant backend.
pub struct AssistantClient {
    client: Client,
    endpoint: String,
}

impl AssistantClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim_end_matches('/'))
    }

    /// Opens a streaming exchange and returns the event stream.
    ///
    /// The request is an HTTP POST with a form-urlencoded body (`message`,
    /// `chatId`) declaring `Accept: text/event-stream`. The returned
    /// stream ends after `ChatEvent::Complete`, after a single transport
    /// error, or when the server closes the connection (a trailing
    /// unterminated frame is flushed in that case).
    ///
    /// Cancellation is cooperative: dropping the stream aborts the
    /// underlying request, and a dropped stream never yields `Complete`.
    pub async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<ChatEvent, StreamError>> + Send>>, StreamError>
    {
        let url = self.url("chat/sse_emitter");

        let response = self
            .client
            .post(&url)
            .header("Accept", "text/event-stream")
            .form(&[
                ("message", request.message.as_str()),
                ("chatId", request.chat_id.as_str()),
            ])
            .send()
            .await
            .map_err(StreamError::Connect)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Status { status, body });
        }

        let mut byte_stream = response.bytes_stream();

        let event_stream = async_stream::stream! {
            use futures_util::StreamExt;

            let mut dispatcher = StreamDispatcher::new();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        for event in dispatcher.feed(&chunk) {
                            let done = matches!(event, ChatEvent::Complete);
                            yield Ok(event);
                            if done {
                                // Terminal event: stop reading.
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(StreamError::Read(e));
                        return;
                    }
                }
            }

            for event in dispatcher.finish() {
                yield Ok(event);
            }
        };

        Ok(Box::pin(event_stream))
    }

    /// Non-streaming fallback: one ordinary request/response exchange.
    ///
    /// Returns the complete answer plus the elapsed wall-clock duration.
    /// There are no partial-result semantics.
    pub async fn chat_sync(&self, request: &ChatRequest) -> Result<SyncReply> {
        let started = Instant::now();
        let url = self.url("chat/sync");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("message", request.message.as_str()),
                ("chatId", request.chat_id.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to connect to assistant endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Assistant request failed with status {status}: {body}");
        }

        let content = response
            .text()
            .await
            .context("Failed to read assistant response")?;

        Ok(SyncReply {
            content,
            elapsed: started.elapsed(),
        })
    }

    /// Fetches the backend's chat history list, strictly typed at the
    /// boundary. Used for opportunistic sync of the local metadata cache.
    pub async fn history_list(&self) -> Result<Vec<ChatRecord>> {
        let url = self.url("chat/history/list");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to connect to assistant endpoint: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "History request failed with status {}",
                response.status()
            );
        }

        response
            .json::<Vec<ChatRecord>>()
            .await
            .context("Failed to parse history list")
    }
}
