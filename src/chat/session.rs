//! Chat session
//!
//! A [`ChatSession`] owns one transcript and sends at most one request at a
//! time. A submission made while another is pending is rejected with
//! [`SessionError::Busy`]; there is no queue and no cancellation.
//!
//! Service failures do not end the session. They are turned into an
//! assistant turn carrying the failure's user-facing message, and the next
//! submission proceeds normally.

use crate::chat::assembler::ContextAssembler;
use crate::chat::conversation::{Transcript, Turn};
use crate::chat::metrics::RequestMetrics;
use crate::error::ServiceError;
use crate::providers::ChatProvider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Reasons a submission is not sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Another submission is still waiting for its reply
    #[error("a message is already being sent; wait for the reply")]
    Busy,
    /// Nothing to send
    #[error("message is empty")]
    EmptyMessage,
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReply {
    /// Text appended to the transcript as the assistant's turn
    pub text: String,
    /// The classified failure, when `text` is a failure notice
    pub error: Option<ServiceError>,
}

impl SessionReply {
    /// Whether the reply came from the model
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Clears the busy flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One interactive conversation
pub struct ChatSession {
    id: Uuid,
    assembler: ContextAssembler,
    provider: Arc<dyn ChatProvider>,
    transcript: Mutex<Transcript>,
    busy: AtomicBool,
}

impl ChatSession {
    /// Start a session opened by the assistant greeting
    pub fn new(assembler: ContextAssembler, provider: Arc<dyn ChatProvider>) -> Self {
        Self::with_transcript(assembler, provider, Transcript::with_greeting())
    }

    /// Start a session with an existing transcript
    pub fn with_transcript(
        assembler: ContextAssembler,
        provider: Arc<dyn ChatProvider>,
        transcript: Transcript,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, provider = provider.name(), "Chat session started");
        Self {
            id,
            assembler,
            provider,
            transcript: Mutex::new(transcript),
            busy: AtomicBool::new(false),
        }
    }

    /// Session identifier, used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The assembler requests are built with
    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// Whether a submission is pending
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Copy of the transcript so far
    pub async fn transcript(&self) -> Transcript {
        self.transcript.lock().await.clone()
    }

    /// Drop the conversation and start over with the greeting
    pub async fn reset(&self) {
        self.transcript.lock().await.reset();
    }

    /// Send `message` and record the exchange
    ///
    /// The user turn is appended before the request is sent; the reply (or
    /// the failure notice) is appended once it arrives. The request carries
    /// the transcript as it was before `message`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while another submission is pending,
    /// [`SessionError::EmptyMessage`] for blank input. Service failures are
    /// not errors here; they come back in [`SessionReply::error`].
    pub async fn submit(&self, message: &str) -> std::result::Result<SessionReply, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(session = %self.id, "Rejected submission while busy");
            return Err(SessionError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let history = {
            let mut transcript = self.transcript.lock().await;
            let history = transcript.turns().to_vec();
            transcript.push(Turn::user(message));
            history
        };

        let request = self.assembler.build_request(message, &history).await;

        let metrics = RequestMetrics::start(self.provider.name());
        let outcome = self.provider.send(&request).await;

        let reply = match outcome {
            Ok(reply) => {
                metrics.record_success(reply.usage.map(|u| u.total_tokens));
                SessionReply {
                    text: reply.content,
                    error: None,
                }
            }
            Err(e) => {
                metrics.record_failure(e.kind());
                tracing::warn!(session = %self.id, kind = e.kind(), "Chat request failed: {}", e);
                SessionReply {
                    text: e.user_message(),
                    error: Some(e),
                }
            }
        };

        self.transcript
            .lock()
            .await
            .push(Turn::assistant(reply.text.clone()));

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatSettings;
    use crate::chat::Sender;
    use crate::dataset::{parse_dataset, DatasetStore};
    use crate::providers::{ChatRequest, Reply};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    /// Provider returning scripted outcomes and recording requests
    struct ScriptedProvider {
        outcomes: StdMutex<Vec<std::result::Result<Reply, ServiceError>>>,
        requests: StdMutex<Vec<ChatRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<std::result::Result<Reply, ServiceError>>) -> Self {
            Self {
                outcomes: StdMutex::new(outcomes),
                requests: StdMutex::new(Vec::new()),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn send(&self, request: &ChatRequest) -> std::result::Result<Reply, ServiceError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes.lock().unwrap().remove(0)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn assembler() -> ContextAssembler {
        let store = DatasetStore::from_dataset(parse_dataset("CUST_ID\nC03PVPPHOY\n", "test"));
        ContextAssembler::new(Arc::new(store), ChatSettings::default())
    }

    #[tokio::test]
    async fn test_successful_exchange_is_recorded() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Reply::new("Scores range..."))]));
        let session = ChatSession::new(assembler(), provider.clone());

        let reply = session.submit("  how do scores work?  ").await.unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.text, "Scores range...");

        let transcript = session.transcript().await;
        let turns = transcript.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].sender, Sender::User);
        assert_eq!(turns[1].text, "how do scores work?");
        assert_eq!(turns[2].text, "Scores range...");

        // greeting sent as history, new message last
        let requests = provider.requests.lock().unwrap();
        let sent = &requests[0].messages;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].content, "how do scores work?");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_failure_becomes_assistant_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ServiceError::RateLimited),
            Ok(Reply::new("ok now")),
        ]));
        let session = ChatSession::new(assembler(), provider);

        let reply = session.submit("hello").await.unwrap();
        assert_eq!(reply.error, Some(ServiceError::RateLimited));
        assert_eq!(reply.text, ServiceError::RateLimited.user_message());

        let transcript = session.transcript().await;
        let last = transcript.turns().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.text, ServiceError::RateLimited.user_message());

        let retry = session.submit("hello again").await.unwrap();
        assert!(retry.is_success());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let session = ChatSession::new(assembler(), provider);
        assert_eq!(session.submit("   ").await, Err(SessionError::EmptyMessage));
        assert_eq!(session.transcript().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected_while_busy() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(ScriptedProvider {
            outcomes: StdMutex::new(vec![Ok(Reply::new("first"))]),
            requests: StdMutex::new(Vec::new()),
            gate: Some(gate.clone()),
        });
        let session = Arc::new(ChatSession::new(assembler(), provider.clone()));

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit("first question").await })
        };

        while provider.requests.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(session.is_busy());
        assert_eq!(session.submit("second question").await, Err(SessionError::Busy));

        gate.notify_one();
        let first = pending.await.unwrap().unwrap();
        assert_eq!(first.text, "first");
        assert!(!session.is_busy());
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Reply::new("hi"))]));
        let session = ChatSession::new(assembler(), provider);
        session.submit("hello").await.unwrap();
        session.reset().await;
        assert_eq!(session.transcript().await.len(), 1);
    }
}
