//! Base provider trait and common types for Scoremate
//!
//! This module defines the [`ChatProvider`] trait implemented by chat
//! completion backends, along with the request and reply types exchanged
//! with them. [`ChatRequest`] serializes directly to the body of an
//! OpenAI-compatible `/chat/completions` call.

use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a message in the outbound conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and context for the model
    System,
    /// The person chatting
    User,
    /// The model's earlier replies
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message structure for conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::providers::{Message, Role};
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, Role::System);
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling and length settings sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Nucleus-sampling parameter
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

/// Outbound chat completion request
///
/// Serializes to the OpenAI-compatible request body. Streaming is always
/// off.
///
/// # Examples
///
/// ```
/// use scoremate::providers::{ChatRequest, Message, SamplingParams};
///
/// let request = ChatRequest::new(
///     "llama-3.1-8b-instant",
///     vec![Message::user("hi")],
///     SamplingParams::default(),
/// );
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["stream"], false);
/// assert_eq!(body["max_tokens"], 1024);
/// assert_eq!(body["messages"][0]["role"], "user");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Ordered conversation
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Nucleus-sampling parameter
    pub top_p: f32,
    /// Always `false`
    pub stream: bool,
}

impl ChatRequest {
    /// Package messages with model and sampling settings
    pub fn new(model: impl Into<String>, messages: Vec<Message>, params: SamplingParams) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stream: false,
        }
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reply text from a successful completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The assistant's reply
    pub content: String,
    /// Token usage, when the service reported it
    pub usage: Option<TokenUsage>,
}

impl Reply {
    /// Create a reply without usage information
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Chat completion backend
///
/// Implementations perform exactly one call per `send`; retries, if any,
/// are the caller's decision.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a request and return the reply text
    ///
    /// # Errors
    ///
    /// Returns a classified [`ServiceError`] when the service could not be
    /// reached, answered with a non-success status, or sent a success body
    /// without a reply.
    async fn send(&self, request: &ChatRequest) -> std::result::Result<Reply, ServiceError>;

    /// Short provider name used in logs and the keyring
    fn name(&self) -> &str;
}
