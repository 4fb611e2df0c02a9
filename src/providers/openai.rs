//! OpenAI-compatible chat completion provider
//!
//! Talks to any service exposing `POST {base}/chat/completions` with bearer
//! authentication (Groq by default). One HTTP call per `send`, no retry.
//!
//! Failures are classified into [`ServiceError`]:
//!
//! - no response received (connect error, timeout) → `Network`
//! - 401 / 429 / 400 / 5xx / other → `Unauthorized` / `RateLimited` /
//!   `BadRequest` / `Server` / `Unknown`
//! - 2xx whose body lacks `choices[0].message` → `MalformedResponse`

use crate::config::ProviderConfig;
use crate::error::{Result, ScoremateError, ServiceError};
use crate::providers::{ChatProvider, ChatRequest, Reply, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Reply used when the service answers with an empty message
pub const EMPTY_REPLY: &str = "Sorry, I could not generate a response.";

/// OpenAI-compatible API provider
///
/// # Examples
///
/// ```no_run
/// use scoremate::config::ProviderConfig;
/// use scoremate::providers::{
///     ChatProvider, ChatRequest, Message, OpenAiCompatibleProvider, SamplingParams,
/// };
///
/// # async fn example() -> scoremate::error::Result<()> {
/// let provider = OpenAiCompatibleProvider::new(ProviderConfig::default(), "gsk_...")?;
/// let request = ChatRequest::new(
///     "llama-3.1-8b-instant",
///     vec![Message::user("Hello!")],
///     SamplingParams::default(),
/// );
/// let reply = provider.send(&request).await;
/// # Ok(())
/// # }
/// ```
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("provider", &self.config.provider_type)
            .field("base_url", &self.config.base_url())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Response body of a chat completion
#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Option<Vec<CompletionChoice>>,
    #[serde(default)]
    usage: Option<UsageBody>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

/// Error body: `{"error": {"message": "...", "code": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Provider configuration (base URL, timeout)
    /// * `api_key` - Bearer token for the service
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("scoremate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScoremateError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized {} provider: base={}, model={}",
            config.provider_type,
            config.base_url(),
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Full URL of the completions endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::config::ProviderConfig;
    /// use scoremate::providers::OpenAiCompatibleProvider;
    ///
    /// let provider = OpenAiCompatibleProvider::new(ProviderConfig::default(), "key").unwrap();
    /// assert_eq!(
    ///     provider.completions_url(),
    ///     "https://api.groq.com/openai/v1/chat/completions"
    /// );
    /// ```
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn error_detail(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message.or(e.code))
            .filter(|m| !m.trim().is_empty())
    }

    fn parse_success(body: &str) -> std::result::Result<Reply, ServiceError> {
        let parsed: CompletionBody = serde_json::from_str(body)
            .map_err(|e| ServiceError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let message = parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .ok_or_else(|| {
                ServiceError::MalformedResponse("missing choices[0].message".to_string())
            })?;

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());

        Ok(Reply {
            content,
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<Reply, ServiceError> {
        let url = self.completions_url();

        tracing::debug!(
            url = %url,
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat completion request failed: {}", e);
                ServiceError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read chat completion response: {}", e);
            ServiceError::Network(e.to_string())
        })?;

        if !status.is_success() {
            let detail = Self::error_detail(&body);
            tracing::error!(
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "Chat service returned an error"
            );
            return Err(ServiceError::from_status(status.as_u16(), detail));
        }

        let reply = Self::parse_success(&body).map_err(|e| {
            tracing::error!("Unexpected chat completion response: {}", e);
            e
        })?;

        if let Some(usage) = reply.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        Ok(reply)
    }

    fn name(&self) -> &str {
        &self.config.provider_type
    }
}
