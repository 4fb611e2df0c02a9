//! Outbound request assembly
//!
//! [`ContextAssembler::build_request`] turns a user message and the chat
//! transcript into one [`ChatRequest`]:
//!
//! 1. the dataset is loaded (or awaited, if a load is in flight);
//! 2. an identifier is extracted from the message;
//! 3. a found record is formatted, a missing one becomes a not-found notice;
//! 4. the system prompt is composed from the role text, the dataset summary,
//!    the optional customer block and the fixed guidance;
//! 5. the last `history_window` turns follow, in order;
//! 6. the new user message closes the list.

use crate::chat::conversation::{recent, Turn};
use crate::config::Config;
use crate::context::{format_dataset_summary, format_not_found, format_record};
use crate::dataset::{Dataset, DatasetStore};
use crate::extractor::extract_identifier;
use crate::prompts::build_system_prompt;
use crate::providers::{ChatRequest, Message, SamplingParams};
use std::sync::Arc;

/// Model and shaping settings applied to every request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Model identifier
    pub model: String,
    /// Sampling settings
    pub sampling: SamplingParams,
    /// Number of transcript turns sent with each request
    pub history_window: usize,
}

impl ChatSettings {
    /// Settings taken from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.provider.model.clone(),
            sampling: config.chat.sampling(),
            history_window: config.chat.history_window,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Customer data attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerContext {
    /// No identifier in the message
    None,
    /// Identifier matched a record
    Found(String),
    /// Identifier matched nothing
    NotFound(String),
}

impl CustomerContext {
    /// Resolve the customer mentioned in `message` against `dataset`
    pub fn resolve(message: &str, dataset: &Dataset) -> Self {
        match extract_identifier(message) {
            None => Self::None,
            Some(id) => match dataset.find(&id) {
                Some(record) => Self::Found(record.id().to_string()),
                None => Self::NotFound(id),
            },
        }
    }
}

/// Builds outbound chat requests from transcript and dataset
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    store: Arc<DatasetStore>,
    settings: ChatSettings,
}

impl ContextAssembler {
    /// Create an assembler reading from `store`
    pub fn new(store: Arc<DatasetStore>, settings: ChatSettings) -> Self {
        Self { store, settings }
    }

    /// The dataset store this assembler reads from
    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// Active settings
    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Compose the system prompt for `user_message`
    ///
    /// Returns the prompt and the customer the message referred to.
    pub async fn system_prompt(&self, user_message: &str) -> (String, CustomerContext) {
        let dataset = self.store.load().await;
        let customer = CustomerContext::resolve(user_message, &dataset);

        let customer_block = match &customer {
            CustomerContext::None => None,
            CustomerContext::Found(id) => dataset.find(id).map(format_record),
            CustomerContext::NotFound(id) => Some(format_not_found(id)),
        };

        match &customer {
            CustomerContext::Found(id) => tracing::info!(customer = %id, "Found customer data"),
            CustomerContext::NotFound(id) => {
                tracing::info!(customer = %id, "Customer ID not found in dataset")
            }
            CustomerContext::None => {}
        }

        let summary = format_dataset_summary(dataset.statistics());
        (
            build_system_prompt(&summary, customer_block.as_deref()),
            customer,
        )
    }

    /// Build the request for `user_message` following `history`
    ///
    /// `history` is the transcript before the new message, oldest first. Only
    /// the last `history_window` turns are included.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use scoremate::chat::{ChatSettings, ContextAssembler, Turn};
    /// use scoremate::dataset::{parse_dataset, DatasetStore};
    /// use scoremate::providers::Role;
    ///
    /// # tokio_test_block_on(async {
    /// let store = DatasetStore::from_dataset(parse_dataset("CUST_ID\nC03PVPPHOY\n", "inline"));
    /// let assembler = ContextAssembler::new(Arc::new(store), ChatSettings::default());
    /// let history = vec![Turn::assistant("Hello!")];
    /// let request = assembler.build_request("customer C03PVPPHOY", &history).await;
    /// assert_eq!(request.messages.len(), 3);
    /// assert_eq!(request.messages[0].role, Role::System);
    /// assert!(request.messages[0].content.contains("USER DATA FOR CUST_ID: C03PVPPHOY"));
    /// # });
    /// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
    /// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
    /// # }
    /// ```
    pub async fn build_request(&self, user_message: &str, history: &[Turn]) -> ChatRequest {
        let (system_prompt, _) = self.system_prompt(user_message).await;

        let window = recent(history, self.settings.history_window);
        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(window.iter().map(Turn::to_message));
        messages.push(Message::user(user_message));

        tracing::debug!(
            history = history.len(),
            sent = window.len(),
            "Assembled chat request"
        );

        ChatRequest::new(self.settings.model.clone(), messages, self.settings.sampling)
    }
}
