//! Scoremate - credit-score assistant library
//!
//! This library provides the chat backend of a credit-score analysis site:
//! a customer dataset loaded once and shared, identifier extraction from
//! free text, system prompt assembly, and a client for OpenAI-compatible
//! chat completion services.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `dataset`: CSV parsing, statistics, lookup, and the load-once store
//! - `extractor`: customer identifier extraction from user messages
//! - `context`: rendering of records and statistics as prompt text
//! - `prompts`: the assistant's system prompt
//! - `providers`: chat completion provider abstraction and implementation
//! - `chat`: transcript, request assembly, and the chat session
//! - `config`: configuration management and validation
//! - `credentials`: API key resolution (environment, keyring)
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scoremate::{ChatSession, ChatSettings, Config, ContextAssembler, DatasetStore};
//! use scoremate::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None, &Default::default())?;
//!     config.validate()?;
//!
//!     let store = Arc::new(DatasetStore::from_config(&config.dataset)?);
//!     let key = scoremate::credentials::resolve_api_key(&config.provider)?;
//!     let provider = create_provider(&config.provider, key)?;
//!     let assembler = ContextAssembler::new(store, ChatSettings::from_config(&config));
//!     let session = ChatSession::new(assembler, Arc::from(provider));
//!
//!     let reply = session.submit("What is customer C03PVPPHOY's score?").await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod credentials;
pub mod dataset;
pub mod error;
pub mod extractor;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use chat::{ChatSession, ChatSettings, ContextAssembler, Transcript, Turn};
pub use config::Config;
pub use dataset::{Dataset, DatasetStore, Record, Statistics};
pub use error::{Result, ScoremateError, ServiceError};
pub use extractor::extract_identifier;

#[cfg(test)]
pub mod test_utils;
