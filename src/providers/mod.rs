//! Provider module for Scoremate
//!
//! This module contains the chat completion provider abstraction and the
//! OpenAI-compatible implementation used for Groq and OpenAI.

pub mod base;
pub mod openai;

pub use base::{ChatProvider, ChatRequest, Message, Reply, Role, SamplingParams, TokenUsage};
pub use openai::OpenAiCompatibleProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, ScoremateError};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `api_key` - Resolved API key
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_provider(config: &ProviderConfig, api_key: String) -> Result<Box<dyn ChatProvider>> {
    match config.provider_type.as_str() {
        "groq" | "openai" => Ok(Box::new(OpenAiCompatibleProvider::new(
            config.clone(),
            api_key,
        )?)),
        other => Err(ScoremateError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
