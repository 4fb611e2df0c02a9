//! API key resolution
//!
//! The key is never read from the configuration file. Lookup order:
//!
//! 1. the environment variable named by `provider.api_key_env`
//!    (`SCOREMATE_API_KEY` by default),
//! 2. `GROQ_API_KEY` when the provider is `groq`, `OPENAI_API_KEY` when it is
//!    `openai`,
//! 3. the OS keyring entry written by `scoremate auth`.

use crate::config::ProviderConfig;
use crate::error::{Result, ScoremateError};

/// Keyring service name
pub const KEYRING_SERVICE: &str = "scoremate";

/// Resolve the API key for `config`
///
/// # Errors
///
/// Returns [`ScoremateError::MissingCredentials`] when no source has a key,
/// or [`ScoremateError::Keyring`] when the keyring itself fails.
pub fn resolve_api_key(config: &ProviderConfig) -> Result<String> {
    if let Some(key) = from_env(config) {
        return Ok(key);
    }

    match load_from_keyring(&config.provider_type)? {
        Some(key) => {
            tracing::debug!(provider = %config.provider_type, "Using API key from keyring");
            Ok(key)
        }
        None => Err(ScoremateError::MissingCredentials(format!(
            "{} (set {} or run `scoremate auth`)",
            config.provider_type, config.api_key_env
        ))
        .into()),
    }
}

/// API key from the environment, if any
pub fn from_env(config: &ProviderConfig) -> Option<String> {
    let vendor_var = match config.provider_type.as_str() {
        "groq" => Some("GROQ_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    };

    std::iter::once(config.api_key_env.as_str())
        .chain(vendor_var)
        .find_map(|var| {
            std::env::var(var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| {
                    tracing::debug!(var, "Using API key from environment");
                    v
                })
        })
}

/// Load the stored key for `provider`
///
/// Returns `Ok(None)` when nothing was stored.
pub fn load_from_keyring(provider: &str) -> Result<Option<String>> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, provider)?;
    match entry.get_password() {
        Ok(key) => Ok(Some(key)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(ScoremateError::Keyring(e).into()),
    }
}

/// Store `key` for `provider`
pub fn save_to_keyring(provider: &str, key: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, provider)?;
    entry.set_password(key)?;
    Ok(())
}

/// Delete the stored key for `provider`; a missing entry is not an error
pub fn delete_from_keyring(provider: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, provider)?;
    match entry.delete_password() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(ScoremateError::Keyring(e).into()),
    }
}
