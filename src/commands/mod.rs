/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`   - Interactive chat mode
- `ask`    - Send a single question
- `lookup` - Show one customer's context block
- `stats`  - Show dataset statistics
- `ping`   - Test the chat service connection
- `auth`   - Store or remove the API key in the OS keyring

`lookup` and `stats` work offline; the others need an API key.
*/

use crate::chat::{ChatSession, ChatSettings, ContextAssembler, Sender, Transcript};
use crate::config::Config;
use crate::context::{format_not_found, format_record};
use crate::credentials::resolve_api_key;
use crate::dataset::{Dataset, DatasetStore, Statistics};
use crate::error::{Result, ScoremateError};
use crate::providers::{create_provider, ChatProvider};
use colored::Colorize;
use prettytable::{format, row, Table};
use serde::Serialize;
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

/// Create the dataset store for `config`
fn build_store(config: &Config) -> Result<Arc<DatasetStore>> {
    Ok(Arc::new(DatasetStore::from_config(&config.dataset)?))
}

/// Resolve credentials and create the configured provider
fn build_provider(config: &Config) -> Result<Arc<dyn ChatProvider>> {
    let api_key = resolve_api_key(&config.provider)?;
    let provider = create_provider(&config.provider, api_key)?;
    Ok(Arc::from(provider))
}

/// Context block for `id`: the formatted record, or the not-found notice
///
/// # Examples
///
/// ```
/// use scoremate::commands::render_lookup;
/// use scoremate::dataset::parse_dataset;
///
/// let dataset = parse_dataset("CUST_ID,CREDIT_SCORE\nC1,640\n", "inline");
/// assert!(render_lookup(&dataset, "c1").starts_with("USER DATA FOR CUST_ID: C1"));
/// assert!(render_lookup(&dataset, "C2").contains("\"C2\" was not found"));
/// ```
pub fn render_lookup(dataset: &Dataset, id: &str) -> String {
    match dataset.find(id) {
        Some(record) => format_record(record),
        None => format_not_found(id.trim()),
    }
}

/// [`render_lookup`] against the dataset held by `store`, loading it first
pub async fn lookup_in_store(store: &DatasetStore, id: &str) -> String {
    let dataset = store.load().await;
    render_lookup(&dataset, id)
}

/// Machine-readable statistics report
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Where the dataset was loaded from
    pub source: String,
    /// Whether the dataset could not be loaded
    pub fallback: bool,
    /// Aggregate statistics, absent for the fallback dataset
    pub statistics: Option<Statistics>,
    /// Default rate in percent, rounded to two decimals
    pub default_rate_percent: Option<f64>,
}

impl StatsReport {
    /// Build the report for `dataset`
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let statistics = dataset.statistics().copied();
        Self {
            source: dataset.source().to_string(),
            fallback: dataset.is_fallback(),
            default_rate_percent: statistics
                .map(|s| (s.default_rate() * 10_000.0).round() / 100.0),
            statistics,
        }
    }
}

/// Render statistics as a two-column table
fn stats_table(stats: &Statistics) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Metric".bold(), "Value".bold()]);
    table.add_row(row!["Total records", stats.total_records]);
    table.add_row(row!["Scored records", stats.scored]);
    table.add_row(row!["Average credit score", stats.average]);
    table.add_row(row!["Minimum credit score", stats.min]);
    table.add_row(row!["Maximum credit score", stats.max]);
    table.add_row(row!["Defaulted", stats.defaulted]);
    table.add_row(row![
        "Default rate",
        format!("{:.2}%", stats.default_rate() * 100.0)
    ]);
    table
}

/// Print statistics for `dataset`, or a notice for the fallback dataset
fn print_stats(dataset: &Dataset) {
    match dataset.statistics() {
        Some(stats) => {
            println!("\nDataset statistics ({}):", dataset.source().cyan());
            stats_table(stats).printstd();
            println!();
        }
        None => println!(
            "{}",
            "Dataset unavailable; the assistant is using general credit score information."
                .yellow()
        ),
    }
}

/// [`print_stats`] for the dataset held by `store`
async fn print_store_stats(store: &DatasetStore) {
    let dataset = store.load().await;
    print_stats(&dataset);
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Starts the dataset load in the background, creates a [`ChatSession`]
    //! and runs a readline loop. Replies and failure notices are printed as
    //! assistant lines; no failure ends the loop.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing or the terminal cannot be
    /// set up.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let store = build_store(&config)?;
        let preload = store.preload();

        let provider = build_provider(&config)?;
        let assembler = ContextAssembler::new(Arc::clone(&store), ChatSettings::from_config(&config));
        let session = ChatSession::new(assembler, provider);
        tracing::debug!(session = %session.id(), "Session ready");

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);
        if let Some(greeting) = session.transcript().await.turns().first() {
            print_assistant(&greeting.text);
        }

        loop {
            let prompt = format!("{} ", "You:".green().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Stats) => {
                            print_store_stats(&store).await;
                            continue;
                        }
                        Ok(SpecialCommand::Lookup(id)) => {
                            println!("\n{}", lookup_in_store(&store, &id).await);
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            print_transcript(&session.transcript().await);
                            continue;
                        }
                        Ok(SpecialCommand::Clear) => {
                            session.reset().await;
                            println!("{}", "Conversation cleared.".yellow());
                            if let Some(greeting) = session.transcript().await.turns().first() {
                                print_assistant(&greeting.text);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    println!("{}", "Thinking...".dimmed());
                    match session.submit(trimmed).await {
                        Ok(reply) if reply.is_success() => print_assistant(&reply.text),
                        Ok(reply) => print_failure(&reply.text),
                        Err(e) => eprintln!("{}", e.to_string().yellow()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("EOF");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        preload.abort();
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome_banner(config: &Config) {
        println!();
        println!("{}", "Scoremate credit score assistant".bold());
        println!(
            "Provider: {}  Model: {}",
            config.provider.provider_type.cyan(),
            config.provider.model.cyan()
        );
        println!("Type {} for commands, {} to leave.\n", "/help".cyan(), "exit".cyan());
    }

    fn print_assistant(text: &str) {
        println!("{} {}\n", "Assistant:".blue().bold(), text);
    }

    fn print_failure(text: &str) {
        println!("{} {}\n", "Assistant:".blue().bold(), text.red());
    }

    fn print_transcript(transcript: &Transcript) {
        println!();
        for turn in transcript.turns() {
            let who = match turn.sender {
                Sender::User => "You".green().bold(),
                Sender::Assistant => "Assistant".blue().bold(),
            };
            println!("[{}] {}: {}", turn.at.format("%H:%M:%S"), who, turn.text);
        }
        println!();
    }
}

// One-shot question handler
pub mod ask {
    use super::*;

    /// Send one question with no prior history and print the reply
    ///
    /// # Errors
    ///
    /// Returns the classified service failure after printing its message, so
    /// the process exits non-zero.
    pub async fn run_ask(config: Config, message: String) -> Result<()> {
        let store = build_store(&config)?;
        let provider = build_provider(&config)?;
        let assembler = ContextAssembler::new(store, ChatSettings::from_config(&config));
        let session = ChatSession::with_transcript(assembler, provider, Transcript::new());

        let reply = session.submit(&message).await?;
        match reply.error {
            None => {
                println!("{}", reply.text);
                Ok(())
            }
            Some(e) => {
                eprintln!("{}", reply.text.red());
                Err(e.into())
            }
        }
    }
}

// Offline record lookup
pub mod lookup {
    use super::*;

    /// Print the context block the assistant would receive for `id`
    pub async fn run_lookup(config: Config, id: String) -> Result<()> {
        let store = build_store(&config)?;
        println!("{}", lookup_in_store(&store, &id).await);
        Ok(())
    }
}

// Offline statistics
pub mod stats {
    use super::*;

    /// Print dataset statistics as a table, or as JSON with `json`
    ///
    /// # Errors
    ///
    /// Returns `ScoremateError::Serialization` if JSON output fails
    pub async fn run_stats(config: Config, json: bool) -> Result<()> {
        let store = build_store(&config)?;
        let dataset = store.load().await;

        if json {
            let report = StatsReport::from_dataset(&dataset);
            let out = serde_json::to_string_pretty(&report).map_err(ScoremateError::Serialization)?;
            println!("{}", out);
        } else {
            print_stats(&dataset);
        }
        Ok(())
    }
}

// Connection test
pub mod ping {
    use super::*;
    use crate::providers::{ChatRequest, Message, SamplingParams};

    /// Phrase the service is asked to repeat
    pub const PING_PROMPT: &str =
        "Hello! This is a connection test. Please reply with 'Connection successful'.";

    /// Send a minimal request and report the outcome
    ///
    /// # Errors
    ///
    /// Returns the classified failure when the service does not answer.
    pub async fn run_ping(config: Config) -> Result<()> {
        let provider = build_provider(&config)?;
        let request = ping_request(&config.provider.model);

        tracing::info!(provider = provider.name(), "Testing chat service connection");
        match provider.send(&request).await {
            Ok(reply) => {
                println!("{} {}", "Connection OK:".green().bold(), reply.content);
                Ok(())
            }
            Err(e) => {
                eprintln!("{} {}", "Connection failed:".red().bold(), e.user_message());
                Err(e.into())
            }
        }
    }

    /// The request sent by `ping`
    pub fn ping_request(model: &str) -> ChatRequest {
        ChatRequest::new(
            model,
            vec![Message::user(PING_PROMPT)],
            SamplingParams {
                max_tokens: 50,
                ..SamplingParams::default()
            },
        )
    }

}

// API key management
pub mod auth {
    use super::*;
    use crate::credentials::{delete_from_keyring, save_to_keyring};
    use rustyline::DefaultEditor;

    /// Prompt for an API key and store it, or delete the stored key
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `remove` - Delete the stored key instead of prompting
    pub async fn authenticate(config: Config, remove: bool) -> Result<()> {
        let provider = config.provider.provider_type.clone();

        if remove {
            delete_from_keyring(&provider)?;
            println!("{}", format!("Removed stored API key for {}", provider).green());
            return Ok(());
        }

        println!(
            "Enter the API key for {}. It will be stored in the OS keyring.",
            provider.cyan()
        );
        let mut rl = DefaultEditor::new()?;
        let key = rl.readline("API key: ")?;
        store_key(&provider, &key)?;
        println!("{}", format!("API key for {} stored.", provider).green());
        Ok(())
    }

    /// Validate and store `key` for `provider`
    ///
    /// # Errors
    ///
    /// Returns `ScoremateError::Config` for a blank key, before touching the
    /// keyring.
    pub fn store_key(provider: &str, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ScoremateError::Config("API key must not be empty".to_string()).into());
        }
        save_to_keyring(provider, key)?;
        tracing::info!(provider, "Stored API key in keyring");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::assert_error_contains;

        #[test]
        fn test_blank_key_rejected() {
            assert_error_contains(store_key("groq", "   "), "must not be empty");
        }
    }
}
