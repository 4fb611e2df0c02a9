//! Command-line interface definition for Scoremate
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// Scoremate - credit-score assistant
///
/// Chat with a language model that knows the customer dataset: mention a
/// customer ID and the matching record is added to the model's context.
#[derive(Parser, Debug, Clone)]
#[command(name = "scoremate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SCOREMATE_CONFIG")]
    pub config: Option<String>,

    /// Dataset location (file path or http(s) URL), overrides config
    #[arg(short, long, global = true)]
    pub dataset: Option<String>,

    /// Model identifier, overrides config
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Scoremate
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show the context block for one customer (no network)
    Lookup {
        /// Customer identifier
        id: String,
    },

    /// Show dataset statistics (no network)
    Stats {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that the chat service answers with the configured credentials
    Ping,

    /// Store the chat service API key in the OS keyring
    Auth {
        /// Delete the stored key instead
        #[arg(long)]
        remove: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            dataset: None,
            model: None,
            verbose: false,
            json_logs: false,
            command: Commands::Chat,
        }
    }
}
