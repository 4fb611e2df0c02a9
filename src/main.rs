//! Scoremate - credit-score assistant CLI
//!
//! Main entry point for the scoremate binary.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scoremate::cli::{Cli, Commands};
use scoremate::commands;
use scoremate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config = Config::load(cli.config.as_deref(), &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { message } => {
            tracing::debug!("Sending one-shot question");
            commands::ask::run_ask(config, message.join(" ")).await?;
            Ok(())
        }
        Commands::Lookup { id } => {
            commands::lookup::run_lookup(config, id).await?;
            Ok(())
        }
        Commands::Stats { json } => {
            commands::stats::run_stats(config, json).await?;
            Ok(())
        }
        Commands::Ping => {
            commands::ping::run_ping(config).await?;
            Ok(())
        }
        Commands::Auth { remove } => {
            commands::auth::authenticate(config, remove).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set. Logs go to stderr.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "scoremate=debug" } else { "scoremate=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
