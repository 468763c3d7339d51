use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mull::config::{self, LlmConfig};
use mull::{chat, web_server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the decision-assistant web server.
    Serve {
        #[arg(long, default_value_t = config::DEFAULT_PORT, help = "Port for the web server.")]
        port: u16,
    },
    /// Chat with the decision assistant in the terminal.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Initialize tracing (logging) subscriber
    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,mull=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let llm = LlmConfig::from_env();

    match cli.command {
        Commands::Serve { port } => {
            info!("Starting decision assistant on port {}...", port);
            web_server::start_web_server(port, llm)
                .await
                .context("Web server failed")?;
        }
        Commands::Chat => {
            chat::run_chat(llm).await.context("Chat session failed")?;
        }
    }

    Ok(())
}
