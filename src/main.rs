//! Deskmate interactive shell.
//!
//! Reads one message per line from stdin and prints the reply.
//! `:memory` dumps remembered data as JSON; `:quit` (or EOF) exits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use deskmate::config;
use deskmate::inference::OllamaClient;
use deskmate::Assistant;

const PROMPT: &str = "you> ";

#[tokio::main]
async fn main() -> Result<()> {
    let cwd = std::env::current_dir().context("cannot resolve working directory")?;
    let (config, config_path) =
        config::load_or_default(&cwd).context("failed to load configuration")?;

    let data_dir = deskmate::data_dir();
    let log_path = deskmate::logging::init_tracing(&data_dir)
        .with_context(|| format!("failed to initialise logging in {}", data_dir.display()))?;

    tracing::info!(
        config = ?config_path.as_ref().map(|p| p.display().to_string()),
        "configuration loaded"
    );

    let client = Arc::new(
        OllamaClient::new(
            &config.llm.base_url,
            Duration::from_secs(config.llm.timeout_secs),
        )
        .context("failed to build model client")?,
    );
    if !client.health_check().await {
        tracing::warn!(base_url = %config.llm.base_url, "model endpoint not reachable");
        eprintln!(
            "warning: no model server at {} (classification of free text will fail)",
            config.llm.base_url
        );
    }

    let assistant = Assistant::from_config(&config, client, &data_dir)
        .context("failed to start assistant")?;

    println!("Deskmate {} (log: {})", env!("CARGO_PKG_VERSION"), log_path.display());
    println!("Type a message, :memory to inspect memory, :quit to exit.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            ":quit" | ":exit" => break,
            ":memory" => match assistant.memory().summary_json() {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("error: {e}"),
            },
            _ => match assistant.handle(input).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => {
                    tracing::error!(error = %e, "turn failed");
                    eprintln!("error: {e}");
                }
            },
        }
    }

    tracing::info!("=== Deskmate exiting ===");
    Ok(())
}
