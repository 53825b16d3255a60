//! MovieMuse server binary
//!
//! Run with: cargo run -p moviemuse --bin moviemuse-server

use anyhow::Context;
use clap::Parser;
use moviemuse::{config::RagConfig, generation::OllamaClient, startup, RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moviemuse-server", version, about = "Movie Q&A chat over the top movies dataset")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "MOVIEMUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind (overrides config and MOVIEMUSE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config and MOVIEMUSE_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Movies CSV to ingest (overrides config and MOVIEMUSE_DATASET)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviemuse=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         MovieMuse                         ║
║            Movie Q&A over the IMDb top movies             ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = RagConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Dataset: {}", config.dataset.path.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Segment size: {}", config.chunking.max_segment_size);

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = OllamaClient::new(&config.llm).context("Failed to create Ollama client")?;
    match client.health_check().await {
        Ok(true) => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.chat_model
            );
        }
    }

    let state = match startup::bootstrap(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            return Err(e).context("Failed to ingest the movie dataset");
        }
    };
    let server = RagServer::new(state);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/chat - Ask MovieMuse a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
