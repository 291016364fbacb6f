//! Document service binary
//!
//! Run with: cargo run --bin docuchat-server [config.toml]

use docuchat::{config::AppConfig, server::Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docuchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::load(&path)?
        }
        None => AppConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Sources per answer: {}", config.retrieval.top_k);
    tracing::info!("  - Concurrent ingestions: {}", config.processing.worker_count());
    tracing::info!("  - Upload dir: {}", config.storage.upload_dir.display());

    let server = Server::new(config)?;

    println!("Server starting...");
    println!("  API: http://{}/api", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/documents/upload      - Upload a document");
    println!("  GET  /api/documents             - List documents");
    println!("  POST /api/sessions              - Create a chat session");
    println!("  POST /api/sessions/:id/messages - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
