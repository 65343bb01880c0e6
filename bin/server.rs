// Course Registry - Web Server
// REST API with Axum over an in-memory store

use anyhow::{Context, Result};
use course_registry::{api, init_logging, load_config, RelationalStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(None)?;
    init_logging(&config.log_filter);

    println!("🌐 Course Registry - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // One store per process; all state is discarded on exit
    let store = RelationalStore::with_config(config.store.clone());
    tracing::info!(name_policy = ?config.store.name_policy, "store initialized");

    let app = api::router(store);

    let addr = config.server.addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Starting server on {}", addr);
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/courses", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
