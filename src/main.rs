//! postboard server binary.
//!
//! ```text
//! PORT=8080 RUST_LOG=postboard=debug cargo run
//! curl -X POST localhost:8080/api/posts -d '{"title":"A","contents":"B"}'
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use postboard::{Config, MemoryStore, Server, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;

    let router = app(Arc::new(MemoryStore::new()));

    let server = Server::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.addr()))?;
    server.serve(router).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
