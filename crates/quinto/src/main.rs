//! Server binary: reads its listen addresses from the environment,
//! sets up logging, and runs until terminated.

use quinto::prelude::JsonCodec;
use quinto::{QuintoServer, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = std::env::var("QUINTO_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let mut builder = QuintoServer::<JsonCodec>::builder().bind(&addr);
    if let Ok(health_addr) = std::env::var("QUINTO_HEALTH_ADDR") {
        builder = builder.health(&health_addr);
    }

    let server = builder.build().await?;
    if let Ok(local) = server.local_addr() {
        tracing::info!(%local, "listening");
    }

    server.run().await
}
