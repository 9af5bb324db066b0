//! tiergate bot host binary.
//!
//! Config path comes from `TIERGATE_CONFIG` (default `tiergate.yaml`);
//! log filtering from `RUST_LOG`.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use tiergate_core::{Result, TierError};
use tiergate_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::var("TIERGATE_CONFIG").unwrap_or_else(|_| "tiergate.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .bot
        .listen
        .parse()
        .map_err(|e| TierError::BadRequest(format!("bot.listen must be a socket address: {e}")))?;

    let state = AppState::from_config(cfg).await?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "tiergate starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| TierError::Internal(format!("bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| TierError::Internal(format!("server failed: {e}")))
}
