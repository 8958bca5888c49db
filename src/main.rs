//! admin-relay server entry point.
//!
//! Starts the Axum HTTP server with the testbed pages and the relay
//! WebSocket endpoint.

use tracing_subscriber::EnvFilter;

use admin_relay::app_state::AppState;
use admin_relay::config::{LogFormat, RelayConfig};
use admin_relay::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        shell = %config.shell_program,
        "starting admin-relay"
    );

    let state = AppState::from_config(&config);

    // Start server
    let listener = server::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, state).await?;

    Ok(())
}
