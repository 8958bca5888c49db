//! Router composition and server startup.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::error::RelayError;
use crate::ws::handler::ws_handler;

/// Path of the `admin` channel WebSocket endpoint.
pub const ADMIN_WS_PATH: &str = "/ws/admin";

/// Builds the full application router: pages, health and the relay socket.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route(ADMIN_WS_PATH, get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on an already bound listener until the server stops.
///
/// # Errors
///
/// Returns [`RelayError::Serve`] if the server fails with an I/O error.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), RelayError> {
    axum::serve(listener, build_app(state))
        .await
        .map_err(RelayError::Serve)
}

/// Binds `addr`.
///
/// # Errors
///
/// Returns [`RelayError::Bind`] if the address cannot be bound.
pub async fn bind(addr: std::net::SocketAddr) -> Result<TcpListener, RelayError> {
    TcpListener::bind(addr).await.map_err(RelayError::Bind)
}
