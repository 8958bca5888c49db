//! HTTP layer: static testbed pages and system endpoints.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the HTTP router (everything except the WebSocket endpoint).
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::pages::routes())
        .merge(handlers::system::routes())
}
