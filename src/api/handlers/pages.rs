//! Static testbed pages: landing page, admin console, crawler files.

use axum::Router;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use crate::app_state::AppState;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");
const ADMIN_HTML: &str = include_str!("../../../assets/admin.html");
const SITEMAP_XML: &str = include_str!("../../../assets/sitemap.xml");

/// Body of `/robots.txt`.
pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /test/misc/known-files/robots.txt.found";

/// `GET /` — Landing page.
pub async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// `GET /admin` — Console page that drives the `/ws/admin` relay.
pub async fn admin_handler() -> impl IntoResponse {
    Html(ADMIN_HTML)
}

/// `GET /robots.txt`
pub async fn robots_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], ROBOTS_TXT)
}

/// `GET /sitemap.xml`
pub async fn sitemap_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/xml")], SITEMAP_XML)
}

/// Page routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/admin", get(admin_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/sitemap.xml", get(sitemap_handler))
}
