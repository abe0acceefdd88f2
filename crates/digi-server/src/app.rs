//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers::{assets, documents, pages, search, websocket};
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/search", get(search::search))
        .route("/api/documents/{*slug}", get(documents::get_document));

    Router::new()
        .route("/", get(pages::home))
        .route("/p/{group}/{*slug}", get(pages::catalog_page))
        .route("/ws/search", get(websocket::ws_handler))
        .route("/assets/search.js", get(assets::search_js))
        .route("/assets/style.css", get(assets::style_css))
        .merge(api_routes)
        .fallback(pages::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
