//! Static assets compiled into the binary.

use axum::http::header;
use axum::response::IntoResponse;

const SEARCH_JS: &str = include_str!("../../assets/search.js");
const STYLE_CSS: &str = include_str!("../../assets/style.css");

const CACHE_CONTROL: &str = "public, max-age=3600";

/// Handle GET /assets/search.js.
pub(crate) async fn search_js() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        SEARCH_JS,
    )
}

/// Handle GET /assets/style.css.
pub(crate) async fn style_css() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        STYLE_CSS,
    )
}
