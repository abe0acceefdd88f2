//! Security headers added to every response.

use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use tower_http::set_header::SetResponseHeaderLayer;

/// Scripts come from `/assets` only. Inline styles stay allowed for table
/// column alignment. Documents may embed remote images; the search socket
/// needs `ws:`/`wss:`.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data: https:; \
                   connect-src 'self' ws: wss:; \
                   frame-ancestors 'none'";

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::CONTENT_SECURITY_POLICY, CSP)
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::X_FRAME_OPTIONS, "DENY")
}
