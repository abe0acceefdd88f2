//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod documents;
pub(crate) mod pages;
pub(crate) mod search;
pub(crate) mod websocket;

use axum::http::{HeaderMap, header};
use md5::{Digest, Md5};

/// Quoted ETag from the release version and the response body.
///
/// MD5 truncated to 64 bits.
pub(crate) fn compute_etag(version: &str, body: &str) -> String {
    let digest = Md5::digest(format!("{version}:{body}").as_bytes());
    format!("\"{}\"", &hex::encode(digest)[..16])
}

/// Whether the client already holds the representation tagged `etag`.
pub(crate) fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .split(',')
                .map(str::trim)
                .any(|candidate| candidate == etag || candidate == "*")
        })
}
