//! Document JSON API.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use digi_meta::FrontMatter;
use digi_renderer::TocEntry;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{compute_etag, is_not_modified};
use crate::state::AppState;

/// Response for GET /api/documents/{slug}.
#[derive(Serialize)]
struct DocumentResponse<'a> {
    slug: &'a str,
    meta: &'a FrontMatter,
    /// First H1 of the body.
    title: Option<&'a str>,
    toc: &'a [TocEntry],
    content: &'a str,
}

/// Handle GET /api/documents/{*slug}.
pub(crate) async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let site = Arc::clone(&state.site);
    let lookup = slug.clone();
    let doc = tokio::task::spawn_blocking(move || site.document(&lookup))
        .await?
        .ok_or_else(|| ServerError::DocumentNotFound(slug.clone()))?;

    let etag = compute_etag(&state.version, &doc.html);
    if is_not_modified(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let body = DocumentResponse {
        slug: &slug,
        meta: &doc.front_matter,
        title: doc.title.as_deref(),
        toc: &doc.toc,
        content: &doc.html,
    };
    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(body),
    )
        .into_response())
}
