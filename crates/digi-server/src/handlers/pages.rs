//! Document views.
//!
//! `/?markdown=<slug>` and `/p/{group}/{slug}` both resolve
//! `markdown/<slug>.md`. The group segment only shapes catalog links.

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use digi_site::PageOutcome;

use crate::error::ServerError;
use crate::handlers::{compute_etag, is_not_modified};
use crate::state::AppState;
use crate::template::Layout;

/// Query parameter naming the document on the home route.
const SLUG_PARAM: &str = "markdown";

/// Handle GET /.
///
/// A repeated `markdown` parameter uses its first value.
pub(crate) async fn home(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let slug = params
        .into_iter()
        .find_map(|(key, value)| (key == SLUG_PARAM).then_some(value));
    render(state, slug, &headers).await
}

/// Handle GET /p/{group}/{*slug}.
///
/// Segments that do not decode to UTF-8 get the not-found view.
pub(crate) async fn catalog_page(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    match path {
        Ok(Path((_group, slug))) => render(state, Some(slug), &headers).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected catalog path");
            Ok(not_found(&state))
        }
    }
}

/// Unknown routes get the not-found view.
pub(crate) async fn fallback(State(state): State<Arc<AppState>>) -> Response {
    not_found(&state)
}

fn not_found(state: &AppState) -> Response {
    let layout = Layout {
        debounce: state.debounce,
    };
    (StatusCode::NOT_FOUND, Html(layout.not_found())).into_response()
}

async fn render(
    state: Arc<AppState>,
    slug: Option<String>,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let site = Arc::clone(&state.site);
    let outcome = tokio::task::spawn_blocking(move || site.page(slug.as_deref())).await?;

    let layout = Layout {
        debounce: state.debounce,
    };
    let response = match outcome {
        PageOutcome::NothingSelected => Html(layout.nothing_selected(&state.catalog)).into_response(),
        PageOutcome::NotFound => not_found(&state),
        PageOutcome::Rendered(doc) => {
            let body = layout.document(&doc);
            let etag = compute_etag(&state.version, &body);
            if is_not_modified(headers, &etag) {
                return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
            }
            (
                [
                    (header::ETAG, etag),
                    (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
                ],
                Html(body),
            )
                .into_response()
        }
    };
    Ok(response)
}
