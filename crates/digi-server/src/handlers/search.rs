//! Search API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use digi_search::{CatalogGroup, filter_with};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Handle GET /api/search?q=.
///
/// Filters immediately; debouncing only applies to the websocket.
pub(crate) async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<CatalogGroup>> {
    Json(filter_with(&state.catalog, &params.q, &state.matcher))
}
