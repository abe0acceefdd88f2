//! Application state.

use std::sync::Arc;
use std::time::Duration;

use digi_search::{Catalog, FuzzyMatcher};
use digi_site::Site;

/// Shared across all handlers.
pub(crate) struct AppState {
    pub(crate) site: Arc<Site>,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) matcher: FuzzyMatcher,
    /// Quiet period of websocket search input.
    pub(crate) debounce: Duration,
    /// Mixed into ETags so a new release invalidates cached pages.
    pub(crate) version: String,
}
