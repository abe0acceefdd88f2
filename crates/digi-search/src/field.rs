//! Debounced search field state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::catalog::{Catalog, CatalogGroup};
use crate::debounce::Debouncer;
use crate::filter::filter_with;
use crate::fuzzy::FuzzyMatcher;

/// Message shown when a non-blank query has no results.
pub const NO_RESULTS: &str = "Keine Materialien gefunden...";

/// Placeholder of the search input.
pub const PLACEHOLDER: &str = "Suche Materialien...";

/// Result of one filter run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchUpdate {
    /// Trimmed query the groups were computed for.
    pub query: String,
    pub groups: Vec<CatalogGroup>,
    /// Whether the result list is shown; false for a blank query.
    pub visible: bool,
}

impl SearchUpdate {
    /// Filter `catalog` for `raw` immediately.
    #[must_use]
    pub fn compute(catalog: &Catalog, raw: &str, matcher: &FuzzyMatcher) -> Self {
        let query = raw.trim().to_owned();
        let groups = filter_with(catalog, &query, matcher);
        let visible = !query.is_empty();
        Self {
            query,
            groups,
            visible,
        }
    }

    /// Whether the "no results" message applies.
    #[cfg(test)]
    fn is_empty_result(&self) -> bool {
        self.visible && self.groups.is_empty()
    }
}

/// One live search input.
///
/// Every edit goes through [`on_input`](Self::on_input); only the latest
/// value of a burst is filtered, once input has been quiet for the debounce
/// delay. Results arrive on the receiver returned by [`new`](Self::new).
/// [`teardown`](Self::teardown), or dropping the field, cancels a pending
/// run so nothing is emitted afterwards.
pub struct SearchField {
    catalog: Arc<Catalog>,
    matcher: FuzzyMatcher,
    debouncer: Debouncer,
    updates: mpsc::UnboundedSender<SearchUpdate>,
}

impl SearchField {
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        matcher: FuzzyMatcher,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let field = Self {
            catalog,
            matcher,
            debouncer: Debouncer::new(delay),
            updates,
        };
        (field, receiver)
    }

    /// Record an edit of the input value.
    pub fn on_input(&mut self, raw: &str) {
        let catalog = Arc::clone(&self.catalog);
        let matcher = self.matcher;
        let updates = self.updates.clone();
        let raw = raw.to_owned();

        self.debouncer.call(async move {
            let update = SearchUpdate::compute(&catalog, &raw, &matcher);
            tracing::debug!(
                query = %update.query,
                groups = update.groups.len(),
                "search filtered"
            );
            // Receiver gone means the field's consumer has shut down
            let _ = updates.send(update);
        });
    }

    /// Cancel any pending filter run.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
    }

    /// Whether a filter run is scheduled but has not finished yet.
    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
