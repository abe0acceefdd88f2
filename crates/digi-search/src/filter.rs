//! Catalog filtering.

use crate::catalog::{Catalog, CatalogGroup};
use crate::fuzzy::{FuzzyMatcher, Pattern};

/// Filter a catalog with the default matcher.
///
/// See [`filter_with`].
#[must_use]
pub fn filter(catalog: &Catalog, query: &str) -> Vec<CatalogGroup> {
    filter_with(catalog, query, &FuzzyMatcher::default())
}

/// Filter a catalog to the entries matching `query`.
///
/// The query is trimmed first; a blank query yields no groups. Groups keep
/// catalog order and groups without matches are dropped. Within a group,
/// entries are ordered best match first, ties keeping catalog order.
#[must_use]
pub fn filter_with(catalog: &Catalog, query: &str, matcher: &FuzzyMatcher) -> Vec<CatalogGroup> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let pattern = Pattern::new(query);

    catalog
        .groups()
        .iter()
        .filter_map(|group| {
            let mut scored: Vec<_> = group
                .children
                .iter()
                .filter_map(|entry| {
                    matcher
                        .score_fields(&pattern, [entry.title.as_str(), entry.description.as_str()])
                        .map(|score| (score, entry))
                })
                .collect();

            if scored.is_empty() {
                return None;
            }
            // Stable sort keeps catalog order for equal scores
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));

            Some(CatalogGroup {
                slug: group.slug.clone(),
                label: group.label.clone(),
                children: scored.into_iter().map(|(_, entry)| entry.clone()).collect(),
            })
        })
        .collect()
}
