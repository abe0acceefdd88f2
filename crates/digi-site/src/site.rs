//! Page pipeline: slug to outcome.

use std::sync::Arc;
use std::time::Duration;

use digi_cache::TransientCache;
use digi_storage::{ContentSource, DocumentRequest, Repository, resolve};

use crate::compiler::{CompiledDocument, compile};

/// Cached pipeline result. `None` records a document that is unavailable
/// or failed to compile.
pub type DocumentCache = TransientCache<Option<Arc<CompiledDocument>>>;

/// What a reader sees for a request.
#[derive(Clone, Debug, PartialEq)]
pub enum PageOutcome {
    /// No document was asked for.
    NothingSelected,
    /// The document is missing, unreachable or invalid.
    NotFound,
    Rendered(Arc<CompiledDocument>),
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub repository: Repository,
    /// Directory holding the documents, relative to the source root.
    pub markdown_dir: String,
    /// How long a pipeline result is reused.
    pub cache_ttl: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repository: Repository::default(),
            markdown_dir: "markdown".to_owned(),
            cache_ttl: Duration::from_secs(60),
        }
    }
}

/// Resolves and compiles documents, caching the outcome.
///
/// The content source is fixed at construction. All work is blocking;
/// async callers should use `spawn_blocking`.
pub struct Site {
    source: Arc<dyn ContentSource>,
    cache: Arc<DocumentCache>,
    config: SiteConfig,
}

impl Site {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, cache: Arc<DocumentCache>, config: SiteConfig) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    /// Outcome for an optional slug.
    ///
    /// A missing or blank slug is [`PageOutcome::NothingSelected`] and
    /// triggers no fetch. Every failure further down, including an invalid
    /// slug, is [`PageOutcome::NotFound`].
    pub fn page(&self, slug: Option<&str>) -> PageOutcome {
        let Some(slug) = slug.map(str::trim).filter(|s| !s.is_empty()) else {
            return PageOutcome::NothingSelected;
        };

        match self.document(slug) {
            Some(document) => PageOutcome::Rendered(document),
            None => PageOutcome::NotFound,
        }
    }

    /// Resolve and compile one document, served from the cache within its
    /// TTL.
    pub fn document(&self, slug: &str) -> Option<Arc<CompiledDocument>> {
        let request = match DocumentRequest::for_slug(
            &self.config.repository,
            &self.config.markdown_dir,
            slug,
        ) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(slug, error = %e, "rejected slug");
                return None;
            }
        };

        self.cache
            .get_or_compute(&request.cache_key(), self.config.cache_ttl, || {
                self.build(&request)
            })
    }

    fn build(&self, request: &DocumentRequest) -> Option<Arc<CompiledDocument>> {
        let text = resolve(self.source.as_ref(), request)?;
        if text.trim().is_empty() {
            tracing::debug!(path = %request.filepath, "document is empty");
            return None;
        }

        match compile(&text) {
            Ok(document) => Some(Arc::new(document)),
            Err(e) => {
                tracing::warn!(path = %request.filepath, error = %e, "document failed to compile");
                None
            }
        }
    }

    /// Drop the cached outcome for a slug.
    pub fn invalidate(&self, slug: &str) {
        if let Ok(request) =
            DocumentRequest::for_slug(&self.config.repository, &self.config.markdown_dir, slug)
        {
            self.cache.invalidate(&request.cache_key());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use digi_storage::{MockSource, SourceErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = "---
titel: Datei-Explorer
beschreibung: Es geht um den Datei-Explorer.
schulstufe: 5
modul: Grundlagen
kompetenzen: [T]
---
# Datei-Explorer
";

    fn site(source: &Arc<MockSource>) -> Site {
        let cache = Arc::new(DocumentCache::new(NonZeroUsize::new(16).unwrap()));
        Site::new(
            Arc::clone(source) as Arc<dyn ContentSource>,
            cache,
            SiteConfig::default(),
        )
    }

    #[test]
    fn test_no_slug_is_nothing_selected_without_fetch() {
        let source = Arc::new(MockSource::new());
        let site = site(&source);

        assert_eq!(site.page(None), PageOutcome::NothingSelected);
        assert_eq!(site.page(Some("")), PageOutcome::NothingSelected);
        assert_eq!(site.page(Some("  ")), PageOutcome::NothingSelected);
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let source = Arc::new(MockSource::new());
        let site = site(&source);

        assert_eq!(site.page(Some("does-not-exist")), PageOutcome::NotFound);
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_invalid_slug_is_not_found_without_fetch() {
        let source = Arc::new(MockSource::new());
        let site = site(&source);

        assert_eq!(site.page(Some("../secret")), PageOutcome::NotFound);
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_source_failure_is_not_found() {
        let source = Arc::new(
            MockSource::new().with_failure("markdown/a.md", SourceErrorKind::Unavailable),
        );
        assert_eq!(site(&source).page(Some("a")), PageOutcome::NotFound);
    }

    #[test]
    fn test_invalid_or_empty_document_is_not_found() {
        let source = Arc::new(
            MockSource::new()
                .with_document("markdown/bad.md", "# no front-matter")
                .with_document("markdown/empty.md", ""),
        );
        let site = site(&source);

        assert_eq!(site.page(Some("bad")), PageOutcome::NotFound);
        assert_eq!(site.page(Some("empty")), PageOutcome::NotFound);
    }

    #[test]
    fn test_valid_document_is_rendered() {
        let source =
            Arc::new(MockSource::new().with_document("markdown/datei-explorer.md", DOC));

        let PageOutcome::Rendered(doc) = site(&source).page(Some("datei-explorer")) else {
            panic!("expected rendered document");
        };
        assert_eq!(doc.front_matter.titel, "Datei-Explorer");
        assert_eq!(doc.front_matter.schulstufe, "5");
        assert_eq!(doc.html, r#"<h1 id="datei-explorer">Datei-Explorer</h1>"#);
    }

    #[test]
    fn test_outcome_is_cached_within_ttl() {
        let source =
            Arc::new(MockSource::new().with_document("markdown/datei-explorer.md", DOC));
        let site = site(&source);

        let first = site.page(Some("datei-explorer"));
        source.set_document("markdown/datei-explorer.md", "changed");
        let second = site.page(Some("datei-explorer"));

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);

        site.invalidate("datei-explorer");
        assert_eq!(site.page(Some("datei-explorer")), PageOutcome::NotFound);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_misses_are_cached_too() {
        let source = Arc::new(MockSource::new());
        let site = site(&source);

        site.page(Some("missing"));
        site.page(Some("missing"));
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_disabled_cache_fetches_every_time() {
        let source =
            Arc::new(MockSource::new().with_document("markdown/datei-explorer.md", DOC));
        let site = Site::new(
            Arc::clone(&source) as Arc<dyn ContentSource>,
            Arc::new(DocumentCache::disabled()),
            SiteConfig::default(),
        );

        site.page(Some("datei-explorer"));
        site.page(Some("datei-explorer"));
        assert_eq!(source.fetch_count(), 2);
    }
}
