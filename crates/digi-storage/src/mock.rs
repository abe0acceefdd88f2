//! In-memory content source for testing.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::request::DocumentRequest;
use crate::storage::{ContentSource, SourceError, SourceErrorKind};

const BACKEND: &str = "Mock";

/// Mock source keyed by file path.
///
/// ```ignore
/// use digi_storage::{ContentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_document("markdown/a.md", "---\n...")
///     .with_failure("markdown/b.md", SourceErrorKind::Unavailable);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    documents: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, SourceErrorKind>>,
    fetches: AtomicUsize,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `filepath`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, filepath: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(filepath.into(), content.into());
        self
    }

    /// Fail fetches of `filepath` with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, filepath: impl Into<String>, kind: SourceErrorKind) -> Self {
        self.failures.write().unwrap().insert(filepath.into(), kind);
        self
    }

    /// Replace the content served for `filepath`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_document(&self, filepath: impl Into<String>, content: impl Into<String>) {
        self.documents
            .write()
            .unwrap()
            .insert(filepath.into(), content.into());
    }

    /// Number of `fetch` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ContentSource for MockSource {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn fetch(&self, request: &DocumentRequest) -> Result<String, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(kind) = self.failures.read().unwrap().get(&request.filepath) {
            return Err(SourceError::new(*kind)
                .with_path(request.filepath.clone())
                .with_backend(BACKEND));
        }

        self.documents
            .read()
            .unwrap()
            .get(&request.filepath)
            .cloned()
            .ok_or_else(|| SourceError::not_found(request.filepath.clone()).with_backend(BACKEND))
    }
}
