//! Content source trait and error types.

use std::fmt;

use crate::request::DocumentRequest;

/// Semantic error categories shared by all sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// The document does not exist.
    NotFound,
    /// Access was refused.
    PermissionDenied,
    /// The request path is not acceptable.
    InvalidPath,
    /// The backend could not be reached or answered with a server error.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// The fetch did not complete in time.
    Timeout,
    /// The content is not valid UTF-8.
    InvalidContent,
    /// Anything else.
    Other,
}

impl SourceErrorKind {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 | 410 => Self::NotFound,
            401 | 403 => Self::PermissionDenied,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            500..=599 => Self::Unavailable,
            _ => Self::Other,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPath => "Invalid path",
            Self::Unavailable => "Unavailable",
            Self::RateLimited => "Rate limited",
            Self::Timeout => "Timeout",
            Self::InvalidContent => "Invalid content",
            Self::Other => "Error",
        }
    }
}

/// Source error with semantic kind and backend-specific cause.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Requested path, if known.
    pub path: Option<String>,
    /// Backend identifier (e.g. `"Fs"`, `"GitHub"`).
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => SourceErrorKind::Timeout,
            std::io::ErrorKind::InvalidData => SourceErrorKind::InvalidContent,
            _ => SourceErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "[Backend] Kind: cause (path: markdown/x.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.as_str())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// A place documents can be fetched from.
///
/// The variant in use is picked once when the application starts; callers
/// only ever see this trait. Implementations perform blocking I/O and must
/// be run off the async executor.
pub trait ContentSource: Send + Sync {
    /// Short backend identifier used in logs and errors.
    fn backend(&self) -> &'static str;

    /// Fetch the raw text of a document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the document is missing or cannot be
    /// read. A successful result is always the complete document.
    fn fetch(&self, request: &DocumentRequest) -> Result<String, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full() {
        let err = SourceError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "markdown/x.md",
        )
        .with_backend("Fs");

        assert_eq!(err.kind, SourceErrorKind::NotFound);
        assert_eq!(err.to_string(), "[Fs] Not found: gone (path: markdown/x.md)");
    }

    #[test]
    fn test_display_minimal() {
        let err = SourceError::new(SourceErrorKind::RateLimited);
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[test]
    fn test_from_http_status() {
        assert_eq!(SourceErrorKind::from_http_status(404), SourceErrorKind::NotFound);
        assert_eq!(
            SourceErrorKind::from_http_status(403),
            SourceErrorKind::PermissionDenied
        );
        assert_eq!(
            SourceErrorKind::from_http_status(429),
            SourceErrorKind::RateLimited
        );
        assert_eq!(
            SourceErrorKind::from_http_status(503),
            SourceErrorKind::Unavailable
        );
        assert_eq!(SourceErrorKind::from_http_status(302), SourceErrorKind::Other);
    }

    #[test]
    fn test_error_source_is_exposed() {
        use std::error::Error as _;

        let err = SourceError::io(std::io::Error::other("boom"), "a.md");
        assert!(err.source().is_some());
        assert!(SourceError::not_found("a.md").source().is_none());
    }
}
