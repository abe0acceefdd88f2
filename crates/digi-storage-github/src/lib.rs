//! Remote content source backed by GitHub raw content.
//!
//! [`GithubSource`] fetches
//! `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{filepath}`
//! with a blocking HTTP client. Every request identifies itself with
//! `User-Agent: docs:{owner}/{repo}`.

use std::time::Duration;

use digi_storage::{ContentSource, DocumentRequest, SourceError, SourceErrorKind};
use ureq::Agent;

/// Backend identifier for error messages.
const BACKEND: &str = "GitHub";

/// Default raw-content host.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Fetches documents over HTTP from a raw-content host.
///
/// Only 2xx responses count as success. Non-success statuses are mapped to
/// a [`SourceErrorKind`] and the body is discarded. There is no retry.
pub struct GithubSource {
    agent: Agent,
    base_url: String,
}

impl GithubSource {
    /// Create a source for `base_url` with a global per-request timeout.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// URL a request is fetched from.
    #[must_use]
    pub fn url_for(&self, request: &DocumentRequest) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url, request.owner, request.repo, request.branch, request.filepath
        )
    }
}

impl Default for GithubSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl ContentSource for GithubSource {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn fetch(&self, request: &DocumentRequest) -> Result<String, SourceError> {
        let url = self.url_for(request);
        let user_agent = format!("docs:{}/{}", request.owner, request.repo);

        tracing::debug!(url = %url, "fetching remote document");

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", &user_agent)
            .call()
            .map_err(|e| transport_error(e, &request.filepath))?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                SourceError::new(SourceErrorKind::from_http_status(status.as_u16()))
                    .with_path(request.filepath.clone())
                    .with_backend(BACKEND)
                    .with_source(HttpStatus(status.as_u16())),
            );
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| transport_error(e, &request.filepath))
    }
}

fn transport_error(err: ureq::Error, path: &str) -> SourceError {
    let kind = match err {
        ureq::Error::Timeout(_) => SourceErrorKind::Timeout,
        _ => SourceErrorKind::Unavailable,
    };
    SourceError::new(kind)
        .with_path(path)
        .with_backend(BACKEND)
        .with_source(err)
}

/// Non-success status carried as the error source.
#[derive(Debug)]
struct HttpStatus(u16);

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.0)
    }
}

impl std::error::Error for HttpStatus {}
