//! Collapse source results into "text or unavailable".

use crate::request::DocumentRequest;
use crate::storage::ContentSource;

/// Fetch a document, treating every failure as unavailable.
///
/// Missing files, HTTP errors, timeouts and decoding problems all yield
/// `None`. The cause is logged at debug level and never surfaced to the
/// reader. There is no retry.
pub fn resolve(source: &dyn ContentSource, request: &DocumentRequest) -> Option<String> {
    match source.fetch(request) {
        Ok(text) => {
            tracing::debug!(
                backend = source.backend(),
                path = %request.filepath,
                bytes = text.len(),
                "document resolved"
            );
            Some(text)
        }
        Err(e) => {
            tracing::debug!(
                backend = source.backend(),
                path = %request.filepath,
                error = %e,
                "document unavailable"
            );
            None
        }
    }
}
