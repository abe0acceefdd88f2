//! Error types for the HTTP server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use digi_search::CatalogError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No document for the slug, or it failed to compile.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::DocumentNotFound(slug) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Document not found", "slug": slug}),
            ),
            Self::Task(e) => {
                tracing::error!(error = %e, "render task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
            Self::Address(_) | Self::Catalog(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, Json(body)).into_response()
    }
}
