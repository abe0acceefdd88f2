//! CLI error types.

use digi_config::ConfigError;
use digi_search::CatalogError;
use digi_server::ServerError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0} document(s) skipped")]
    Strict(usize),
}
