//! HTTP server for DigiBlog.
//!
//! Serves:
//! - document pages at `/?markdown=<slug>` and `/p/{group}/{slug}`
//! - the search API at `/api/search` and the document API at
//!   `/api/documents/{slug}`
//! - the live search websocket at `/ws/search`
//! - the search script and stylesheet under `/assets`
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (digi-server)
//!                        │
//!                        ├─► pages / documents ──spawn_blocking──► Site
//!                        │                                          │
//!                        │                  TransientCache ◄────────┤
//!                        │                                          └─► ContentSource
//!                        │                                              (Fs | Github)
//!                        └─► search / websocket ──► Catalog + SearchField
//! ```
//!
//! The content source is chosen once in [`run_server`] and shared by every
//! request.

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod template;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use digi_config::SourceMode;
use digi_search::{Catalog, FuzzyMatcher};
use digi_site::{DocumentCache, Site, SiteConfig};
use digi_storage::{ContentSource, FsSource, Repository};
use digi_storage_github::GithubSource;

pub use error::ServerError;
use state::AppState;

/// Where documents are read from.
#[derive(Clone, Debug)]
pub enum SourceSelection {
    /// Files below `root_dir`.
    Local { root_dir: PathBuf },
    /// Raw content host.
    Remote { base_url: String, timeout: Duration },
}

impl SourceSelection {
    /// Instantiate the source.
    #[must_use]
    pub fn build(&self) -> Arc<dyn ContentSource> {
        match self {
            Self::Local { root_dir } => Arc::new(FsSource::new(root_dir.clone())),
            Self::Remote { base_url, timeout } => Arc::new(GithubSource::new(base_url, *timeout)),
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub source: SourceSelection,
    pub site: SiteConfig,
    pub cache_enabled: bool,
    pub cache_max_entries: usize,
    /// Catalog file; the built-in catalog when `None`.
    pub catalog_path: Option<PathBuf>,
    pub debounce: Duration,
    pub threshold: f64,
    /// Application version, part of every ETag.
    pub version: String,
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded, the address is invalid or the
/// listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(build_state(&config)?);
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let source = config.source.build();
    tracing::info!(backend = source.backend(), "Content source selected");

    let cache = Arc::new(DocumentCache::from_settings(
        config.cache_enabled,
        config.cache_max_entries,
    ));
    let site = Site::new(source, cache, config.site.clone());

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    tracing::info!(entries = catalog.entry_count(), "Catalog loaded");

    Ok(AppState {
        site: Arc::new(site),
        catalog: Arc::new(catalog),
        matcher: FuzzyMatcher::new(config.threshold),
        debounce: config.debounce,
        version: config.version.clone(),
    })
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the DigiBlog config.
#[must_use]
pub fn server_config_from_digi_config(config: &digi_config::Config, version: String) -> ServerConfig {
    let remote = &config.source.remote;
    let source = match config.source.mode {
        SourceMode::Local => SourceSelection::Local {
            root_dir: config.source.root_dir.clone(),
        },
        SourceMode::Remote => SourceSelection::Remote {
            base_url: remote.base_url.clone(),
            timeout: remote.timeout(),
        },
    };

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source,
        site: SiteConfig {
            repository: Repository {
                owner: remote.owner.clone(),
                repo: remote.repo.clone(),
                branch: remote.branch.clone(),
            },
            markdown_dir: config.source.markdown_dir.clone(),
            cache_ttl: config.cache.ttl(),
        },
        cache_enabled: config.cache.enabled,
        cache_max_entries: config.cache.max_entries,
        catalog_path: config.search.catalog.clone(),
        debounce: config.search.debounce(),
        threshold: config.search.threshold,
        version,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_server_config_from_defaults() {
        let config = digi_config::Config::default_with_base(Path::new("/site"));
        let server = server_config_from_digi_config(&config, "1.0.0".to_owned());

        assert_eq!(server.port, 3000);
        assert!(matches!(
            &server.source,
            SourceSelection::Remote { base_url, timeout }
                if base_url == "https://raw.githubusercontent.com" && *timeout == Duration::from_secs(30)
        ));
        assert_eq!(server.site.repository, Repository::default());
        assert_eq!(server.site.markdown_dir, "markdown");
        assert_eq!(server.site.cache_ttl, Duration::from_secs(60));
        assert_eq!(server.debounce, Duration::from_millis(250));
        assert_eq!(server.catalog_path, None);
    }

    #[test]
    fn test_local_mode_selects_fs_source() {
        let mut config = digi_config::Config::default_with_base(Path::new("/site"));
        config.source.mode = SourceMode::Local;
        let server = server_config_from_digi_config(&config, String::new());

        assert_eq!(server.source.build().backend(), "Fs");
    }

    #[test]
    fn test_build_state_loads_catalog_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        Catalog::builtin().write_json(&path).unwrap();

        let mut config = server_config_from_digi_config(
            &digi_config::Config::default_with_base(temp.path()),
            String::new(),
        );
        config.catalog_path = Some(path);

        let state = build_state(&config).unwrap();
        assert_eq!(state.catalog.entry_count(), 2);
    }

    #[test]
    fn test_build_state_missing_catalog_fails() {
        let mut config = server_config_from_digi_config(
            &digi_config::Config::default_with_base(Path::new("/site")),
            String::new(),
        );
        config.catalog_path = Some(PathBuf::from("/nonexistent/catalog.json"));

        assert!(matches!(build_state(&config), Err(ServerError::Catalog(_))));
    }
}
