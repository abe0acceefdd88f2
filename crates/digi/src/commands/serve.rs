//! `digi serve` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use digi_config::{CliSettings, Config, SourceMode};
use digi_server::{run_server, server_config_from_digi_config};

use crate::error::CliError;
use crate::output::Output;

/// Document source on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ModeArg {
    Local,
    Remote,
}

impl From<ModeArg> for SourceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Local => Self::Local,
            ModeArg::Remote => Self::Remote,
        }
    }
}

#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover digi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "DIGI_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "DIGI_PORT")]
    port: Option<u16>,

    /// Where documents are read from (overrides config).
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Root directory for local mode (overrides config).
    #[arg(short, long)]
    root_dir: Option<PathBuf>,

    /// Disable the document cache.
    #[arg(long)]
    no_cache: bool,
}

impl ServeArgs {
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            mode: self.mode.map(SourceMode::from),
            root_dir: self.root_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        match config.source.mode {
            SourceMode::Local => output.info(&format!(
                "Documents: {}",
                config.source.root_dir.join(&config.source.markdown_dir).display()
            )),
            SourceMode::Remote => {
                let remote = &config.source.remote;
                output.info(&format!(
                    "Documents: {}/{}/{}/{}/{}",
                    remote.base_url, remote.owner, remote.repo, remote.branch, config.source.markdown_dir
                ));
            }
        }
        if config.cache.enabled {
            output.info(&format!(
                "Cache: {} entries, {}s TTL",
                config.cache.max_entries, config.cache.ttl_secs
            ));
        } else {
            output.info("Cache: disabled");
        }
        match &config.search.catalog {
            Some(path) => output.info(&format!("Catalog: {}", path.display())),
            None => output.info("Catalog: built-in"),
        }

        let server_config = server_config_from_digi_config(&config, version.to_owned());
        run_server(server_config).await?;

        output.success("Server stopped");
        Ok(())
    }
}
