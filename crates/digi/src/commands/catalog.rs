//! `digi catalog` command implementations.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use digi_config::{CliSettings, Config};
use digi_search::{CatalogBuild, build_catalog};
use digi_storage::FsSource;

use crate::error::CliError;
use crate::output::Output;

#[derive(Subcommand)]
pub(crate) enum CatalogCommand {
    /// Generate the catalog from the local documents.
    Build(BuildArgs),
}

impl CatalogCommand {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Build(args) => args.execute(),
        }
    }
}

#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover digi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory holding the markdown directory (overrides config).
    #[arg(short, long)]
    root_dir: Option<PathBuf>,

    /// Output file (default: `search.catalog` from config, else catalog.json
    /// in the root directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when a document is skipped.
    #[arg(long)]
    strict: bool,
}

impl BuildArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            root_dir: self.root_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let target = output_path(self.output, &config);

        let source = FsSource::new(config.source.root_dir.clone());
        output.info(&format!(
            "Scanning {}",
            source.root_dir().join(&config.source.markdown_dir).display()
        ));

        let CatalogBuild { catalog, skipped } =
            build_catalog(&source, &config.source.markdown_dir)?;
        for doc in &skipped {
            output.warning(&format!("Skipped {}: {}", doc.slug, doc.reason));
        }
        if self.strict && !skipped.is_empty() {
            return Err(CliError::Strict(skipped.len()));
        }

        catalog.write_json(&target)?;
        output.success(&format!(
            "Wrote {} entries in {} groups to {}",
            catalog.entry_count(),
            catalog.groups().len(),
            target.display()
        ));
        Ok(())
    }
}

/// Explicit path, then the configured catalog, then `catalog.json` in the
/// source root.
fn output_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit
        .or_else(|| config.search.catalog.clone())
        .unwrap_or_else(|| config.source.root_dir.join("catalog.json"))
}
