//! Searchable catalog of documents.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use digi_meta::Kompetenz;
use digi_storage::is_valid_slug;
use serde::{Deserialize, Serialize};

/// A searchable document reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Document slug, resolved as `markdown/<slug>.md`.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<Kompetenz>,
}

/// A labelled group of entries, typically one grade level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGroup {
    pub slug: String,
    pub label: String,
    pub children: Vec<CatalogEntry>,
}

impl CatalogGroup {
    /// Link path of an entry in this group.
    #[must_use]
    pub fn href(&self, entry: &CatalogEntry) -> String {
        format!("/p/{}/{}", self.slug, entry.slug)
    }
}

/// Error loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Ordered list of catalog groups.
///
/// Serialized as a bare array of groups. Unknown fields are ignored but
/// unknown competency tags are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    groups: Vec<CatalogGroup>,
}

impl Catalog {
    /// Create a catalog from groups.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if a slug is malformed or duplicated.
    pub fn new(groups: Vec<CatalogGroup>) -> Result<Self, CatalogError> {
        let catalog = Self { groups };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog the site ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |slug: &str, title: &str, description: &str| CatalogEntry {
            slug: slug.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            tags: vec![Kompetenz::T],
        };
        let group = |n: u8, children: Vec<CatalogEntry>| CatalogGroup {
            slug: format!("{n}-schulstufe"),
            label: format!("{n}. Schulstufe"),
            children,
        };

        Self {
            groups: vec![
                group(
                    5,
                    vec![entry(
                        "datei-explorer",
                        "Datei-Explorer",
                        "Es geht um den Datei-Explorer.",
                    )],
                ),
                group(
                    6,
                    vec![entry(
                        "10-finger-system",
                        "10-Finger-System",
                        "Es geht um das 10-Finger-System.",
                    )],
                ),
                group(7, Vec::new()),
                group(8, Vec::new()),
            ],
        }
    }

    /// Parse a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str::<Self>(json)?.groups)
    }

    /// Parse a YAML catalog.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Self::new(serde_yaml::from_str::<Self>(yaml)?.groups)
    }

    /// Load a catalog file; `.yaml`/`.yml` are read as YAML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let catalog = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };

        tracing::debug!(
            path = %path.display(),
            groups = catalog.groups.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Write the catalog as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), CatalogError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    /// Total number of entries across all groups.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.children.len()).sum()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut group_slugs = HashSet::new();
        for group in &self.groups {
            if !is_valid_slug(&group.slug) {
                return Err(CatalogError::Invalid(format!(
                    "invalid group slug {:?}",
                    group.slug
                )));
            }
            if !group_slugs.insert(group.slug.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate group slug {:?}",
                    group.slug
                )));
            }

            let mut entry_slugs = HashSet::new();
            for entry in &group.children {
                if !is_valid_slug(&entry.slug) {
                    return Err(CatalogError::Invalid(format!(
                        "invalid entry slug {:?} in group {:?}",
                        entry.slug, group.slug
                    )));
                }
                if !entry_slugs.insert(entry.slug.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "duplicate entry slug {:?} in group {:?}",
                        entry.slug, group.slug
                    )));
                }
            }
        }
        Ok(())
    }
}
