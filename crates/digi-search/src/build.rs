//! Catalog generation from local documents.

use std::collections::BTreeMap;

use digi_meta::FrontMatter;
use digi_storage::{ContentSource, DocumentRequest, FsSource, Repository};

use crate::catalog::{Catalog, CatalogEntry, CatalogError, CatalogGroup};

/// A document left out of the generated catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedDocument {
    pub slug: String,
    pub reason: String,
}

/// Outcome of [`build_catalog`].
#[derive(Debug)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub skipped: Vec<SkippedDocument>,
}

/// Generate a catalog from every document under `markdown_dir`.
///
/// Documents are grouped by their `schulstufe` front-matter field into
/// groups `<n>-schulstufe` labelled `<n>. Schulstufe`. Grades that slug to
/// the same value share a group, labelled by the first document seen.
/// Numeric grade levels sort numerically and come first. Within a group
/// entries keep slug order.
/// Documents that cannot be read or whose front-matter is invalid are
/// reported in [`CatalogBuild::skipped`].
///
/// # Errors
///
/// Fails if the markdown directory cannot be listed or the result does not
/// form a valid catalog.
pub fn build_catalog(source: &FsSource, markdown_dir: &str) -> Result<CatalogBuild, CatalogError> {
    let slugs = source
        .scan(markdown_dir)
        .map_err(|e| CatalogError::Invalid(e.to_string()))?;
    let repository = Repository::default();

    let mut grouped: BTreeMap<GradeKey, (String, Vec<CatalogEntry>)> = BTreeMap::new();
    let mut skipped = Vec::new();

    for slug in slugs {
        let front_matter = DocumentRequest::for_slug(&repository, markdown_dir, &slug)
            .and_then(|request| source.fetch(&request))
            .map_err(|e| e.to_string())
            .and_then(|text| {
                FrontMatter::extract(&text)
                    .map(|(meta, _)| meta)
                    .map_err(|e| e.to_string())
            });

        match front_matter {
            Ok(meta) => {
                let key = GradeKey::new(&meta.schulstufe);
                grouped
                    .entry(key)
                    .or_insert_with_key(|key| (key.label(&meta.schulstufe), Vec::new()))
                    .1
                    .push(CatalogEntry {
                        slug,
                        title: meta.titel,
                        description: meta.beschreibung,
                        tags: meta.kompetenzen,
                    });
            }
            Err(reason) => {
                tracing::warn!(slug = %slug, reason = %reason, "skipping document");
                skipped.push(SkippedDocument { slug, reason });
            }
        }
    }

    let groups = grouped
        .into_iter()
        .map(|(grade, (label, children))| CatalogGroup {
            slug: format!("{}-schulstufe", grade.slug()),
            label: format!("{label}. Schulstufe"),
            children,
        })
        .collect();

    Ok(CatalogBuild {
        catalog: Catalog::new(groups)?,
        skipped,
    })
}

/// Grade level keyed by its slug, ordering numbers before free text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum GradeKey {
    Number(u32),
    /// Slugged free text.
    Text(String),
}

impl GradeKey {
    fn new(raw: &str) -> Self {
        let slug = slugify(raw);
        slug.parse()
            .map_or_else(|_| Self::Text(slug), Self::Number)
    }

    /// Label for a group first seen with the grade `raw`.
    fn label(&self, raw: &str) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(_) => raw.trim().to_owned(),
        }
    }

    fn slug(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(slug) => slug.clone(),
        }
    }
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '-' };
        // Collapse runs of separators
        if c != '-' || !slug.ends_with('-') {
            slug.push(c);
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "sonstige".to_owned()
    } else {
        slug.to_owned()
    }
}
