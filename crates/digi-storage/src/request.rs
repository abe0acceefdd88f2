//! Document requests and slug handling.

use std::path::{Component, Path};

use crate::storage::{SourceError, SourceErrorKind};

/// Repository coordinates that scope every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            owner: "frank-kolesik".to_owned(),
            repo: "digi-blog".to_owned(),
            branch: "main".to_owned(),
        }
    }
}

/// Location of one document.
///
/// `filepath` is relative to the repository (or project) root, uses `/`
/// separators and never contains `..`, so no source can read outside its
/// root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRequest {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub filepath: String,
}

impl DocumentRequest {
    /// Build a request for an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`SourceErrorKind::InvalidPath`] for empty or absolute paths
    /// and paths containing `..` or `.` components.
    pub fn new(repository: &Repository, filepath: impl Into<String>) -> Result<Self, SourceError> {
        let filepath = filepath.into();
        validate_filepath(&filepath)?;
        Ok(Self {
            owner: repository.owner.clone(),
            repo: repository.repo.clone(),
            branch: repository.branch.clone(),
            filepath,
        })
    }

    /// Build the request for a document slug: `<markdown_dir>/<slug>.md`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceErrorKind::InvalidPath`] if the slug is not valid
    /// (see [`is_valid_slug`]).
    pub fn for_slug(
        repository: &Repository,
        markdown_dir: &str,
        slug: &str,
    ) -> Result<Self, SourceError> {
        if !is_valid_slug(slug) {
            return Err(SourceError::new(SourceErrorKind::InvalidPath).with_path(slug));
        }
        let dir = markdown_dir.trim_matches('/');
        let filepath = if dir.is_empty() {
            format!("{slug}.md")
        } else {
            format!("{dir}/{slug}.md")
        };
        Self::new(repository, filepath)
    }

    /// Key identifying this request across all repositories.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.owner, self.repo, self.branch, self.filepath
        )
    }
}

/// Whether `slug` is one or more `/`-separated segments of ASCII letters,
/// digits, `-` and `_`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn validate_filepath(filepath: &str) -> Result<(), SourceError> {
    let path = Path::new(filepath);
    let valid = !filepath.is_empty()
        && !filepath.contains('\\')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if valid {
        Ok(())
    } else {
        Err(SourceError::new(SourceErrorKind::InvalidPath).with_path(filepath))
    }
}
