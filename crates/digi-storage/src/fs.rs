//! Filesystem content source.
//!
//! Reads documents relative to a project root, the way the site behaves in
//! development.

use std::fs;
use std::path::{Path, PathBuf};

use crate::request::{DocumentRequest, is_valid_slug};
use crate::storage::{ContentSource, SourceError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Reads `<root_dir>/<filepath>` from the local disk.
///
/// Repository coordinates in the request are ignored: the local checkout
/// is the repository.
#[derive(Clone, Debug)]
pub struct FsSource {
    root_dir: PathBuf,
}

impl FsSource {
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Project root this source reads from.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// List the slugs of all `*.md` files below `markdown_dir`.
    ///
    /// Slugs use `/` for nested directories and are sorted. Hidden entries,
    /// symlinked directories and files whose name would not form a valid
    /// slug are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if `markdown_dir` itself cannot be read.
    pub fn scan(&self, markdown_dir: &str) -> Result<Vec<String>, SourceError> {
        let base = self.root_dir.join(markdown_dir);
        let mut slugs = Vec::new();
        fs::read_dir(&base).map_err(|e| io_error(e, markdown_dir))?;
        Self::scan_directory(&base, &base, &mut slugs);
        slugs.sort();
        Ok(slugs)
    }

    fn scan_directory(dir_path: &Path, base_path: &Path, slugs: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            return;
        };

        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            // file_type() does not follow symlinks
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                Self::scan_directory(&path, base_path, slugs);
                continue;
            }
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            let Ok(relative) = path.with_extension("").strip_prefix(base_path).map(Path::to_path_buf)
            else {
                continue;
            };
            let slug = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if is_valid_slug(&slug) {
                slugs.push(slug);
            } else {
                tracing::debug!(path = %path.display(), "skipping file with invalid slug");
            }
        }
    }
}

impl ContentSource for FsSource {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn fetch(&self, request: &DocumentRequest) -> Result<String, SourceError> {
        let path = self.root_dir.join(&request.filepath);
        fs::read_to_string(&path).map_err(|e| io_error(e, &request.filepath))
    }
}

fn io_error(err: std::io::Error, path: &str) -> SourceError {
    SourceError::io(err, path).with_backend(BACKEND)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::request::Repository;
    use crate::storage::SourceErrorKind;

    fn request(filepath: &str) -> DocumentRequest {
        DocumentRequest::new(&Repository::default(), filepath).unwrap()
    }

    #[test]
    fn test_fetch_reads_relative_to_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("markdown")).unwrap();
        fs::write(temp.path().join("markdown/a.md"), "# A").unwrap();

        let source = FsSource::new(temp.path());
        assert_eq!(source.fetch(&request("markdown/a.md")).unwrap(), "# A");
    }

    #[test]
    fn test_fetch_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = FsSource::new(temp.path());

        let err = source.fetch(&request("markdown/missing.md")).unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path.as_deref(), Some("markdown/missing.md"));
    }

    #[test]
    fn test_fetch_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();

        let err = FsSource::new(temp.path())
            .fetch(&request("bin.md"))
            .unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::InvalidContent);
    }

    #[test]
    fn test_scan_lists_markdown_slugs() {
        let temp = TempDir::new().unwrap();
        let md = temp.path().join("markdown");
        fs::create_dir_all(md.join("extra")).unwrap();
        fs::write(md.join("b.md"), "").unwrap();
        fs::write(md.join("a.md"), "").unwrap();
        fs::write(md.join("notes.txt"), "").unwrap();
        fs::write(md.join("with space.md"), "").unwrap();
        fs::write(md.join("extra/c.md"), "").unwrap();

        let slugs = FsSource::new(temp.path()).scan("markdown").unwrap();
        assert_eq!(slugs, vec!["a", "b", "extra/c"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_does_not_follow_directory_symlinks() {
        let temp = TempDir::new().unwrap();
        let md = temp.path().join("markdown");
        fs::create_dir(&md).unwrap();
        fs::write(md.join("a.md"), "").unwrap();
        std::os::unix::fs::symlink(&md, md.join("loop")).unwrap();

        let slugs = FsSource::new(temp.path()).scan("markdown").unwrap();
        assert_eq!(slugs, vec!["a"]);
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        let md = temp.path().join("markdown");
        fs::create_dir_all(md.join(".drafts")).unwrap();
        fs::write(md.join("a.md"), "").unwrap();
        fs::write(md.join(".b.md"), "").unwrap();
        fs::write(md.join(".drafts/c.md"), "").unwrap();

        let slugs = FsSource::new(temp.path()).scan("markdown").unwrap();
        assert_eq!(slugs, vec!["a"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = FsSource::new(temp.path()).scan("markdown").unwrap_err();
        assert_eq!(err.kind, SourceErrorKind::NotFound);
    }
}
