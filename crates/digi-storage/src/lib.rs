//! Document sources for DigiBlog.
//!
//! A [`DocumentRequest`] names one Markdown file inside a repository. A
//! [`ContentSource`] turns it into text; [`resolve`] collapses every failure
//! into `None` so callers only ever see "text" or "unavailable".
//!
//! The crate provides:
//! - [`FsSource`] reading from a local project directory
//! - [`MockSource`] for testing (behind the `mock` feature)
//!
//! The remote GitHub source lives in `digi-storage-github`.
//!
//! # Example
//!
//! ```ignore
//! use digi_storage::{DocumentRequest, FsSource, Repository, resolve};
//!
//! let source = FsSource::new(".");
//! let request = DocumentRequest::for_slug(&Repository::default(), "markdown", "datei-explorer")?;
//! let text = resolve(&source, &request);
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod request;
mod resolver;
mod storage;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use request::{DocumentRequest, Repository, is_valid_slug};
pub use resolver::resolve;
pub use storage::{ContentSource, SourceError, SourceErrorKind};
