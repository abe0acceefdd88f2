//! Fuzzy search over the DigiBlog catalog.
//!
//! The catalog is a fixed list of groups (grade levels), each holding
//! document entries. [`filter`] narrows it to the entries whose title or
//! description approximately contains the query. [`SearchField`] wraps that
//! in the behaviour of a live search input: debounced filtering, cancelled
//! on teardown.
//!
//! # Example
//!
//! ```
//! use digi_search::{Catalog, filter};
//!
//! let result = filter(&Catalog::builtin(), "Datei");
//! assert_eq!(result[0].children[0].slug, "datei-explorer");
//! ```

mod build;
mod catalog;
mod debounce;
mod field;
mod filter;
mod fuzzy;
mod keyboard;

pub use build::{CatalogBuild, SkippedDocument, build_catalog};
pub use catalog::{Catalog, CatalogEntry, CatalogError, CatalogGroup};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use field::{NO_RESULTS, PLACEHOLDER, SearchField, SearchUpdate};
pub use filter::{filter, filter_with};
pub use fuzzy::{DEFAULT_THRESHOLD, FuzzyMatcher};
pub use keyboard::{BLUR_KEYS, FOCUS_CODE, FocusAction, KeyInput, SHORTCUT_LABEL, handle_key};
