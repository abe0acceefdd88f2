//! Front-matter support for DigiBlog documents.
//!
//! Documents start with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! titel: Datei-Explorer
//! beschreibung: Es geht um den Datei-Explorer.
//! schulstufe: "5"
//! modul: Grundlagen
//! kompetenzen: [T]
//! ---
//!
//! # Datei-Explorer
//! ```
//!
//! [`FrontMatter::extract`] splits the block from the body and validates it
//! against the fixed schema. Validation is strict: a missing required field
//! or an unknown competency symbol is an error, never a default.

mod front_matter;
mod kompetenz;

pub use front_matter::{FrontMatter, FrontMatterError, split_front_matter};
pub use kompetenz::Kompetenz;
