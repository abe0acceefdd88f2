//! Document pipeline for DigiBlog.
//!
//! [`compile`] turns document text into a [`CompiledDocument`]. [`Site`]
//! wires the configured content source, the compiler and the transient
//! cache together and reduces every request to a [`PageOutcome`].

mod compiler;
mod site;

pub use compiler::{CompileError, CompiledDocument, compile};
pub use site::{DocumentCache, PageOutcome, Site, SiteConfig};
