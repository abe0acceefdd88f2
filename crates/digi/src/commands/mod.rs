//! CLI command implementations.

pub(crate) mod catalog;
pub(crate) mod serve;

pub(crate) use catalog::CatalogCommand;
pub(crate) use serve::ServeArgs;
