//! Markdown renderer for DigiBlog documents.
//!
//! Converts a Markdown body (front-matter already removed) into an HTML
//! fragment using `pulldown-cmark` with tables, strikethrough, task lists
//! and footnotes enabled.
//!
//! Headings receive GitHub-style anchor ids so in-page links written
//! against GitHub's preview keep working:
//!
//! ```
//! use digi_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new().render_markdown("# Hallo\n\n## Über uns");
//! assert_eq!(result.title.as_deref(), Some("Hallo"));
//! assert!(result.html.contains(r#"<h2 id="über-uns">"#));
//! ```

mod renderer;
mod slug;
mod state;

pub use renderer::{MarkdownRenderer, RenderResult};
pub use slug::{Slugger, slugify};
pub use state::{TocEntry, escape_html};
