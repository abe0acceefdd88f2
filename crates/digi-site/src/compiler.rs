//! Document compilation: front-matter validation plus Markdown rendering.

use digi_meta::{FrontMatter, FrontMatterError};
use digi_renderer::{MarkdownRenderer, TocEntry};

/// A document ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledDocument {
    /// Rendered body HTML. Raw HTML from the source is included verbatim.
    pub html: String,
    pub front_matter: FrontMatter,
    /// Text of the first H1 heading of the body.
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
}

impl CompiledDocument {
    /// Title for the page: the front-matter `titel`, which is always set.
    #[must_use]
    pub fn display_title(&self) -> &str {
        &self.front_matter.titel
    }
}

/// Error returned when a document cannot be compiled.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
}

/// Compile document text into HTML and validated metadata.
///
/// # Errors
///
/// Fails when the front-matter block is missing or does not match the
/// schema. Rendering itself cannot fail.
pub fn compile(text: &str) -> Result<CompiledDocument, CompileError> {
    let (front_matter, body) = FrontMatter::extract(text)?;
    let rendered = MarkdownRenderer::new().render_markdown(body);

    Ok(CompiledDocument {
        html: rendered.html,
        front_matter,
        title: rendered.title,
        toc: rendered.toc,
    })
}

#[cfg(test)]
mod tests {
    use digi_meta::Kompetenz;
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = "---
titel: A
beschreibung: B
schulstufe: C
modul: D
kompetenzen: [T]
---
# Heading

| x | y |
|---|---|
| 1 | 2 |
";

    #[test]
    fn test_compile_preserves_front_matter() {
        let doc = compile(DOC).unwrap();

        assert_eq!(
            doc.front_matter,
            FrontMatter {
                titel: "A".to_owned(),
                beschreibung: "B".to_owned(),
                schulstufe: "C".to_owned(),
                modul: "D".to_owned(),
                kompetenzen: vec![Kompetenz::T],
            }
        );
        assert_eq!(doc.display_title(), "A");
    }

    #[test]
    fn test_compile_renders_body() {
        let doc = compile(DOC).unwrap();

        assert!(doc.html.starts_with(r#"<h1 id="heading">Heading</h1>"#));
        assert!(doc.html.contains("<table><thead><tr><th>x</th>"));
        assert!(!doc.html.contains("titel"));
        assert_eq!(doc.title.as_deref(), Some("Heading"));
    }

    #[test]
    fn test_missing_titel_fails() {
        let text = DOC.replace("titel: A\n", "");
        let err = compile(&text).unwrap_err();
        assert!(err.to_string().contains("titel"));
    }

    #[test]
    fn test_missing_front_matter_fails() {
        assert!(matches!(
            compile("# Only body"),
            Err(CompileError::FrontMatter(FrontMatterError::Missing))
        ));
    }
}
