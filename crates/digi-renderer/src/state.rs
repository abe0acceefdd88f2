//! Event-processing state for the renderer.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

use crate::slug::Slugger;

/// Fenced or indented code block being collected.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Finish the block, returning `(language, content)`.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// Position inside the current table.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// `style` attribute for the current cell, empty when unaligned.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text of the image being collected.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID.
    pub id: String,
}

/// A heading that has been fully collected.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// Heading capture, anchor assignment and title extraction.
///
/// The first H1 becomes the document title. It is still rendered but is not
/// listed in the table of contents.
#[derive(Default)]
pub(crate) struct HeadingState {
    current_level: Option<u8>,
    /// Plain text, used for the slug and the ToC.
    text: String,
    /// Inline HTML, used for the rendered heading.
    html: String,
    title: Option<String>,
    toc: Vec<TocEntry>,
    slugger: Slugger,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let title = text.trim().to_owned();
        let id = self.slugger.slug(&title);

        if level == 1 && self.title.is_none() {
            self.title = Some(title);
        } else {
            self.toc.push(TocEntry {
                level,
                title,
                id: id.clone(),
            });
        }

        Some(CompletedHeading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Footnote numbering in order of first appearance.
#[derive(Default)]
pub(crate) struct FootnoteState {
    numbers: HashMap<String, usize>,
}

impl FootnoteState {
    /// Number for `name`, allocating the next one on first sight.
    pub(crate) fn number(&mut self, name: &str) -> usize {
        let next = self.numbers.len() + 1;
        *self.numbers.entry(name.to_owned()).or_insert(next)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_table_alignment_follows_cells() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        state.start_head();

        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");

        state.end_head();
        state.start_row();
        assert!(!state.is_in_head());
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );
    }

    #[test]
    fn test_first_h1_is_title_not_toc() {
        let mut state = HeadingState::default();
        state.start_heading(1);
        state.push_text("Title");
        let heading = state.complete_heading().unwrap();
        assert_eq!(heading.id, "title");

        state.start_heading(1);
        state.push_text("Second");
        state.complete_heading();

        assert_eq!(state.take_title(), Some("Title".to_owned()));
        let toc = state.take_toc();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "Second");
    }

    #[test]
    fn test_footnote_numbers_are_stable() {
        let mut state = FootnoteState::default();
        assert_eq!(state.number("b"), 1);
        assert_eq!(state.number("a"), 2);
        assert_eq!(state.number("b"), 1);
    }
}
