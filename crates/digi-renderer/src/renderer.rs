//! Event-driven Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::state::{
    CodeBlockState, FootnoteState, HeadingState, ImageState, TableState, TocEntry, escape_html,
};

/// Result of rendering markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// Every heading except the title, in document order.
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer producing an HTML fragment.
///
/// Supports GitHub-flavoured extensions: tables with column alignment,
/// strikethrough, task lists and footnotes. Every heading gets an `id`
/// anchor (see [`slugify`](crate::slugify)). Raw HTML in the source is
/// passed through unchanged.
///
/// A renderer is consumed by [`render`](Self::render), so anchors are unique
/// per document.
#[derive(Default)]
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    footnotes: FootnoteState,
    pending_image: Option<(String, String)>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            ..Self::default()
        }
    }

    /// Parser options matching the supported extensions.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
    }

    /// Parse and render markdown text.
    #[must_use]
    pub fn render_markdown(self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, Self::parser_options()))
    }

    /// Render a stream of parser events.
    pub fn render<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: self.output,
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
        }
    }

    fn push_inline(&mut self, content: &str) {
        // Alt text is plain, markup inside an image is dropped
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.push_inline("\n"),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.output.push_str(if checked {
                r#"<input type="checkbox" checked disabled> "#
            } else {
                r#"<input type="checkbox" disabled> "#
            }),
            Event::FootnoteReference(name) => self.footnote_reference(&name),
            Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written once the anchor is known
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(name) => {
                let number = self.footnotes.number(&name);
                let _ = write!(
                    self.output,
                    r#"<div class="footnote-definition" id="fn-{}"><sup class="footnote-definition-label">{number}</sup>"#,
                    escape_html(&name)
                );
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{cell}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    let _ = write!(link, r#" title="{}""#, escape_html(&title));
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{id}">{html}</h{level}>"#,
                        level = heading.level,
                        id = escape_html(&heading.id),
                        html = heading.html,
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => {
                        let _ = write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        );
                    }
                    None => {
                        let _ = write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&content)
                        );
                    }
                }
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition => self.output.push_str("</div>"),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut img = format!(r#"<img src="{}""#, escape_html(&src));
                    if !title.is_empty() {
                        let _ = write!(img, r#" title="{}""#, escape_html(&title));
                    }
                    let _ = write!(img, r#" alt="{}">"#, escape_html(&alt));
                    self.push_inline(&img);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn footnote_reference(&mut self, name: &str) {
        let number = self.footnotes.number(name);
        let reference = format!(
            r##"<sup class="footnote-reference"><a href="#fn-{}">{number}</a></sup>"##,
            escape_html(name)
        );
        self.push_inline(&reference);
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new().render_markdown(markdown)
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_every_heading_gets_an_id() {
        let result = render("# Datei-Explorer\n\n## Was ist ein Ordner?\n\n###### Tief");
        assert_eq!(
            result.html,
            concat!(
                r#"<h1 id="datei-explorer">Datei-Explorer</h1>"#,
                r#"<h2 id="was-ist-ein-ordner">Was ist ein Ordner?</h2>"#,
                r#"<h6 id="tief">Tief</h6>"#,
            )
        );
    }

    #[test]
    fn test_title_and_toc() {
        let result = render("# My Title\n\nText\n\n## Section\n\n### Sub");

        assert_eq!(result.title, Some("My Title".to_owned()));
        assert_eq!(
            result.toc,
            vec![
                TocEntry {
                    level: 2,
                    title: "Section".to_owned(),
                    id: "section".to_owned(),
                },
                TocEntry {
                    level: 3,
                    title: "Sub".to_owned(),
                    id: "sub".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render("## FAQ\n\n## FAQ\n\n## FAQ");
        let ids: Vec<_> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_unicode_heading_id() {
        let result = render("## Übung: Größe");
        assert_eq!(result.html, r#"<h2 id="übung-größe">Übung: Größe</h2>"#);
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let result = render("## Install `npm` **now**");
        assert_eq!(
            result.html,
            r#"<h2 id="install-npm-now">Install <code>npm</code> <strong>now</strong></h2>"#
        );
        assert_eq!(result.toc[0].title, "Install npm now");
    }

    #[test]
    fn test_table_structure() {
        let result = render("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left">A</th><th style="text-align:right">B</th>"#,
                "</tr></thead><tbody><tr>",
                r#"<td style="text-align:left">1</td><td style="text-align:right">2</td>"#,
                "</tr></tbody></table>",
            )
        );
    }

    #[test]
    fn test_code_block_is_escaped() {
        let result = render("```html\n<b>x</b>\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-html\">&lt;b&gt;x&lt;/b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        let result = render("<div class=\"box\">hi</div>\n\nText with <kbd>Ctrl</kbd>");
        assert!(result.html.contains("<div class=\"box\">hi</div>"));
        assert!(result.html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_inline_formatting() {
        let result = render("*a* **b** ~~c~~ [d](https://example.com \"D\")");
        assert_eq!(
            result.html,
            r#"<p><em>a</em> <strong>b</strong> <del>c</del> <a href="https://example.com" title="D">d</a></p>"#
        );
    }

    #[test]
    fn test_image_alt_text() {
        let result = render("![Der *Explorer*](explorer.png)");
        assert_eq!(
            result.html,
            r#"<p><img src="explorer.png" alt="Der Explorer"></p>"#
        );
    }

    #[test]
    fn test_lists_and_tasks() {
        let result = render("3. drei\n4. vier\n\n- [x] fertig\n- [ ] offen");
        assert!(result.html.starts_with(r#"<ol start="3"><li>drei</li>"#));
        assert!(
            result
                .html
                .contains(r#"<li><input type="checkbox" checked disabled> fertig</li>"#)
        );
        assert!(
            result
                .html
                .contains(r#"<li><input type="checkbox" disabled> offen</li>"#)
        );
    }

    #[test]
    fn test_footnotes() {
        let result = render("Text[^note].\n\n[^note]: Erklärung");
        assert!(
            result
                .html
                .contains(r##"<sup class="footnote-reference"><a href="#fn-note">1</a></sup>"##)
        );
        assert!(result.html.contains(r#"<div class="footnote-definition" id="fn-note">"#));
        assert!(result.html.contains("Erklärung"));
    }

    #[test]
    fn test_blockquote_and_rule() {
        let result = render("> Zitat\n\n---");
        assert_eq!(result.html, "<blockquote><p>Zitat</p></blockquote><hr>");
    }
}
