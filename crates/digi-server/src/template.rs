//! HTML pages.
//!
//! Every page shares the header with the site logo, navigation and search
//! field. The search field carries its settings as `data-` attributes for
//! `/assets/search.js`; no inline script is emitted.

use std::fmt::Write;
use std::time::Duration;

use digi_renderer::{TocEntry, escape_html};
use digi_search::{BLUR_KEYS, Catalog, FOCUS_CODE, NO_RESULTS, PLACEHOLDER, SHORTCUT_LABEL};
use digi_site::CompiledDocument;

const SITE_TITLE: &str = "Digitale Grundbildung";
const SITE_DESCRIPTION: &str = "Digitale Grundbildung - Blog";

/// Header navigation: label and target.
const NAV_LINKS: [(&str, &str); 2] = [("Home", "/"), ("Datei-Explorer", "/?markdown=datei-explorer")];

/// Settings shared by all pages.
pub(crate) struct Layout {
    pub(crate) debounce: Duration,
}

impl Layout {
    /// Home without a selected document, listing the catalog.
    pub(crate) fn nothing_selected(&self, catalog: &Catalog) -> String {
        let mut main = String::from("<h1>Home: NO SLUG GIVEN</h1>\n");
        render_catalog(&mut main, catalog);
        self.page(SITE_TITLE, &main)
    }

    /// The requested document is unavailable.
    pub(crate) fn not_found(&self) -> String {
        self.page(SITE_TITLE, "<h1>Home: NO DOCUMENT FOUND</h1>\n")
    }

    pub(crate) fn document(&self, doc: &CompiledDocument) -> String {
        let meta = &doc.front_matter;
        let mut main = String::with_capacity(doc.html.len() + 1024);

        main.push_str("<div class=\"document\">\n<article class=\"prose\">\n");
        let _ = writeln!(
            main,
            "<p class=\"document-meta\">{}. Schulstufe · {}</p>",
            escape_html(&meta.schulstufe),
            escape_html(&meta.modul),
        );
        if !meta.kompetenzen.is_empty() {
            main.push_str("<ul class=\"tags\">");
            for kompetenz in &meta.kompetenzen {
                let _ = write!(
                    main,
                    "<li title=\"{}\">{}</li>",
                    escape_html(kompetenz.description()),
                    kompetenz.symbol(),
                );
            }
            main.push_str("</ul>\n");
        }
        main.push_str(&doc.html);
        main.push_str("\n</article>\n");
        render_toc(&mut main, &doc.toc);
        main.push_str("</div>\n");

        let title = format!("{} · {SITE_TITLE}", doc.display_title());
        self.page(&title, &main)
    }

    fn page(&self, title: &str, main: &str) -> String {
        let mut html = String::with_capacity(main.len() + 2048);

        html.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape_html(title));
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{SITE_DESCRIPTION}\">"
        );
        html.push_str("<link rel=\"stylesheet\" href=\"/assets/style.css\">\n");
        html.push_str("<script src=\"/assets/search.js\" defer></script>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str("<header class=\"site-header\">\n<div class=\"container\">\n");
        html.push_str("<a href=\"/\" class=\"logo\">DigiBlog</a>\n");
        html.push_str("<ul class=\"nav\">\n");
        for (label, href) in NAV_LINKS {
            let _ = writeln!(html, "<li><a href=\"{}\">{label}</a></li>", escape_html(href));
        }
        html.push_str("</ul>\n");
        self.render_search_field(&mut html);
        html.push_str("</div>\n</header>\n");

        html.push_str("<main class=\"container\">\n");
        html.push_str(main);
        html.push_str("</main>\n</body>\n</html>");
        html
    }

    fn render_search_field(&self, html: &mut String) {
        let _ = writeln!(
            html,
            "<div class=\"search\" data-search data-debounce-ms=\"{}\" \
             data-focus-code=\"{FOCUS_CODE}\" data-blur-keys=\"{}\" \
             data-no-results=\"{}\">",
            self.debounce.as_millis(),
            BLUR_KEYS.join(" "),
            escape_html(NO_RESULTS),
        );
        let _ = writeln!(
            html,
            "<input type=\"search\" id=\"data-search\" spellcheck=\"false\" \
             autocomplete=\"off\" placeholder=\"{}\">",
            escape_html(PLACEHOLDER),
        );
        let _ = writeln!(html, "<span class=\"shortcut\">{SHORTCUT_LABEL}</span>");
        html.push_str("<ul class=\"search-results\" hidden></ul>\n</div>\n");
    }
}

fn render_catalog(html: &mut String, catalog: &Catalog) {
    html.push_str("<section class=\"catalog\">\n");
    for group in catalog.groups().iter().filter(|g| !g.children.is_empty()) {
        let _ = writeln!(html, "<h2>{}</h2>\n<ul>", escape_html(&group.label));
        for entry in &group.children {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\"><strong>{}</strong><span class=\"excerpt\">{}</span></a></li>",
                escape_html(&group.href(entry)),
                escape_html(&entry.title),
                escape_html(&entry.description),
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");
}

fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"toc\">\n<h3>Auf dieser Seite</h3>\n<ul>\n");
    for entry in toc {
        let _ = writeln!(
            html,
            "<li class=\"level-{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title),
        );
    }
    html.push_str("</ul>\n</aside>\n");
}
