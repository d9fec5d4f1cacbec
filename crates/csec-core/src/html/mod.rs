//! Detail-page and listing-page HTML processing.

mod extractor;
mod listing;
mod pdf_link;

pub use extractor::HtmlExtractor;
pub use listing::{ListingLink, collect_listing_links};
pub use pdf_link::find_pdf_url;

use scraper::{ElementRef, Html};

use crate::text::normalize;

/// Elements whose boundaries start a new rendered line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "ul",
];

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A parsed product detail page.
pub struct DetailPage {
    /// Address the page was loaded from.
    pub url: String,
    /// Parsed document.
    pub document: Html,
}

impl DetailPage {
    /// Parse a detail page from its HTML source.
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

impl std::fmt::Debug for DetailPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailPage").field("url", &self.url).finish_non_exhaustive()
    }
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn render_into(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }
            let block = is_block(name);
            if block {
                out.push('\n');
            }
            render_into(child_el, out);
            if block {
                out.push('\n');
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Rendered text of an element with block-level boundaries as line breaks.
pub(crate) fn render_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_into(element, &mut out);
    out
}

/// Normalized single-line text of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize(&render_text(element))
}

/// Normalized, non-empty rendered lines of an element.
pub(crate) fn element_lines(element: ElementRef<'_>) -> Vec<String> {
    render_text(element)
        .lines()
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}
