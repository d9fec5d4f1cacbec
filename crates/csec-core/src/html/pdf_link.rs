//! Certification report link lookup.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use tracing::trace;
use url::Url;

use super::element_text;

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a").unwrap();
}

fn is_pdf_anchor(anchor: ElementRef<'_>) -> bool {
    let href_is_pdf = anchor
        .value()
        .attr("href")
        .is_some_and(|h| h.to_lowercase().contains(".pdf"));
    href_is_pdf || element_text(anchor).to_lowercase().contains("pdf")
}

/// Find the certification report PDF linked from a value element.
///
/// The first anchor inside `node` whose href contains `.pdf`, or whose text
/// mentions "PDF", is resolved against `base`. Returns an empty string when
/// there is no node, no such anchor, or no usable href.
pub fn find_pdf_url(node: Option<ElementRef<'_>>, base: &Url) -> String {
    let Some(node) = node else {
        return String::new();
    };
    let Some(anchor) = node.select(&ANCHOR).find(|a| is_pdf_anchor(*a)) else {
        trace!("no PDF anchor under <{}>", node.value().name());
        return String::new();
    };

    let href = anchor.value().attr("href").unwrap_or("").trim();
    if href.is_empty() {
        return String::new();
    }
    base.join(href).map(|u| u.to_string()).unwrap_or_default()
}
