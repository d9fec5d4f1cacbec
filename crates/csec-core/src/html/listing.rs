//! Product link discovery on the certificate listing page.

use std::collections::HashSet;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use super::element_text;
use crate::error::{CsecError, Result};
use crate::models::config::CrawlConfig;

/// A product link found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingLink {
    /// Absolute detail-page URL, without fragment.
    pub url: String,
    /// Anchor text, used as the record's listing name.
    pub name: String,
}

/// Collect product links from a listing page.
///
/// Anchors are taken in document order from `config.listing_selector`. An
/// anchor is kept when its href contains `config.link_keyword`
/// (case-insensitive), resolves to a URL under `config.site_origin` and has
/// non-empty text. Links are de-duplicated on URL and lowercased text.
pub fn collect_listing_links(doc: &Html, page_url: &str, config: &CrawlConfig) -> Result<Vec<ListingLink>> {
    let selector = Selector::parse(&config.listing_selector).map_err(|e| {
        CsecError::Config(format!(
            "invalid listing selector '{}': {}",
            config.listing_selector, e
        ))
    })?;
    let base = Url::parse(page_url)?;
    let origin_prefix = format!("{}/", config.site_origin.trim_end_matches('/'));
    let keyword = config.link_keyword.to_lowercase();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc.select(&selector) {
        let href = anchor.value().attr("href").unwrap_or("").trim();
        if href.is_empty() || !href.to_lowercase().contains(&keyword) {
            continue;
        }

        let Ok(mut url) = base.join(href) else {
            trace!("unresolvable href skipped: {}", href);
            continue;
        };
        url.set_fragment(None);
        let url = url.to_string();
        if !url.starts_with(&origin_prefix) {
            continue;
        }

        let name = element_text(anchor);
        if name.is_empty() {
            continue;
        }

        if seen.insert((url.clone(), name.to_lowercase())) {
            links.push(ListingLink { url, name });
        }
    }

    debug!("collected {} product link(s) from {}", links.len(), page_url);
    Ok(links)
}
