//! Sequential crawl of the certificate listing.

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CrawlError, Result};
use crate::fetch::PageFetcher;
use crate::html::{DetailPage, ListingLink, collect_listing_links};
use crate::models::config::{CrawlConfig, CsecConfig};
use crate::models::record::ProductRecord;
use crate::pdf::{PdfDecoder, PdfExtractor};
use crate::record::RecordExtractor;

/// A detail page that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of a full crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Records in listing order.
    pub records: Vec<ProductRecord>,
    pub failures: Vec<CrawlFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Progress notifications emitted while crawling.
#[derive(Debug)]
pub enum CrawlEvent<'a> {
    /// The listing page was parsed.
    LinksCollected(usize),
    /// A detail page is about to be fetched.
    Started(&'a ListingLink),
    /// A detail page finished, successfully or not.
    Finished { link: &'a ListingLink, ok: bool },
}

/// Visits the listing page and then every product page, one at a time.
pub struct Crawler<D = PdfExtractor> {
    config: CrawlConfig,
    records: RecordExtractor<D>,
}

impl Crawler<PdfExtractor> {
    pub fn new(config: &CsecConfig) -> Result<Self> {
        Ok(Self {
            config: config.crawl.clone(),
            records: RecordExtractor::new(config)?,
        })
    }
}

impl<D: PdfDecoder> Crawler<D> {
    pub fn with_records(config: &CrawlConfig, records: RecordExtractor<D>) -> Self {
        Self {
            config: config.clone(),
            records,
        }
    }

    /// Fetch the listing page and collect its product links.
    ///
    /// A listing without any product link is an error.
    pub async fn collect_links<F: PageFetcher>(&self, fetcher: &F) -> Result<Vec<ListingLink>> {
        let url = &self.config.listing_url;
        info!("Fetching listing {}", url);
        let html = fetcher.fetch_page(url).await?;

        let links = {
            let doc = Html::parse_document(&html);
            collect_listing_links(&doc, url, &self.config)?
        };
        if links.is_empty() {
            return Err(CrawlError::NoProductLinks { url: url.clone() }.into());
        }
        Ok(links)
    }

    /// Fetch one detail page and build its record.
    pub async fn crawl_link<F: PageFetcher>(&self, fetcher: &F, link: &ListingLink) -> Result<ProductRecord> {
        let html = fetcher.fetch_page(&link.url).await?;
        let page = DetailPage::parse(link.url.as_str(), &html);
        Ok(self.records.extract_record(&page, &link.name, fetcher).await)
    }

    pub async fn run<F: PageFetcher>(&self, fetcher: &F) -> Result<CrawlReport> {
        self.run_with_progress(fetcher, |_| {}).await
    }

    /// Crawl everything, reporting progress through `progress`.
    ///
    /// Detail-page failures are collected in the report unless
    /// `continue_on_error` is off, in which case the first one aborts.
    pub async fn run_with_progress<F, P>(&self, fetcher: &F, mut progress: P) -> Result<CrawlReport>
    where
        F: PageFetcher,
        P: FnMut(CrawlEvent<'_>),
    {
        let started_at = Utc::now();
        let links = self.collect_links(fetcher).await?;
        progress(CrawlEvent::LinksCollected(links.len()));
        info!("Found {} product link(s)", links.len());

        let mut records = Vec::with_capacity(links.len());
        let mut failures = Vec::new();

        for (i, link) in links.iter().enumerate() {
            progress(CrawlEvent::Started(link));
            debug!("[{}/{}] {}", i + 1, links.len(), link.url);

            match self.crawl_link(fetcher, link).await {
                Ok(record) => {
                    records.push(record);
                    progress(CrawlEvent::Finished { link, ok: true });
                }
                Err(e) => {
                    progress(CrawlEvent::Finished { link, ok: false });
                    if !self.config.continue_on_error {
                        return Err(CrawlError::DetailFailed {
                            url: link.url.clone(),
                            reason: e.to_string(),
                        }
                        .into());
                    }
                    warn!("Skipping {}: {}", link.url, e);
                    failures.push(CrawlFailure {
                        url: link.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = CrawlReport {
            records,
            failures,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "Crawl finished: {} record(s), {} failure(s)",
            report.records.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsecError;
    use crate::record::tests::{
        DETAIL_URL, REPORT_URL, StubFetcher, Utf8Decoder, detail_html, report_text,
    };

    const LISTING_URL: &str = "https://www.fmv.se/verksamhet/ovrig-verksamhet/csec/certifikat-utgivna-av-csec/";
    const BROKEN_URL: &str = "https://www.fmv.se/verksamhet/csec/broken/";

    fn listing_html() -> String {
        format!(
            r#"<html><body><main>
            <a href="{}">Example IDS 2.0</a>
            <a href="/verksamhet/csec/broken/">Broken product</a>
            </main></body></html>"#,
            DETAIL_URL
        )
    }

    fn crawler(continue_on_error: bool) -> Crawler<Utf8Decoder> {
        let mut config = CsecConfig::default();
        config.crawl.continue_on_error = continue_on_error;
        let records = RecordExtractor::with_decoder(Utf8Decoder, &config).unwrap();
        Crawler::with_records(&config.crawl, records)
    }

    fn fetcher() -> StubFetcher {
        let mut fetcher = StubFetcher::default();
        fetcher.pages.insert(LISTING_URL.to_string(), listing_html());
        fetcher.pages.insert(DETAIL_URL.to_string(), detail_html(true));
        fetcher.documents.insert(REPORT_URL.to_string(), report_text());
        fetcher
    }

    #[tokio::test]
    async fn test_crawl_collects_records_and_failures() {
        let fetcher = fetcher();
        let mut finished = Vec::new();
        let report = crawler(true)
            .run_with_progress(&fetcher, |event| {
                if let CrawlEvent::Finished { link, ok } = event {
                    finished.push((link.name.clone(), ok));
                }
            })
            .await
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].listing_name, "Example IDS 2.0");
        assert_eq!(report.records[0].itsef, "Combitech AB");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, BROKEN_URL);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(
            finished,
            vec![("Example IDS 2.0".to_string(), true), ("Broken product".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_stop_on_first_failure() {
        let err = crawler(false).run(&fetcher()).await.unwrap_err();
        assert!(matches!(
            err,
            CsecError::Crawl(CrawlError::DetailFailed { ref url, .. }) if url == BROKEN_URL
        ));
    }

    #[tokio::test]
    async fn test_empty_listing_is_fatal() {
        let mut fetcher = StubFetcher::default();
        fetcher
            .pages
            .insert(LISTING_URL.to_string(), "<html><body><main></main></body></html>".to_string());

        let err = crawler(true).run(&fetcher).await.unwrap_err();
        assert!(matches!(err, CsecError::Crawl(CrawlError::NoProductLinks { .. })));
    }

    #[tokio::test]
    async fn test_listing_fetch_failure() {
        let err = crawler(true).run(&StubFetcher::default()).await.unwrap_err();
        assert!(matches!(err, CsecError::Fetch(_)));
    }
}
