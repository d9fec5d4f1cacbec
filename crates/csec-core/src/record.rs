//! Assembly of one certification record from a detail page.

use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::html::{DetailPage, HtmlExtractor, find_pdf_url};
use crate::identification::IdentificationExtractor;
use crate::models::config::CsecConfig;
use crate::models::record::{CanonicalField, ProductRecord};
use crate::pdf::{PdfDecoder, PdfExtractor};

/// Turns detail pages into [`ProductRecord`]s.
pub struct RecordExtractor<D = PdfExtractor> {
    html: HtmlExtractor,
    identification: IdentificationExtractor<D>,
    origin: Url,
}

impl RecordExtractor<PdfExtractor> {
    pub fn new(config: &CsecConfig) -> Result<Self> {
        Self::with_decoder(PdfExtractor::new(), config)
    }
}

impl<D: PdfDecoder> RecordExtractor<D> {
    pub fn with_decoder(decoder: D, config: &CsecConfig) -> Result<Self> {
        Ok(Self {
            html: HtmlExtractor::new(&config.html)?,
            identification: IdentificationExtractor::with_decoder(decoder, &config.pdf)?,
            origin: Url::parse(&config.crawl.site_origin)?,
        })
    }

    pub fn html(&self) -> &HtmlExtractor {
        &self.html
    }

    /// Build the record for `page`.
    ///
    /// Missing fields stay empty (Certification ID becomes `NA`). The
    /// certification report is only downloaded when the page links one; a
    /// failed download leaves ITSEF empty.
    pub async fn extract_record<F: PageFetcher>(
        &self,
        page: &DetailPage,
        listing_name: &str,
        fetcher: &F,
    ) -> ProductRecord {
        let fields = self.html.extract(page);
        debug!("{}: {} field(s) from HTML", page.url, fields.len());

        let report_url = find_pdf_url(fields.node(CanonicalField::CertificationReportUrl), &self.origin);
        let itsef = if report_url.is_empty() {
            debug!("{}: no certification report link", page.url);
            String::new()
        } else {
            match fetcher.fetch_bytes(&report_url).await {
                Ok(bytes) => self.identification.extract(&bytes),
                Err(e) => {
                    warn!("failed to download {}: {}", report_url, e);
                    String::new()
                }
            }
        };

        ProductRecord::from_fields(listing_name, &page.url, &fields, &itsef, &report_url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{FetchError, PdfError};
    use crate::pdf::PdfPageLines;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Fetcher serving canned responses and recording requested URLs.
    #[derive(Default)]
    pub(crate) struct StubFetcher {
        pub pages: HashMap<String, String>,
        pub documents: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, url: &str) -> std::result::Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }

        async fn fetch_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.documents.get(url).cloned().ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    /// Decoder that treats the document bytes as the report text.
    pub(crate) struct Utf8Decoder;

    impl PdfDecoder for Utf8Decoder {
        fn extract_text(&self, data: &[u8]) -> crate::pdf::Result<String> {
            String::from_utf8(data.to_vec()).map_err(|e| PdfError::TextExtraction(e.to_string()))
        }

        fn extract_lines(&self, _data: &[u8]) -> crate::pdf::Result<Vec<PdfPageLines>> {
            Ok(Vec::new())
        }
    }

    pub(crate) const DETAIL_URL: &str = "https://www.fmv.se/verksamhet/csec/example-ids/";
    pub(crate) const REPORT_URL: &str = "https://www.fmv.se/globalassets/csec/CSEC2021003-cr.pdf";

    pub(crate) fn detail_html(with_report: bool) -> String {
        let report = if with_report {
            r#"<tr><th>Certifieringsrapport</th><td><a href="/globalassets/csec/CSEC2021003-cr.pdf">Rapport (PDF)</a></td></tr>"#
        } else {
            ""
        };
        format!(
            r#"<html><body><main>
            <dl><dt>Product name</dt><dd>Example IDS</dd></dl>
            <table>
            <tr><th>Certifierings ID</th><td>CSEC2021003</td></tr>
            <tr><th>Utvecklare</th><td>Example AB</td></tr>
            {}
            </table></main></body></html>"#,
            report
        )
    }

    pub(crate) fn report_text() -> Vec<u8> {
        b"1 Executive summary\n2 Identification\nSponsor: Example AB\nITSEF: Combitech AB\n3 Security Policy\n".to_vec()
    }

    fn extractor() -> RecordExtractor<Utf8Decoder> {
        RecordExtractor::with_decoder(Utf8Decoder, &CsecConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_record() {
        let mut fetcher = StubFetcher::default();
        fetcher.documents.insert(REPORT_URL.to_string(), report_text());

        let page = DetailPage::parse(DETAIL_URL, &detail_html(true));
        let record = extractor().extract_record(&page, "Example IDS 2.0", &fetcher).await;

        assert_eq!(record.certification_id, "CSEC2021003");
        assert_eq!(record.product_name, "Example IDS");
        assert_eq!(record.developer, "Example AB");
        assert_eq!(record.itsef, "Combitech AB");
        assert_eq!(record.listing_name, "Example IDS 2.0");
        assert_eq!(record.product_url, DETAIL_URL);
        assert_eq!(record.certification_report_url, REPORT_URL);
        assert_eq!(*fetcher.requests.borrow(), vec![REPORT_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_report_link_skips_fetch() {
        let fetcher = StubFetcher::default();
        let page = DetailPage::parse(DETAIL_URL, &detail_html(false));
        let record = extractor().extract_record(&page, "Example IDS", &fetcher).await;

        assert_eq!(record.certification_id, "CSEC2021003");
        assert_eq!(record.itsef, "");
        assert_eq!(record.certification_report_url, "");
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_keeps_record() {
        let fetcher = StubFetcher::default();
        let page = DetailPage::parse(DETAIL_URL, &detail_html(true));
        let record = extractor().extract_record(&page, "Example IDS", &fetcher).await;

        assert_eq!(record.itsef, "");
        assert_eq!(record.certification_report_url, REPORT_URL);
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_defaults() {
        let fetcher = StubFetcher::default();
        let page = DetailPage::parse(DETAIL_URL, "<html><body><p>Nothing here</p></body></html>");
        let record = extractor().extract_record(&page, "Empty", &fetcher).await;

        assert_eq!(
            record,
            ProductRecord {
                listing_name: "Empty".to_string(),
                product_url: DETAIL_URL.to_string(),
                ..ProductRecord::default()
            }
        );
    }
}
