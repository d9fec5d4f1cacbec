//! Page and document retrieval seam.

use crate::error::FetchError;

/// Retrieves listing pages, detail pages and certification reports.
///
/// Implementations own transport concerns (user agent, timeouts). A
/// non-success HTTP status must be reported as an error.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch an HTML page as text.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a binary document such as a PDF.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
