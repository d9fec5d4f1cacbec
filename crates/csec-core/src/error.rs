//! Error types for the csec-core library.

use thiserror::Error;

/// Main error type for the csec library.
#[derive(Error, Debug)]
pub enum CsecError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Page or document fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Listing crawl error.
    #[error("crawl error: {0}")]
    Crawl(#[from] CrawlError),

    /// Invalid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to reconstruct text lines from page content.
    #[error("failed to extract layout: {0}")]
    LayoutExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors reported by a [`crate::PageFetcher`].
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The request did not complete in time.
    #[error("timed out fetching {0}")]
    Timeout(String),

    /// Connection, TLS or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a listing crawl.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The listing page yielded no product links at all.
    #[error("no product links found on the listing page {url}")]
    NoProductLinks { url: String },

    /// A detail page failed and the crawl was configured to stop.
    #[error("detail page {url} failed: {reason}")]
    DetailFailed { url: String, reason: String },
}

/// Result type for the csec library.
pub type Result<T> = std::result::Result<T, CsecError>;
