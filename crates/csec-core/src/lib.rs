//! Core library for CSEC certification record extraction.
//!
//! This crate provides:
//! - Text normalization and label canonicalization (Swedish/English)
//! - HTML field extraction from certificate detail pages
//! - Certification report PDF decoding (text and line geometry)
//! - Identification-section field recovery (text mode and layout mode)
//! - Record assembly and a sequential listing crawler

pub mod crawl;
pub mod error;
pub mod fetch;
pub mod html;
pub mod identification;
pub mod labels;
pub mod models;
pub mod pdf;
pub mod record;
pub mod text;

pub use crawl::{CrawlEvent, CrawlFailure, CrawlReport, Crawler};
pub use error::{CrawlError, CsecError, FetchError, PdfError, Result};
pub use fetch::PageFetcher;
pub use html::{DetailPage, HtmlExtractor, ListingLink};
pub use identification::{ExtractionMode, IdentificationExtractor};
pub use labels::canonicalize;
pub use models::config::CsecConfig;
pub use models::record::{CanonicalField, ExtractedValue, FieldMap, ProductRecord};
pub use pdf::{PdfDecoder, PdfExtractor, PdfLine, PdfPageLines};
pub use record::RecordExtractor;
pub use text::normalize;
