//! PDF text and line extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, trace};

use super::layout::LineCollector;
use super::{PdfDecoder, PdfPageLines, Result};
use crate::error::PdfError;

/// PDF decoder backed by lopdf and pdf-extract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse `data`, decrypting empty-password documents, and return bytes
    /// pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        if !doc.is_encrypted() {
            debug!("Loaded PDF with {} pages", page_count);
            return Ok(data.to_vec());
        }

        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password ({} pages)", page_count);

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Ok(decrypted)
    }
}

/// Run a pdf-extract call, turning a panic inside the decoder into an error.
fn guarded<T>(run: impl FnOnce() -> std::result::Result<T, String>) -> std::result::Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "decoder panicked".to_string());
            Err(message)
        }
    }
}

impl PdfDecoder for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let bytes = self.prepare(data)?;
        let text = guarded(|| pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string()))
            .map_err(PdfError::TextExtraction)?;
        trace!("extracted {} chars of text", text.len());
        Ok(text)
    }

    fn extract_lines(&self, data: &[u8]) -> Result<Vec<PdfPageLines>> {
        let bytes = self.prepare(data)?;
        let pages = guarded(|| {
            let doc = pdf_extract::Document::load_mem(&bytes).map_err(|e| e.to_string())?;
            let mut collector = LineCollector::new();
            pdf_extract::output_doc(&doc, &mut collector).map_err(|e| e.to_string())?;
            Ok(collector.into_pages())
        })
        .map_err(PdfError::LayoutExtraction)?;

        debug!(
            "extracted {} line(s) across {} page(s)",
            pages.iter().map(|p| p.lines.len()).sum::<usize>(),
            pages.len()
        );
        Ok(pages)
    }
}
