//! Certification report decoding.
//!
//! Two views of a PDF are needed: the page-concatenated text for the
//! line-oriented identification scan, and per-page text lines with
//! bounding boxes for the geometric fallback.

mod extractor;
mod layout;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use extractor::PdfExtractor;
pub use layout::LineCollector;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A line of text with its bounding box in PDF user space.
///
/// `y0` is the baseline and `y1` the top of the tallest glyph; y grows
/// upward as in the PDF coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfLine {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PdfLine {
    pub fn new(text: impl Into<String>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            y0,
            y1,
        }
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

/// Text lines of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfPageLines {
    /// Page number (1-indexed).
    pub number: u32,
    pub lines: Vec<PdfLine>,
}

/// Trait for PDF decoders.
pub trait PdfDecoder {
    /// Text of all pages, concatenated in page order.
    fn extract_text(&self, data: &[u8]) -> Result<String>;

    /// Text lines with bounding boxes, grouped per page.
    fn extract_lines(&self, data: &[u8]) -> Result<Vec<PdfPageLines>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_center() {
        let line = PdfLine::new("ITSEF", 100.0, 700.0, 130.0, 710.0);
        assert_eq!(line.center_y(), 705.0);
    }
}
