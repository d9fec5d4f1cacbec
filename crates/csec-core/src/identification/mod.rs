//! Recovery of the evaluation facility (ITSEF) from certification reports.
//!
//! The report's identification block is read twice if needed: first as
//! plain text, line by line, then as positioned lines so a label and a
//! value printed side by side in a table can be paired by geometry.

pub mod layout_mode;
pub mod rules;
pub mod section;
pub mod text_mode;

pub use layout_mode::RowGeometry;
pub use section::identification_section;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CsecError, PdfError, Result};
use crate::models::config::PdfConfig;
use crate::pdf::{PdfDecoder, PdfExtractor};
use crate::text::strip_soft_hyphens;
use rules::{LabelPatterns, is_valid_value};

/// Which recovery strategies to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Text mode, then layout mode.
    #[default]
    Auto,
    Text,
    Layout,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "text" => Ok(Self::Text),
            "layout" => Ok(Self::Layout),
            other => Err(format!("unknown mode '{}' (expected auto, text or layout)", other)),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Text => "text",
            Self::Layout => "layout",
        })
    }
}

type Strategy<D> = fn(&IdentificationExtractor<D>, &[u8]) -> String;

/// Extracts the target label's value from a certification report PDF.
pub struct IdentificationExtractor<D = PdfExtractor> {
    decoder: D,
    patterns: LabelPatterns,
    section_span_chars: usize,
    follow_lines: usize,
    geometry: RowGeometry,
}

impl IdentificationExtractor<PdfExtractor> {
    /// Create an extractor backed by [`PdfExtractor`].
    pub fn new(config: &PdfConfig) -> Result<Self> {
        Self::with_decoder(PdfExtractor::new(), config)
    }
}

impl<D: PdfDecoder> IdentificationExtractor<D> {
    const STRATEGIES: [(&'static str, Strategy<D>); 2] = [
        ("text", Self::text_mode),
        ("layout", Self::layout_mode),
    ];

    /// Create an extractor with a custom decoder.
    pub fn with_decoder(decoder: D, config: &PdfConfig) -> Result<Self> {
        let patterns = LabelPatterns::new(&config.target_label).map_err(|e| {
            CsecError::Config(format!("invalid target label '{}': {}", config.target_label, e))
        })?;
        Ok(Self {
            decoder,
            patterns,
            section_span_chars: config.section_span_chars,
            follow_lines: config.follow_lines,
            geometry: RowGeometry {
                row_tolerance: config.row_tolerance,
                min_gap: config.min_gap,
            },
        })
    }

    /// Run text mode, then layout mode. The first valid value wins; an
    /// empty string means neither strategy found one.
    pub fn extract(&self, data: &[u8]) -> String {
        self.extract_with_mode(data, ExtractionMode::Auto)
    }

    pub fn extract_with_mode(&self, data: &[u8], mode: ExtractionMode) -> String {
        for (name, strategy) in Self::STRATEGIES {
            let selected = match mode {
                ExtractionMode::Auto => true,
                ExtractionMode::Text => name == "text",
                ExtractionMode::Layout => name == "layout",
            };
            if !selected {
                continue;
            }

            let value = strategy(self, data);
            if is_valid_value(&value) {
                return value;
            }
            debug!("{} mode found no value", name);
        }
        String::new()
    }

    /// The identification block of the report text, soft hyphens removed.
    pub fn section_text(&self, data: &[u8]) -> std::result::Result<String, PdfError> {
        let text = strip_soft_hyphens(&self.decoder.extract_text(data)?);
        Ok(identification_section(&text, self.section_span_chars).to_string())
    }

    fn text_mode(&self, data: &[u8]) -> String {
        match self.section_text(data) {
            Ok(section) => text_mode::find_value(&section, &self.patterns, self.follow_lines),
            Err(e) => {
                debug!("text mode skipped: {}", e);
                String::new()
            }
        }
    }

    fn layout_mode(&self, data: &[u8]) -> String {
        match self.decoder.extract_lines(data) {
            Ok(pages) => layout_mode::find_value(&pages, &self.patterns.word, self.geometry),
            Err(e) => {
                debug!("layout mode skipped: {}", e);
                String::new()
            }
        }
    }
}
