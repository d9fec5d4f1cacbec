//! Row reconstruction from positioned text lines.

use regex::Regex;
use tracing::{debug, trace};

use super::rules::is_valid_value;
use crate::pdf::{PdfLine, PdfPageLines};

const ROW_TRIM: &[char] = &[' ', '.', ';', '-'];

/// Geometry thresholds for matching a label with the text to its right.
#[derive(Debug, Clone, Copy)]
pub struct RowGeometry {
    /// Maximum distance between vertical centers of the same row.
    pub row_tolerance: f64,
    /// Minimum horizontal gap between the label and a value.
    pub min_gap: f64,
}

impl Default for RowGeometry {
    fn default() -> Self {
        Self {
            row_tolerance: 2.2,
            min_gap: 1.0,
        }
    }
}

/// Find the value printed to the right of a line containing `label`.
///
/// Pages are scanned in order, and label lines in reading order within a
/// page. Returns an empty string when no row yields a valid value.
pub fn find_value(pages: &[PdfPageLines], label: &Regex, geometry: RowGeometry) -> String {
    for page in pages {
        for line in page.lines.iter().filter(|l| label.is_match(&l.text)) {
            let candidate = row_text(line, &page.lines, geometry);
            trace!("page {}: row candidate {:?}", page.number, candidate);
            if is_valid_value(&candidate) {
                debug!("layout mode: page {} value {:?}", page.number, candidate);
                return candidate;
            }
        }
    }
    String::new()
}

/// Text of the lines on the same row as `label`, right of it, left to right.
fn row_text(label: &PdfLine, lines: &[PdfLine], geometry: RowGeometry) -> String {
    let center = label.center_y();
    let mut row: Vec<&PdfLine> = lines
        .iter()
        .filter(|l| (l.center_y() - center).abs() < geometry.row_tolerance)
        .filter(|l| l.x0 > label.x1 + geometry.min_gap)
        .collect();
    row.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let joined = row.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join(" ");
    joined.trim_matches(ROW_TRIM).to_string()
}
