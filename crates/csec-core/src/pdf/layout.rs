//! Text line reconstruction from positioned glyphs.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

use super::{PdfLine, PdfPageLines};
use crate::text::{normalize, strip_soft_hyphens};

/// Horizontal gap, in glyph heights, that splits a row into separate lines.
const CHAR_MARGIN: f64 = 2.0;
/// Horizontal gap, in glyph heights, treated as a word break.
const WORD_MARGIN: f64 = 0.1;
/// Baseline shift, in glyph heights, that starts a new line.
const LINE_SHIFT: f64 = 0.5;

#[derive(Debug)]
struct OpenLine {
    text: String,
    x0: f64,
    x1: f64,
    baseline: f64,
    height: f64,
}

/// Collects glyphs emitted by `pdf_extract::output_doc` into text lines.
///
/// Glyphs are grouped geometrically: a glyph continues the open line when it
/// sits on the same baseline, does not jump backwards and is not separated by
/// a wide gap. Content-stream line operators are ignored, so a label and its
/// value drawn in separate text objects on the same row stay separate lines.
#[derive(Debug, Default)]
pub struct LineCollector {
    pages: Vec<PdfPageLines>,
    page: Option<PdfPageLines>,
    line: Option<OpenLine>,
    pending_space: bool,
}

impl LineCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish collection and return the pages seen.
    pub fn into_pages(mut self) -> Vec<PdfPageLines> {
        self.close_page();
        self.pages
    }

    fn flush_line(&mut self) {
        self.pending_space = false;
        let Some(line) = self.line.take() else {
            return;
        };
        let text = normalize(&strip_soft_hyphens(&line.text));
        if text.is_empty() {
            return;
        }
        let page = self.page.get_or_insert_with(PdfPageLines::default);
        page.lines.push(PdfLine::new(
            text,
            line.x0,
            line.baseline,
            line.x1,
            line.baseline + line.height,
        ));
    }

    fn close_page(&mut self) {
        self.flush_line();
        if let Some(page) = self.page.take() {
            self.pages.push(page);
        }
    }

    fn starts_new_line(line: &OpenLine, x: f64, y: f64, height: f64) -> bool {
        let h = line.height.max(height);
        (y - line.baseline).abs() > LINE_SHIFT * h
            || x + LINE_SHIFT * h < line.x1
            || x - line.x1 > CHAR_MARGIN * h
    }
}

impl OutputDev for LineCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.close_page();
        self.page = Some(PdfPageLines {
            number: page_num,
            lines: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.close_page();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scale_x = trm.m11.hypot(trm.m12);
        let scale_y = trm.m21.hypot(trm.m22);
        let height = match (font_size * scale_y).abs() {
            h if h > 0.0 => h,
            _ => 1.0,
        };
        let (x, y) = (trm.m31, trm.m32);
        let advance = width * font_size * scale_x;

        if char.trim().is_empty() {
            if self.line.is_some() {
                self.pending_space = true;
            }
            return Ok(());
        }

        if self
            .line
            .as_ref()
            .is_some_and(|line| Self::starts_new_line(line, x, y, height))
        {
            self.flush_line();
        }

        match self.line.as_mut() {
            Some(line) => {
                let gap = x - line.x1;
                if (self.pending_space || gap > WORD_MARGIN * height) && !line.text.ends_with(' ') {
                    line.text.push(' ');
                }
                line.text.push_str(char);
                line.x1 = line.x1.max(x + advance);
                line.height = line.height.max(height);
            }
            None => {
                self.line = Some(OpenLine {
                    text: char.to_string(),
                    x0: x,
                    x1: x + advance,
                    baseline: y,
                    height,
                });
            }
        }
        self.pending_space = false;
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> Transform {
        Transform::row_major(1.0, 0.0, 0.0, 1.0, x, y)
    }

    fn media_box() -> MediaBox {
        MediaBox {
            llx: 0.0,
            lly: 0.0,
            urx: 595.0,
            ury: 842.0,
        }
    }

    /// Emit `text` as 10pt glyphs, each 0.6 em wide, starting at (x, y).
    fn draw(collector: &mut LineCollector, text: &str, x: f64, y: f64) {
        let mut pen = x;
        for ch in text.chars() {
            collector
                .output_character(&at(pen, y), 0.6, 0.0, 10.0, &ch.to_string())
                .unwrap();
            pen += 6.0;
        }
    }

    #[test]
    fn test_groups_glyphs_into_lines() {
        let mut collector = LineCollector::new();
        collector.begin_page(1, &media_box(), None).unwrap();
        draw(&mut collector, "ITSEF", 100.0, 700.0);
        draw(&mut collector, "Combitech AB", 200.0, 700.0);
        draw(&mut collector, "Sponsor", 100.0, 680.0);
        collector.end_page().unwrap();

        let pages = collector.into_pages();
        assert_eq!(pages.len(), 1);
        let texts: Vec<_> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["ITSEF", "Combitech AB", "Sponsor"]);

        let label = &pages[0].lines[0];
        assert_eq!(label.x0, 100.0);
        assert_eq!(label.x1, 130.0);
        assert_eq!(label.y0, 700.0);
        assert_eq!(label.y1, 710.0);
    }

    #[test]
    fn test_small_gap_is_a_word_break() {
        let mut collector = LineCollector::new();
        collector.begin_page(1, &media_box(), None).unwrap();
        draw(&mut collector, "Atsec", 100.0, 500.0);
        draw(&mut collector, "AB", 134.0, 500.0);
        draw(&mut collector, "soft\u{AD}ware", 100.0, 480.0);
        let pages = collector.into_pages();

        let texts: Vec<_> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Atsec AB", "software"]);
    }

    #[test]
    fn test_pages_are_numbered() {
        let mut collector = LineCollector::new();
        collector.begin_page(1, &media_box(), None).unwrap();
        draw(&mut collector, "one", 100.0, 500.0);
        collector.end_page().unwrap();
        collector.begin_page(2, &media_box(), None).unwrap();
        collector.end_page().unwrap();
        collector.begin_page(3, &media_box(), None).unwrap();
        draw(&mut collector, "three", 100.0, 500.0);
        collector.end_page().unwrap();

        let pages = collector.into_pages();
        let numbers: Vec<_> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(pages[1].lines.is_empty());
        assert_eq!(pages[2].lines[0].text, "three");
    }
}
