//! Detail-page field extraction.
//!
//! Fields are collected by a fixed chain of strategies, each of which only
//! fills fields the previous ones left unset:
//!
//! 1. table rows (`label | value` cells)
//! 2. definition lists (`<dt>` followed by its value element)
//! 3. row-like blocks whose text reads `label: value`
//! 4. a label-proximity lookup, used only for the certification ID

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::{DetailPage, element_lines, element_text};
use crate::error::{CsecError, Result};
use crate::labels::canonicalize;
use crate::models::config::HtmlConfig;
use crate::models::record::{CanonicalField, ExtractedValue, FieldMap};
use crate::text::{fold_label, split_label_value};

lazy_static! {
    static ref TABLE_ROW: Selector = Selector::parse("table tr").unwrap();
    static ref DEFINITION_TERM: Selector = Selector::parse("dt").unwrap();
    static ref PROXIMITY_TARGET: Selector = Selector::parse("p, div, td, li").unwrap();
}

/// Candidate `(field, value)` pairs produced by one strategy, in document order.
type Candidates<'a> = Vec<(CanonicalField, ExtractedValue<'a>)>;

/// A bulk strategy scans the whole document for labelled values.
type BulkStrategy = for<'a> fn(&HtmlExtractor, &'a Html) -> Candidates<'a>;

/// A proximity locator picks the value element for a label element.
type ProximityLocator = for<'a> fn(&[ElementRef<'a>], ElementRef<'a>) -> Option<ElementRef<'a>>;

/// Bulk strategies in priority order.
const BULK_STRATEGIES: [(&str, BulkStrategy); 3] = [
    ("table", HtmlExtractor::scan_tables),
    ("definition-list", HtmlExtractor::scan_definition_lists),
    ("block", HtmlExtractor::scan_blocks),
];

/// Proximity locators in priority order.
const PROXIMITY_LOCATORS: [(&str, ProximityLocator); 3] = [
    ("following", following_element),
    ("following-block", following_block_element),
    ("parent-following", parent_following_element),
];

/// Extracts canonical fields from product detail pages.
pub struct HtmlExtractor {
    block_selector: Selector,
    block_scan_limit: usize,
    proximity_labels: Vec<String>,
}

impl HtmlExtractor {
    /// Create an extractor from configuration.
    pub fn new(config: &HtmlConfig) -> Result<Self> {
        let block_selector = Selector::parse(&config.block_selector).map_err(|e| {
            CsecError::Config(format!(
                "invalid block selector '{}': {}",
                config.block_selector, e
            ))
        })?;

        Ok(Self {
            block_selector,
            block_scan_limit: config.block_scan_limit,
            proximity_labels: config
                .proximity_labels
                .iter()
                .map(|l| fold_label(l))
                .filter(|l| !l.is_empty())
                .collect(),
        })
    }

    /// Set the maximum number of elements visited by the block scan.
    pub fn with_block_scan_limit(mut self, limit: usize) -> Self {
        self.block_scan_limit = limit;
        self
    }

    /// Extract every recognizable field from a detail page.
    pub fn extract<'a>(&self, page: &'a DetailPage) -> FieldMap<'a> {
        self.extract_document(&page.document)
    }

    /// Extract every recognizable field from a parsed document.
    pub fn extract_document<'a>(&self, doc: &'a Html) -> FieldMap<'a> {
        let mut fields = FieldMap::new();

        for (name, strategy) in BULK_STRATEGIES {
            let mut added = 0;
            for (field, value) in strategy(self, doc) {
                if fields.insert_if_absent(field, value) {
                    added += 1;
                }
            }
            debug!("{} scan filled {} field(s)", name, added);
        }

        if fields.text(CanonicalField::CertificationId).is_empty() {
            if let Some(value) = self.certification_id_near_label(doc) {
                debug!("certification ID recovered next to its label: {}", value.text);
                fields.fill_if_empty(CanonicalField::CertificationId, value);
            }
        }

        fields
    }

    /// Table rows with at least two cells: first cell is the label, second the value.
    fn scan_tables<'a>(&self, doc: &'a Html) -> Candidates<'a> {
        let mut out = Vec::new();
        for row in doc.select(&TABLE_ROW) {
            let cells: Vec<ElementRef<'a>> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "td" | "th"))
                .collect();
            if cells.len() < 2 {
                continue;
            }
            if let Some(field) = canonicalize(&element_text(cells[0])) {
                let value = element_text(cells[1]);
                trace!("table row: {} = {:?}", field, value);
                out.push((field, ExtractedValue::new(value, cells[1])));
            }
        }
        out
    }

    /// `<dt>` labels paired with the element right after them.
    fn scan_definition_lists<'a>(&self, doc: &'a Html) -> Candidates<'a> {
        let mut out = Vec::new();
        for term in doc.select(&DEFINITION_TERM) {
            let Some(field) = canonicalize(&element_text(term)) else {
                continue;
            };
            if let Some(value) = term.next_siblings().find_map(ElementRef::wrap) {
                out.push((field, ExtractedValue::new(element_text(value), value)));
            }
        }
        out
    }

    /// Row-like blocks whose rendered lines read `label: value`.
    ///
    /// A line that is only `label:` takes the next line as its value.
    fn scan_blocks<'a>(&self, doc: &'a Html) -> Candidates<'a> {
        let mut out = Vec::new();
        for block in doc.select(&self.block_selector).take(self.block_scan_limit) {
            let lines = element_lines(block);
            for (i, line) in lines.iter().enumerate() {
                let Some((label, value)) = split_label_value(line) else {
                    continue;
                };
                let value = match (value.is_empty(), lines.get(i + 1)) {
                    (true, Some(next)) if !next.contains(':') => next.as_str(),
                    _ => value,
                };
                if value.is_empty() {
                    continue;
                }
                if let Some(field) = canonicalize(label) {
                    out.push((field, ExtractedValue::new(value, block)));
                }
            }
        }
        out
    }

    /// Find an element whose whole text is a certification ID label and read
    /// the value from the element that follows it.
    fn certification_id_near_label<'a>(&self, doc: &'a Html) -> Option<ExtractedValue<'a>> {
        if self.proximity_labels.is_empty() {
            return None;
        }

        let elements: Vec<ElementRef<'a>> = doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();

        let label = elements.iter().copied().find(|el| {
            let folded = fold_label(&element_text(*el));
            self.proximity_labels.iter().any(|l| *l == folded)
        })?;

        for (name, locate) in PROXIMITY_LOCATORS {
            let Some(node) = locate(&elements, label) else {
                trace!("{} locator found nothing", name);
                continue;
            };
            let text = element_text(node);
            if !text.is_empty() {
                debug!("{} locator matched", name);
                return Some(ExtractedValue::new(text, node));
            }
        }
        None
    }
}

fn is_descendant_of(el: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    el.ancestors().any(|a| a.id() == ancestor.id())
}

/// Elements after `anchor` in document order, excluding its own descendants.
fn following<'a, 'e>(
    elements: &'e [ElementRef<'a>],
    anchor: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'e
where
    'a: 'e,
{
    let start = elements
        .iter()
        .position(|el| el.id() == anchor.id())
        .map_or(elements.len(), |i| i + 1);
    elements[start..]
        .iter()
        .copied()
        .filter(move |el| !is_descendant_of(*el, anchor))
}

fn following_element<'a>(elements: &[ElementRef<'a>], label: ElementRef<'a>) -> Option<ElementRef<'a>> {
    following(elements, label).next()
}

fn following_block_element<'a>(
    elements: &[ElementRef<'a>],
    label: ElementRef<'a>,
) -> Option<ElementRef<'a>> {
    following(elements, label).find(|el| PROXIMITY_TARGET.matches(el))
}

fn parent_following_element<'a>(
    elements: &[ElementRef<'a>],
    label: ElementRef<'a>,
) -> Option<ElementRef<'a>> {
    let parent = label.parent().and_then(ElementRef::wrap)?;
    following(elements, parent).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> HtmlExtractor {
        HtmlExtractor::new(&HtmlConfig::default()).unwrap()
    }

    fn page(body: &str) -> DetailPage {
        DetailPage::parse(
            "https://www.fmv.se/csec/produkt",
            &format!("<html><body><main>{body}</main></body></html>"),
        )
    }

    #[test]
    fn test_table_scan() {
        let page = page(
            "<table>
               <tr><th>Certifierings ID</th><td>CSEC2021003</td></tr>
               <tr><td>Giltighet:</td><td> 2026-05-01 </td></tr>
               <tr><td>Only one cell</td></tr>
               <tr><td>Something else</td><td>ignored</td></tr>
             </table>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::CertificationId), "CSEC2021003");
        assert_eq!(fields.text(CanonicalField::Validity), "2026-05-01");
        assert_eq!(fields.get(CanonicalField::Validity).unwrap().node.value().name(), "td");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_definition_list_scan() {
        let page = page(
            "<dl>
               <dt>Product name</dt><dd>Example IDS</dd>
               <dt>Utvecklare</dt><dd>Example Corp</dd>
               <dt>Unknown</dt><dd>nope</dd>
             </dl>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::ProductName), "Example IDS");
        assert_eq!(fields.text(CanonicalField::Developer), "Example Corp");
    }

    #[test]
    fn test_block_scan_label_value() {
        let page = page(
            "<ul>
               <li><strong>Produktkategori:</strong> Network devices</li>
               <li>Certifieringsdatum: 2021-03-04</li>
               <li>Försäkringspaket:</li>
             </ul>
             <div class='row'><div>Developer:</div><div>Acme AB</div></div>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::ProductCategory), "Network devices");
        assert_eq!(fields.text(CanonicalField::CertificationDate), "2021-03-04");
        assert_eq!(fields.text(CanonicalField::Developer), "Acme AB");
        assert!(!fields.contains(CanonicalField::InsurancePackage));
    }

    #[test]
    fn test_table_beats_block() {
        let page = page(
            "<p>Developer: Block Value</p>
             <table><tr><td>Developer</td><td>Table Value</td></tr></table>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::Developer), "Table Value");
    }

    #[test]
    fn test_definition_list_beats_block() {
        let page = page(
            "<p>Validity: from block</p>
             <dl><dt>Validity</dt><dd>from list</dd></dl>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::Validity), "from list");
    }

    #[test]
    fn test_block_scan_limit() {
        let page = page("<p>filler</p><p>filler</p><p>Developer: Acme AB</p>");
        let fields = extractor().with_block_scan_limit(2).extract(&page);
        assert!(!fields.contains(CanonicalField::Developer));
    }

    #[test]
    fn test_proximity_fallback_for_certification_id() {
        let page = page(
            "<section>
               <h3>Certifikat-ID</h3>
               <span>CSEC2019011</span>
             </section>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::CertificationId), "CSEC2019011");
        assert_eq!(
            fields.node(CanonicalField::CertificationId).unwrap().value().name(),
            "span"
        );
    }

    #[test]
    fn test_proximity_fallback_fills_empty_table_value() {
        let page = page(
            "<table><tr><td>Certifieringsid</td><td> </td></tr></table>
             <h4>CERTIFIKATNUMMER:</h4><p>CSEC2020007</p>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::CertificationId), "CSEC2020007");
    }

    #[test]
    fn test_proximity_skips_label_descendants() {
        let page = page(
            "<div class='label'><span>Certification ID</span></div>
             <div class='value'>CSEC2022001</div>",
        );
        let fields = extractor().extract(&page);
        assert_eq!(fields.text(CanonicalField::CertificationId), "CSEC2022001");
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let page = page("<p>Nothing to see here.</p>");
        let fields = extractor().extract(&page);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_invalid_block_selector() {
        let config = HtmlConfig {
            block_selector: "li[".to_string(),
            ..HtmlConfig::default()
        };
        assert!(matches!(HtmlExtractor::new(&config), Err(CsecError::Config(_))));
    }
}
