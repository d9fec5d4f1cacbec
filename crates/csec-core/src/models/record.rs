//! Certification record models.

use std::collections::BTreeMap;
use std::fmt;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Literal written to the Certification ID column when no ID was found.
pub const MISSING_CERTIFICATION_ID: &str = "NA";

/// The eleven output columns of a certification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    ListingName,
    CertificationId,
    Validity,
    ProductName,
    ProductCategory,
    InsurancePackage,
    CertificationDate,
    Developer,
    Itsef,
    ProductUrl,
    CertificationReportUrl,
}

impl CanonicalField {
    /// All fields, in output-column order.
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::ListingName,
        CanonicalField::CertificationId,
        CanonicalField::Validity,
        CanonicalField::ProductName,
        CanonicalField::ProductCategory,
        CanonicalField::InsurancePackage,
        CanonicalField::CertificationDate,
        CanonicalField::Developer,
        CanonicalField::Itsef,
        CanonicalField::ProductUrl,
        CanonicalField::CertificationReportUrl,
    ];

    /// Column header for this field.
    pub fn header(&self) -> &'static str {
        match self {
            CanonicalField::ListingName => "Listing name",
            CanonicalField::CertificationId => "Certification ID",
            CanonicalField::Validity => "Validity",
            CanonicalField::ProductName => "Product name",
            CanonicalField::ProductCategory => "Product category",
            CanonicalField::InsurancePackage => "Insurance package",
            CanonicalField::CertificationDate => "Certification date",
            CanonicalField::Developer => "Developer",
            CanonicalField::Itsef => "ITSEF",
            CanonicalField::ProductUrl => "Product URL",
            CanonicalField::CertificationReportUrl => "Certification report URL",
        }
    }

    /// Column headers in output order.
    pub fn headers() -> [&'static str; 11] {
        Self::ALL.map(|f| f.header())
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A value lifted out of a detail page, with the element it came from.
///
/// The node handle borrows the parsed page and is only used to look for a
/// nested certification report link.
#[derive(Debug, Clone)]
pub struct ExtractedValue<'a> {
    /// Normalized text.
    pub text: String,
    /// Source element.
    pub node: ElementRef<'a>,
}

impl<'a> ExtractedValue<'a> {
    pub fn new(text: impl Into<String>, node: ElementRef<'a>) -> Self {
        Self {
            text: text.into(),
            node,
        }
    }
}

/// Fields found on one detail page. The first value recorded for a field wins.
#[derive(Debug, Clone, Default)]
pub struct FieldMap<'a> {
    values: BTreeMap<CanonicalField, ExtractedValue<'a>>,
}

impl<'a> FieldMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` unless the field already has one. Returns whether it was stored.
    pub fn insert_if_absent(&mut self, field: CanonicalField, value: ExtractedValue<'a>) -> bool {
        if self.values.contains_key(&field) {
            return false;
        }
        self.values.insert(field, value);
        true
    }

    /// Record `value` if the field is unset or holds an empty string.
    pub fn fill_if_empty(&mut self, field: CanonicalField, value: ExtractedValue<'a>) -> bool {
        match self.values.get(&field) {
            Some(existing) if !existing.text.is_empty() => false,
            _ => {
                self.values.insert(field, value);
                true
            }
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&ExtractedValue<'a>> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field)
    }

    /// Text of `field`, or an empty string.
    pub fn text(&self, field: CanonicalField) -> &str {
        self.values.get(&field).map(|v| v.text.as_str()).unwrap_or("")
    }

    /// Source element of `field`, if any.
    pub fn node(&self, field: CanonicalField) -> Option<ElementRef<'a>> {
        self.values.get(&field).map(|v| v.node)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalField, &ExtractedValue<'a>)> {
        self.values.iter()
    }
}

/// One finished output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Listing name")]
    pub listing_name: String,
    #[serde(rename = "Certification ID")]
    pub certification_id: String,
    #[serde(rename = "Validity")]
    pub validity: String,
    #[serde(rename = "Product name")]
    pub product_name: String,
    #[serde(rename = "Product category")]
    pub product_category: String,
    #[serde(rename = "Insurance package")]
    pub insurance_package: String,
    #[serde(rename = "Certification date")]
    pub certification_date: String,
    #[serde(rename = "Developer")]
    pub developer: String,
    #[serde(rename = "ITSEF")]
    pub itsef: String,
    #[serde(rename = "Product URL")]
    pub product_url: String,
    #[serde(rename = "Certification report URL")]
    pub certification_report_url: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            listing_name: String::new(),
            certification_id: MISSING_CERTIFICATION_ID.to_string(),
            validity: String::new(),
            product_name: String::new(),
            product_category: String::new(),
            insurance_package: String::new(),
            certification_date: String::new(),
            developer: String::new(),
            itsef: String::new(),
            product_url: String::new(),
            certification_report_url: String::new(),
        }
    }
}

impl ProductRecord {
    /// Build a record from the HTML fields of a detail page.
    ///
    /// `Listing name` and `Product URL` come from the crawl, `ITSEF` and
    /// `Certification report URL` from the PDF step; everything else is
    /// taken from `fields`.
    pub fn from_fields(
        listing_name: &str,
        product_url: &str,
        fields: &FieldMap<'_>,
        itsef: &str,
        report_url: &str,
    ) -> Self {
        let certification_id = match fields.text(CanonicalField::CertificationId) {
            "" => MISSING_CERTIFICATION_ID.to_string(),
            id => id.to_string(),
        };

        Self {
            listing_name: listing_name.to_string(),
            certification_id,
            validity: fields.text(CanonicalField::Validity).to_string(),
            product_name: fields.text(CanonicalField::ProductName).to_string(),
            product_category: fields.text(CanonicalField::ProductCategory).to_string(),
            insurance_package: fields.text(CanonicalField::InsurancePackage).to_string(),
            certification_date: fields.text(CanonicalField::CertificationDate).to_string(),
            developer: fields.text(CanonicalField::Developer).to_string(),
            itsef: itsef.to_string(),
            product_url: product_url.to_string(),
            certification_report_url: report_url.to_string(),
        }
    }

    /// Value of a column.
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::ListingName => &self.listing_name,
            CanonicalField::CertificationId => &self.certification_id,
            CanonicalField::Validity => &self.validity,
            CanonicalField::ProductName => &self.product_name,
            CanonicalField::ProductCategory => &self.product_category,
            CanonicalField::InsurancePackage => &self.insurance_package,
            CanonicalField::CertificationDate => &self.certification_date,
            CanonicalField::Developer => &self.developer,
            CanonicalField::Itsef => &self.itsef,
            CanonicalField::ProductUrl => &self.product_url,
            CanonicalField::CertificationReportUrl => &self.certification_report_url,
        }
    }

    /// Row values in output-column order.
    pub fn to_row(&self) -> [&str; 11] {
        CanonicalField::ALL.map(|f| self.get(f))
    }

    /// Number of columns with a non-empty value (a "NA" ID does not count).
    pub fn filled_count(&self) -> usize {
        CanonicalField::ALL
            .iter()
            .filter(|f| match **f {
                CanonicalField::CertificationId => self.certification_id != MISSING_CERTIFICATION_ID,
                other => !self.get(other).is_empty(),
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    #[test]
    fn test_exactly_eleven_fields() {
        assert_eq!(CanonicalField::ALL.len(), 11);
        assert_eq!(
            CanonicalField::headers(),
            [
                "Listing name",
                "Certification ID",
                "Validity",
                "Product name",
                "Product category",
                "Insurance package",
                "Certification date",
                "Developer",
                "ITSEF",
                "Product URL",
                "Certification report URL",
            ]
        );
    }

    #[test]
    fn test_field_map_first_writer_wins() {
        let html = Html::parse_fragment("<p>a</p><p>b</p>");
        let sel = Selector::parse("p").unwrap();
        let nodes: Vec<_> = html.select(&sel).collect();

        let mut map = FieldMap::new();
        assert!(map.insert_if_absent(CanonicalField::Validity, ExtractedValue::new("first", nodes[0])));
        assert!(!map.insert_if_absent(CanonicalField::Validity, ExtractedValue::new("second", nodes[1])));

        assert_eq!(map.text(CanonicalField::Validity), "first");
        assert_eq!(map.node(CanonicalField::Validity), Some(nodes[0]));
        assert_eq!(map.text(CanonicalField::Developer), "");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_record_defaults() {
        let record = ProductRecord::from_fields("Listing", "https://x/p", &FieldMap::new(), "", "");
        assert_eq!(record.certification_id, "NA");
        assert_eq!(record.validity, "");
        assert_eq!(record.listing_name, "Listing");
        assert_eq!(record.filled_count(), 2);
        assert_eq!(ProductRecord::default().certification_id, "NA");
    }

    #[test]
    fn test_record_serializes_with_headers() {
        let record = ProductRecord {
            itsef: "Combitech AB".to_string(),
            ..ProductRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ITSEF"], "Combitech AB");
        assert_eq!(json["Certification ID"], "NA");
        assert_eq!(record.to_row()[8], "Combitech AB");
    }
}
