//! Label alias table mapping Swedish and English spellings to canonical fields.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::record::CanonicalField;
use crate::text::fold_label;

/// Folded label spellings and the field each one names.
pub const ALIASES: &[(&str, CanonicalField)] = &[
    // Certification ID
    ("certification id", CanonicalField::CertificationId),
    ("certifierings id", CanonicalField::CertificationId),
    ("certifikat id", CanonicalField::CertificationId),
    ("certifikat-id", CanonicalField::CertificationId),
    ("certifikatnummer", CanonicalField::CertificationId),
    ("certifieringsid", CanonicalField::CertificationId),
    ("certifierings-id", CanonicalField::CertificationId),
    ("id", CanonicalField::CertificationId),
    // Validity
    ("validity", CanonicalField::Validity),
    ("giltighet", CanonicalField::Validity),
    // Product name
    ("product name", CanonicalField::ProductName),
    ("produktnamn", CanonicalField::ProductName),
    ("product", CanonicalField::ProductName),
    ("produkt", CanonicalField::ProductName),
    // Product category
    ("product category", CanonicalField::ProductCategory),
    ("produktkategori", CanonicalField::ProductCategory),
    // Insurance package
    ("insurance package", CanonicalField::InsurancePackage),
    ("försäkringspaket", CanonicalField::InsurancePackage),
    // Certification date
    ("certification date", CanonicalField::CertificationDate),
    ("certifieringsdatum", CanonicalField::CertificationDate),
    ("date of certification", CanonicalField::CertificationDate),
    // Developer
    ("developer", CanonicalField::Developer),
    ("utvecklare", CanonicalField::Developer),
    // The report cell carries the PDF link.
    ("certification report", CanonicalField::CertificationReportUrl),
    ("certifieringsrapport", CanonicalField::CertificationReportUrl),
];

lazy_static! {
    static ref ALIAS_TABLE: HashMap<&'static str, CanonicalField> =
        ALIASES.iter().copied().collect();
}

/// Map a raw label to its canonical field.
///
/// Labels are normalized, lowercased and stripped of trailing colons before
/// the lookup. Unknown labels yield `None`.
pub fn canonicalize(raw: &str) -> Option<CanonicalField> {
    let key = fold_label(raw);
    if key.is_empty() {
        return None;
    }
    ALIAS_TABLE.get(key.as_str()).copied()
}
