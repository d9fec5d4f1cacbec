//! Regex patterns for certification report identification blocks.

use lazy_static::lazy_static;
use regex::Regex;

/// Labels that open a row of the identification table.
pub const IDENT_LABELS: &[&str] = &[
    "Certification Identification",
    "Certification ID",
    "Name and version of the certified IT product",
    "Security Target Identification",
    "EAL",
    "Sponsor",
    "Developer",
    "ITSEF",
    "Common Criteria version",
    "CEM version",
    "QMS version",
    "Scheme Notes",
    "Recognition Scope",
    "Certification date",
];

lazy_static! {
    // Common Criteria assurance classes and levels: EAL4+, ALC_FLR.1, AVA
    pub static ref CC_TOKENS: Regex = Regex::new(
        r"(?i)\b(?:EAL|ALC|ADV|ATE|AVA|ASE|ACO|AGD)(?:[^A-Za-z]|$)"
    ).unwrap();

    // Text from neighbouring rows that leaks into a captured value
    pub static ref EXCLUDE_NEARBY: Vec<Regex> = [
        r"(?i)\bdocument version\b",
        r"(?i)\bDeveloper\b",
        r"(?i)\bSponsor\b",
        r"(?i)\b3\.1\s*release\s*5\b",
        r"(?i)\bCommon\s+Criteria\s+version\b",
        r"(?i)\bCEM\s+version\b",
        r"(?i)\bQMS\s+version\b",
        r"(?i)\bSecurity\s+Target\b",
        r"(?i)\bTarget\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // A line holding nothing but another identification label
    pub static ref LABEL_START: Regex = Regex::new(&format!(
        r"(?i)^\s*({})\s*:?\s*$",
        IDENT_LABELS.iter().map(|l| regex::escape(l)).collect::<Vec<_>>().join("|")
    )).unwrap();

    // Section boundaries
    pub static ref SECTION_START: Regex = Regex::new(
        r"(?im)^[ \t]*2\s+Identification\b"
    ).unwrap();

    pub static ref SECTION_END: Regex = Regex::new(
        r"(?m)^\s*3[.\s]"
    ).unwrap();
}

/// Patterns built for one target label (e.g. `ITSEF`).
#[derive(Debug, Clone)]
pub struct LabelPatterns {
    /// Label followed by a value on the same line.
    pub inline: Regex,
    /// A line holding only the label.
    pub bare: Regex,
    /// The label as a whole word anywhere in a line.
    pub word: Regex,
}

impl LabelPatterns {
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        let label = regex::escape(label.trim());
        Ok(Self {
            inline: Regex::new(&format!(r"(?i)^\s*{}\b[:\-\s]*(.+)$", label))?,
            bare: Regex::new(&format!(r"(?i)^\s*{}\s*[:\-]?\s*$", label))?,
            word: Regex::new(&format!(r"(?i)\b{}\b", label))?,
        })
    }
}
