//! Text normalization shared by the HTML and PDF extractors.

/// Soft hyphen, emitted by PDF producers at hyphenation points.
const SOFT_HYPHEN: char = '\u{00ad}';

/// Collapse every whitespace run (non-breaking spaces included) into a single
/// ASCII space and trim both ends.
pub fn normalize(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{00a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`normalize`] for optional input; `None` yields an empty string.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

/// Remove soft hyphens.
pub fn strip_soft_hyphens(s: &str) -> String {
    s.replace(SOFT_HYPHEN, "")
}

/// Normalize, lowercase and drop trailing colons (and any space left before them).
///
/// This is the key form used by the label alias table and by the
/// label-proximity lookup.
pub fn fold_label(s: &str) -> String {
    normalize(s)
        .to_lowercase()
        .trim_end_matches(':')
        .trim_end()
        .to_string()
}

/// Split `text` at the first colon into a trimmed `(label, value)` pair.
pub fn split_label_value(text: &str) -> Option<(&str, &str)> {
    let (label, value) = text.split_once(':')?;
    Some((label.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Certification\u{00a0}\u{00a0}ID \n\t"), "Certification ID");
        assert_eq!(normalize("a\r\nb"), "a b");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \u{00a0} "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "plain",
            "  lots   of\tspace \n",
            "Certifierings\u{00a0}ID:\u{2003}CSEC2021003",
            "\u{00a0}leading and trailing\u{00a0}",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_none_is_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" x ")), "x");
    }

    #[test]
    fn test_fold_label() {
        assert_eq!(fold_label("  Giltighet: "), "giltighet");
        assert_eq!(fold_label("CERTIFIKAT-ID::"), "certifikat-id");
        assert_eq!(fold_label("Produktnamn :"), "produktnamn");
        assert_eq!(fold_label("Försäkringspaket"), "försäkringspaket");
    }

    #[test]
    fn test_strip_soft_hyphens() {
        assert_eq!(strip_soft_hyphens("Evalu\u{00ad}ation"), "Evaluation");
    }

    #[test]
    fn test_split_label_value() {
        assert_eq!(
            split_label_value("Validity: 2026-01-01 12:00"),
            Some(("Validity", "2026-01-01 12:00"))
        );
        assert_eq!(split_label_value("no colon here"), None);
    }
}
