//! Line-oriented recovery of a labelled value from report text.

use tracing::{debug, trace};

use super::rules::patterns::{LABEL_START, LabelPatterns};
use super::rules::is_valid_value;
use crate::text::{normalize, strip_soft_hyphens};

const INLINE_TRIM: &[char] = &[' ', '.', ';', ':', '-'];
const BLOCK_TRIM: &[char] = &[' ', '.', ';', '-'];

/// Find the value of the target label in `section`.
///
/// The inline form (`ITSEF: Combitech AB`) is tried on every line first.
/// Then a line holding only the label collects up to `follow_lines`
/// following lines, stopping at a blank line or at a line holding only
/// another identification label. Returns an empty string when nothing
/// passes the validity filter.
pub fn find_value(section: &str, patterns: &LabelPatterns, follow_lines: usize) -> String {
    let cleaned = strip_soft_hyphens(section);
    let lines: Vec<String> = cleaned.lines().map(normalize).collect();

    if let Some(value) = inline_value(&lines, patterns) {
        debug!("text mode: inline value {:?}", value);
        return value;
    }
    if let Some(value) = block_value(&lines, patterns, follow_lines) {
        debug!("text mode: block value {:?}", value);
        return value;
    }
    String::new()
}

fn inline_value(lines: &[String], patterns: &LabelPatterns) -> Option<String> {
    lines.iter().find_map(|line| {
        let caps = patterns.inline.captures(line)?;
        let value = caps[1].trim_matches(INLINE_TRIM);
        trace!("inline candidate {:?}", value);
        is_valid_value(value).then(|| value.to_string())
    })
}

fn block_value(lines: &[String], patterns: &LabelPatterns, follow_lines: usize) -> Option<String> {
    for (i, line) in lines.iter().enumerate() {
        if !patterns.bare.is_match(line) {
            continue;
        }

        let following: Vec<&str> = lines[i + 1..]
            .iter()
            .take(follow_lines)
            .map(|l| l.trim())
            .take_while(|l| !l.is_empty() && !LABEL_START.is_match(l))
            .collect();
        trace!("label on line {}, {} following line(s)", i, following.len());

        if let Some(value) = best_suffix(&following) {
            return Some(value);
        }
    }
    None
}

/// The joined lines, or when that fails validity, the longest valid suffix.
fn best_suffix(lines: &[&str]) -> Option<String> {
    let joined = lines.join(" ");
    let value = joined.trim_matches(BLOCK_TRIM);
    if is_valid_value(value) {
        return Some(value.to_string());
    }
    if lines.len() < 2 {
        return None;
    }
    (1..lines.len()).find_map(|k| {
        let joined = lines[k..].join(" ");
        let value = joined.trim_matches(BLOCK_TRIM);
        is_valid_value(value).then(|| value.to_string())
    })
}
