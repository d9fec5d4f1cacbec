//! Locates the identification block of a certification report.

use tracing::trace;

use super::rules::patterns::{SECTION_END, SECTION_START};

/// Slice of `text` holding section 2 ("Identification").
///
/// Starts at the first line beginning with `2 Identification` and ends
/// before the next line beginning with `3.` or `3 `, or `span_chars`
/// characters past the heading when no such line follows. Without a
/// heading the whole text is returned.
pub fn identification_section(text: &str, span_chars: usize) -> &str {
    let Some(heading) = SECTION_START.find(text) else {
        trace!("no identification heading, scanning whole text");
        return text;
    };

    let rest = &text[heading.end()..];
    let end = match SECTION_END.find(rest) {
        Some(m) => heading.end() + m.start(),
        None => {
            heading.end()
                + rest
                    .char_indices()
                    .nth(span_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len())
        }
    };
    &text[heading.start()..end]
}
