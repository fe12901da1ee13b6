//! Highlight-span operations over serialized documents.
//!
//! The embedded reading surface performs highlighting through live DOM
//! ranges; this module implements the same span grammar directly on the
//! serialized HTML for everything that runs outside the surface: the RPC
//! methods, the highlight listing, and read-aloud preparation. The rules
//! are identical — spans never nest, removal unwraps rather than deletes,
//! and a selection touching existing highlight markup is rejected
//! outright.

use crate::types::errors::HighlightError;

/// Opening markup of a highlight span. Matches what the surface script
/// produces, so documents are interchangeable between the two paths.
pub const HIGHLIGHT_OPEN: &str = "<mark data-highlight=\"1\">";
/// Closing markup of a highlight span.
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// A byte range into a serialized document, denoting visible content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// Elements that never carry a closing tag; they do not affect balance.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "wbr"];

/// Locates `quote` within the document's visible text (the characters
/// outside tag markup) and returns the corresponding byte range in the
/// serialized form. Returns `None` when the quote does not occur.
pub fn find_text(html: &str, quote: &str) -> Option<TextRange> {
    if quote.is_empty() {
        return None;
    }

    // Flatten visible text while remembering, per visible byte, where it
    // sits in the serialized document.
    let mut visible = String::with_capacity(html.len());
    let mut offsets: Vec<usize> = Vec::with_capacity(html.len());
    let mut in_tag = false;
    for (idx, ch) in html.char_indices() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                for j in 0..encoded.len() {
                    offsets.push(idx + j);
                }
                visible.push(ch);
            }
            _ => {}
        }
    }

    let found = visible.find(quote)?;
    let last_byte = found + quote.len() - 1;
    Some(TextRange {
        start: offsets[found],
        // One past the final visible byte, before any following markup.
        end: offsets[last_byte] + 1,
    })
}

/// Wraps the given range in a highlight span.
///
/// The range must denote visible content on character boundaries, must
/// not touch existing highlight markup in any way (inside one, containing
/// one, or partially overlapping one), and must not split an element —
/// every tag opened inside the range has to close inside it.
pub fn apply(html: &str, range: TextRange) -> Result<String, HighlightError> {
    if range.start >= range.end || range.end > html.len() {
        return Err(HighlightError::InvalidRange(format!(
            "{}..{} out of bounds",
            range.start, range.end
        )));
    }
    if !html.is_char_boundary(range.start) || !html.is_char_boundary(range.end) {
        return Err(HighlightError::InvalidRange(
            "range not on character boundaries".to_string(),
        ));
    }
    if inside_tag(&html[..range.start]) || inside_tag(&html[..range.end]) {
        return Err(HighlightError::InvalidRange(
            "range endpoint inside tag markup".to_string(),
        ));
    }

    let selected = &html[range.start..range.end];
    if selected.contains(HIGHLIGHT_OPEN) || selected.contains(HIGHLIGHT_CLOSE) {
        return Err(HighlightError::OverlapsExisting);
    }
    if inside_highlight(&html[..range.start]) {
        return Err(HighlightError::OverlapsExisting);
    }
    if !tags_balanced(selected) {
        return Err(HighlightError::SplitsMarkup);
    }

    let mut out = String::with_capacity(html.len() + HIGHLIGHT_OPEN.len() + HIGHLIGHT_CLOSE.len());
    out.push_str(&html[..range.start]);
    out.push_str(HIGHLIGHT_OPEN);
    out.push_str(selected);
    out.push_str(HIGHLIGHT_CLOSE);
    out.push_str(&html[range.end..]);
    Ok(out)
}

/// Convenience for wire callers: locate a quote and highlight it.
pub fn highlight_quote(html: &str, quote: &str) -> Result<String, HighlightError> {
    let range = find_text(html, quote)
        .ok_or_else(|| HighlightError::QuoteNotFound(quote.to_string()))?;
    apply(html, range)
}

/// Removes the `index`-th highlight span (zero-based, document order),
/// unwrapping it so its content survives. Applying a highlight and then
/// removing it restores the document byte for byte.
pub fn remove_at(html: &str, index: usize) -> Result<String, HighlightError> {
    let spans = span_positions(html);
    let (open_at, close_at) = spans
        .get(index)
        .copied()
        .ok_or(HighlightError::NotFound(index))?;

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..open_at]);
    out.push_str(&html[open_at + HIGHLIGHT_OPEN.len()..close_at]);
    out.push_str(&html[close_at + HIGHLIGHT_CLOSE.len()..]);
    Ok(out)
}

/// Number of highlight spans in the document.
pub fn count(html: &str) -> usize {
    span_positions(html).len()
}

/// Plain text of each highlight span, in document order.
pub fn list(html: &str) -> Vec<String> {
    span_positions(html)
        .into_iter()
        .map(|(open_at, close_at)| {
            let inner = &html[open_at + HIGHLIGHT_OPEN.len()..close_at];
            strip_tags(inner)
        })
        .collect()
}

/// Byte positions of every highlight span as (open_tag_start,
/// close_tag_start) pairs. Close tags are matched by scanning forward
/// from each open; spans never nest.
fn span_positions(html: &str) -> Vec<(usize, usize)> {
    let mut positions = Vec::new();
    let mut cursor = 0;
    while let Some(found) = html[cursor..].find(HIGHLIGHT_OPEN) {
        let open_at = cursor + found;
        let search_from = open_at + HIGHLIGHT_OPEN.len();
        match html[search_from..].find(HIGHLIGHT_CLOSE) {
            Some(rel) => {
                let close_at = search_from + rel;
                positions.push((open_at, close_at));
                cursor = close_at + HIGHLIGHT_CLOSE.len();
            }
            None => break,
        }
    }
    positions
}

/// Whether the prefix ends inside tag markup (an unterminated `<`).
fn inside_tag(prefix: &str) -> bool {
    match (prefix.rfind('<'), prefix.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Whether the prefix leaves an unclosed highlight span open.
fn inside_highlight(prefix: &str) -> bool {
    let opens = prefix.matches(HIGHLIGHT_OPEN).count();
    let closes = prefix.matches(HIGHLIGHT_CLOSE).count();
    opens > closes
}

/// Checks that every element opened within the fragment also closes
/// within it, and nothing closes that was opened outside.
fn tags_balanced(fragment: &str) -> bool {
    let mut stack: Vec<String> = Vec::new();
    let mut rest = fragment;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(end) = after.find('>') else {
            return false;
        };
        let tag_body = &after[..end];
        rest = &after[end + 1..];

        if tag_body.starts_with('!') || tag_body.starts_with('?') {
            continue;
        }
        if let Some(name_part) = tag_body.strip_prefix('/') {
            let name = tag_name(name_part);
            match stack.pop() {
                Some(top) if top == name => {}
                _ => return false,
            }
        } else {
            let name = tag_name(tag_body);
            if tag_body.ends_with('/') || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }
            stack.push(name);
        }
    }
    stack.is_empty()
}

fn tag_name(tag_body: &str) -> String {
    tag_body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Strips tags to plain text; same byte-scan the extractor uses.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}
