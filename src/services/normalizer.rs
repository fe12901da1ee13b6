//! Content normalizer for ReadStash.
//!
//! Converts raw article bodies into safe, structurally consistent HTML for
//! the reading surface. Plain text goes through a prioritized line
//! classifier (headings, lists, quotes, code) plus paragraph and inline
//! passes; supplied HTML only gets script/style blocks stripped, since it
//! comes from our own extraction pipeline rather than arbitrary uploads.
//!
//! Normalization never fails: unrecognized structure degrades to plain
//! paragraphs. It is not idempotent — callers normalize once per raw
//! source and must not re-run it on its own output.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
// The regex crate has no lookbehind; capture the preceding boundary and
// re-emit it so URLs inside href="..." attributes are left alone. URLs
// already serving as anchor text are skipped in the replacement closure.
static RE_BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(^|[\s>])(https?://[^\s<"']+)"#).unwrap());
static RE_SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static RE_STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static RE_HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static RE_ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+\.|[a-z]\.)\s+(.+)$").unwrap());

/// Text longer than this with no paragraph breaks gets sentence-grouped.
const UNSTRUCTURED_TEXT_THRESHOLD: usize = 300;
/// Sentences per synthesized paragraph.
const SENTENCES_PER_PARAGRAPH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// One intermediate block produced by line classification. `Text` blocks
/// are paragraph candidates still awaiting the wrapping pass.
#[derive(Debug)]
enum Block {
    Html(String),
    Text(String),
}

/// Converts plain article text into styled HTML.
///
/// Blank input (after trimming) yields an empty string. Line endings are
/// normalized first; every non-blank line is then classified in priority
/// order as heading, list item, quote, or code, and anything unmatched is
/// paragraph-wrapped. Inline markdown-ish formatting (bold, italic, code,
/// links, bare URLs) is substituted over the final result.
pub fn normalize_plain_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let had_paragraph_breaks = contains_blank_line(&text);

    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<Block> = Vec::new();
    let mut open_list: Option<(ListKind, Vec<String>)> = None;
    let mut paragraph: Vec<String> = Vec::new();
    let mut code_fence: Option<Vec<String>> = None;
    let mut emitted_structure = false;

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if let Some(buf) = code_fence.as_mut() {
            if line.starts_with("```") {
                let body = buf.join("\n");
                blocks.push(Block::Html(code_block(&body)));
                emitted_structure = true;
                code_fence = None;
            } else {
                buf.push((*raw).to_string());
            }
            continue;
        }

        if line.is_empty() {
            close_list(&mut open_list, &mut blocks);
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if line.starts_with("```") {
            close_list(&mut open_list, &mut blocks);
            flush_paragraph(&mut paragraph, &mut blocks);
            code_fence = Some(Vec::new());
            continue;
        }

        if let Some((level, heading)) = classify_heading(line, is_standalone(idx, &lines)) {
            close_list(&mut open_list, &mut blocks);
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Html(format!(
                "<h{level}>{heading}</h{level}>",
                level = level,
                heading = heading
            )));
            emitted_structure = true;
            continue;
        }

        if let Some((kind, item)) = classify_list_item(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            match open_list.as_mut() {
                Some((open_kind, items)) if *open_kind == kind => items.push(item),
                Some(_) => {
                    // A change of list type closes the prior list.
                    close_list(&mut open_list, &mut blocks);
                    open_list = Some((kind, vec![item]));
                }
                None => open_list = Some((kind, vec![item])),
            }
            emitted_structure = true;
            continue;
        }

        close_list(&mut open_list, &mut blocks);

        if let Some(quote) = quoted_line(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Html(format!("<blockquote>{}</blockquote>", quote)));
            emitted_structure = true;
            continue;
        }

        if let Some(code) = backtick_wrapped_line(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Html(code_block(code)));
            emitted_structure = true;
            continue;
        }

        paragraph.push(line.to_string());
    }

    // An unterminated fence still renders as code rather than vanishing
    if let Some(buf) = code_fence.take() {
        blocks.push(Block::Html(code_block(&buf.join("\n"))));
        emitted_structure = true;
    }
    close_list(&mut open_list, &mut blocks);
    flush_paragraph(&mut paragraph, &mut blocks);

    // Long unstructured text reads as a wall; synthesize paragraph breaks
    // by grouping sentences.
    if !emitted_structure
        && !had_paragraph_breaks
        && text.chars().count() > UNSTRUCTURED_TEXT_THRESHOLD
    {
        let flat = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(t) => Some(t.as_str()),
                Block::Html(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
            .replace('\n', " ");
        blocks = group_sentences(&flat)
            .into_iter()
            .map(Block::Text)
            .collect();
    }

    let html = blocks
        .into_iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n");

    apply_inline_formatting(&html)
}

/// Strips `<script>` and `<style>` blocks from supplied HTML,
/// case-insensitively and non-greedily. No attribute-level sanitization
/// is performed.
pub fn sanitize_html(html: &str) -> String {
    let without_scripts = RE_SCRIPT_BLOCK.replace_all(html, "");
    RE_STYLE_BLOCK.replace_all(&without_scripts, "").to_string()
}

/// Lightweight paragraph wrapper used by the reading surface.
///
/// Bodies that already contain markup pass through unchanged; plain text
/// is split on blank lines into `<p>` blocks with single newlines kept as
/// `<br>`.
pub fn wrap_plain_text(body: &str) -> String {
    if RE_HTML_TAG.is_match(body) {
        return body.to_string();
    }
    let body = body.replace("\r\n", "\n").replace('\r', "\n");
    body.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| format!("<p>{}</p>", chunk.replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn contains_blank_line(text: &str) -> bool {
    let mut seen_break = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            seen_break = true;
        } else if seen_break {
            return true;
        }
    }
    false
}

fn close_list(open_list: &mut Option<(ListKind, Vec<String>)>, blocks: &mut Vec<Block>) {
    if let Some((kind, items)) = open_list.take() {
        let mut out = String::new();
        out.push('<');
        out.push_str(kind.tag());
        out.push('>');
        for item in items {
            out.push_str("<li>");
            out.push_str(&item);
            out.push_str("</li>");
        }
        out.push_str("</");
        out.push_str(kind.tag());
        out.push('>');
        blocks.push(Block::Html(out));
    }
}

fn flush_paragraph(paragraph: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Text(paragraph.join("\n")));
        paragraph.clear();
    }
}

fn render_block(block: Block) -> String {
    match block {
        Block::Html(html) => html,
        Block::Text(text) => {
            if text.starts_with('<') {
                text
            } else {
                format!("<p>{}</p>", text.replace('\n', "<br>"))
            }
        }
    }
}

/// Heading classification, in priority order: all-caps short line (h1),
/// short capitalized line ending in a colon (h2), markdown `#` markers
/// (h1–h3), longer capitalized line ending in a colon (h3), and a short
/// capitalized line with no terminal punctuation (h3) — the last only
/// when the line stands alone between blank lines, since ordinary short
/// sentences match it otherwise.
fn classify_heading(line: &str, standalone: bool) -> Option<(u8, String)> {
    if is_all_caps_heading(line) {
        return Some((1, line.to_string()));
    }

    if let Some(stripped) = line.strip_suffix(':') {
        let candidate = stripped.trim_end();
        if starts_uppercase(candidate) && candidate.chars().count() <= 40 {
            return Some((2, candidate.to_string()));
        }
    }

    if let Some(rest) = line.strip_prefix("### ") {
        return Some((3, rest.trim().trim_end_matches(':').to_string()));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Some((2, rest.trim().trim_end_matches(':').to_string()));
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Some((1, rest.trim().trim_end_matches(':').to_string()));
    }

    if let Some(stripped) = line.strip_suffix(':') {
        let candidate = stripped.trim_end();
        if starts_uppercase(candidate) && candidate.chars().count() <= 80 {
            return Some((3, candidate.to_string()));
        }
    }

    if standalone
        && starts_uppercase(line)
        && line.chars().count() <= 48
        && line.split_whitespace().count() <= 8
        && !ends_with_punctuation(line)
    {
        return Some((3, line.to_string()));
    }

    None
}

fn is_all_caps_heading(line: &str) -> bool {
    line.chars().count() <= 50
        && line.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
        && line.chars().any(|c| c.is_alphabetic())
        && !line.chars().any(|c| c.is_lowercase())
}

fn starts_uppercase(line: &str) -> bool {
    line.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn ends_with_punctuation(line: &str) -> bool {
    line.chars()
        .last()
        .map(|c| matches!(c, '.' | '!' | '?' | ',' | ';' | ':'))
        .unwrap_or(false)
}

fn is_standalone(idx: usize, lines: &[&str]) -> bool {
    let before_blank = idx == 0 || lines[idx - 1].trim().is_empty();
    let after_blank = idx + 1 >= lines.len() || lines[idx + 1].trim().is_empty();
    before_blank && after_blank
}

fn classify_list_item(line: &str) -> Option<(ListKind, String)> {
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = line.strip_prefix(marker) {
            let item = rest.trim();
            if !item.is_empty() {
                return Some((ListKind::Unordered, item.to_string()));
            }
        }
    }
    if let Some(caps) = RE_ORDERED_ITEM.captures(line) {
        return Some((ListKind::Ordered, caps[1].trim().to_string()));
    }
    None
}

fn quoted_line(line: &str) -> Option<&str> {
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        let inner = &line[1..line.len() - 1];
        if !inner.contains('"') {
            return Some(inner);
        }
    }
    None
}

fn backtick_wrapped_line(line: &str) -> Option<&str> {
    if line.len() > 2 && line.starts_with('`') && line.ends_with('`') && !line.starts_with("```") {
        let inner = &line[1..line.len() - 1];
        if !inner.contains('`') {
            return Some(inner);
        }
    }
    None
}

fn code_block(body: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(body))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Splits flat prose into sentence groups so long extractions do not
/// render as a single wall of text.
fn group_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim().to_string();
            if !trimmed.is_empty() {
                sentences.push(trimmed);
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| group.join(" "))
        .collect()
}

fn apply_inline_formatting(html: &str) -> String {
    let html = RE_BOLD.replace_all(html, "<strong>$1</strong>");
    let html = RE_ITALIC.replace_all(&html, "<em>$1</em>");
    let html = RE_INLINE_CODE.replace_all(&html, "<code>$1</code>");
    let html = RE_MARKDOWN_LINK
        .replace_all(&html, r#"<a href="$2">$1</a>"#)
        .into_owned();
    RE_BARE_URL
        .replace_all(&html, |caps: &regex::Captures| {
            // A URL directly before </a> is already the text of a link
            // produced by the markdown pass; wrapping it again would
            // nest anchors.
            let end = caps.get(0).map_or(0, |m| m.end());
            if html[end..].starts_with("</a>") {
                caps[0].to_string()
            } else {
                let boundary = &caps[1];
                let url = &caps[2];
                format!(r#"{boundary}<a href="{url}">{url}</a>"#)
            }
        })
        .to_string()
}
