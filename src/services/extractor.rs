//! Heuristic article extraction from fetched pages.
//!
//! No DOM parser; the content region is located by scanning for the
//! `<article>`/`<main>`/`<body>` tag pairs and judged by its text density.
//! Good enough for the save-a-URL pipeline, where a miss just means the
//! user saves the raw text instead.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::article::ExtractedContent;

static RE_OG_SITE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+property=["']og:site_name["'][^>]+content=["']([^"']+)["']"#)
        .unwrap()
});
static RE_NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").unwrap());

/// Words per minute assumed for the read-time estimate.
const WORDS_PER_MINUTE: f64 = 200.0;
/// Minimum stripped-text length for a region to count as an article.
const MIN_ARTICLE_TEXT_LEN: usize = 100;

/// Heuristic check that a page carries long-form content: an `<article>`
/// element, or a high text-to-markup ratio with enough text.
pub fn is_article_page(html: &str) -> bool {
    if html.to_ascii_lowercase().contains("<article") {
        return true;
    }
    let text = strip_tags(html);
    if html.is_empty() {
        return false;
    }
    let ratio = text.len() as f64 / html.len() as f64;
    ratio > 0.3 && text.len() > 500
}

/// Extracts the main content of a page. Returns `None` when no region
/// with enough text is found; the caller stores the page as raw text
/// instead.
pub fn extract(html: &str, url: &str) -> Option<ExtractedContent> {
    let content_html = extract_tag_inner(html, "article")
        .or_else(|| extract_tag_inner(html, "main"))
        .or_else(|| extract_tag_inner(html, "body"))?;

    let text_content = collapse_whitespace(&strip_tags(&content_html));
    if text_content.len() < MIN_ARTICLE_TEXT_LEN {
        return None;
    }

    let title = extract_tag_inner(html, "title")
        .map(|t| decode_entities(strip_tags(&t).trim()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| host_of(url).unwrap_or_else(|| "Untitled".to_string()));

    let site_name = RE_OG_SITE_NAME
        .captures(html)
        .map(|caps| decode_entities(&caps[1]))
        .or_else(|| host_of(url));

    let estimated = estimate_read_time(&text_content);

    Some(ExtractedContent {
        title,
        content_html,
        text_content,
        site_name,
        estimated_read_time_minutes: estimated,
    })
}

/// Estimates reading time from word count (~200 words/min, minimum 1).
pub fn estimate_read_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    ((words as f64) / WORDS_PER_MINUTE).ceil().max(1.0) as u32
}

/// Strips HTML tags to plain text.
pub fn strip_tags(html: &str) -> String {
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

/// Decodes the HTML entities that show up in practice: the named core
/// set plus decimal and hex numeric forms. Unknown entities pass through
/// untouched.
pub fn decode_entities(text: &str) -> String {
    let named = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&#39;", "'"),
        ("&nbsp;", " "),
        ("&mdash;", "\u{2014}"),
        ("&ndash;", "\u{2013}"),
        ("&hellip;", "\u{2026}"),
        ("&lsquo;", "\u{2018}"),
        ("&rsquo;", "\u{2019}"),
        ("&ldquo;", "\u{201C}"),
        ("&rdquo;", "\u{201D}"),
    ];

    let mut out = text.to_string();
    out = RE_NUMERIC_ENTITY
        .replace_all(&out, |caps: &regex::Captures| {
            let body = &caps[1];
            let code = if let Some(hex) = body.strip_prefix('x') {
                u32::from_str_radix(hex, 16).ok()
            } else {
                body.parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string();
    for (entity, replacement) in named {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// Content between `<tag ...>` and `</tag>`, or `None` if the pair is
/// absent.
fn extract_tag_inner(html: &str, tag: &str) -> Option<String> {
    // Offsets found here index into `html`, so the fold must be
    // byte-length-preserving; the tag names are ASCII anyway.
    let lower = html.to_ascii_lowercase();
    let open_marker = format!("<{}", tag);
    let close_marker = format!("</{}>", tag);

    let mut search_at = 0;
    while let Some(rel) = lower[search_at..].find(&open_marker) {
        let open_at = search_at + rel;
        // Must be a real tag boundary, not a prefix of a longer name
        let after_name = open_at + open_marker.len();
        match lower.as_bytes().get(after_name) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'/') => {}
            _ => {
                search_at = after_name;
                continue;
            }
        }
        let tag_end = lower[open_at..].find('>')?;
        let content_start = open_at + tag_end + 1;
        let close_at = lower[content_start..].find(&close_marker)?;
        return Some(html[content_start..content_start + close_at].to_string());
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn host_of(url: &str) -> Option<String> {
    let stripped = url
        .trim()
        .strip_prefix("https://")
        .or_else(|| url.trim().strip_prefix("http://"))?;
    let host = stripped
        .trim_start_matches("www.")
        .split('/')
        .next()
        .unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
