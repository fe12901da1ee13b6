//! Unit tests for heuristic article extraction: region selection, title
//! and site-name fallbacks, tag stripping, and entity decoding.

use readstash::services::extractor::{
    decode_entities, estimate_read_time, extract, is_article_page, strip_tags,
};

fn filler(sentences: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .repeat(sentences)
        .trim_end()
        .to_string()
}

// === extract: region selection ===

#[test]
fn test_extract_prefers_article_over_main() {
    let html = format!(
        "<html><head><title>Picked</title></head><body>\
         <main>From the main element. {}</main>\
         <article>From the article element. {}</article>\
         </body></html>",
        filler(3),
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains("From the article element."));
    assert!(!extracted.content_html.contains("From the main element."));
}

#[test]
fn test_extract_falls_back_to_main() {
    let html = format!(
        "<html><body>outside text <main>From the main element. {}</main></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains("From the main element."));
    assert!(!extracted.content_html.contains("outside text"));
}

#[test]
fn test_extract_falls_back_to_body() {
    let html = format!("<html><body><p>{}</p></body></html>", filler(3));

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains(&filler(3)));
}

#[test]
fn test_extract_without_any_region_is_none() {
    // A bare fragment has no article, main, or body pair to scan
    let html = format!("<p>{}</p>", filler(3));
    assert!(extract(&html, "https://example.com/post").is_none());
}

#[test]
fn test_extract_rejects_region_with_too_little_text() {
    // The article element wins region selection, and its thin content
    // makes the whole extraction a miss rather than falling through
    let html = format!(
        "<html><body><article>tiny</article><p>{}</p></body></html>",
        filler(5)
    );
    assert!(extract(&html, "https://example.com/post").is_none());
}

#[test]
fn test_extract_ignores_longer_tag_names() {
    // <articles> is a different element, so selection moves on to body
    let html = format!(
        "<html><body><articles>catalog</articles><p>{}</p></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains("<articles>catalog</articles>"));
}

#[test]
fn test_extract_accepts_attributes_on_region_tag() {
    let html = format!(
        "<html><body><article class=\"post\" id=\"a1\">{}</article></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains(&filler(3)));
}

#[test]
fn test_extract_collapses_text_whitespace() {
    let html = format!(
        "<html><body><article>Line one.\n\n   Line   two. {}</article></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.text_content.starts_with("Line one. Line two."));
    assert!(!extracted.text_content.contains("\n"));
}

#[test]
fn test_extract_multibyte_body() {
    // The dotted capital İ grows under Unicode lowercasing; the tag scan
    // must keep its offsets valid byte positions in the original page
    let body = "İ".repeat(100);
    let html = format!("<html><body>{body}</body></html>");

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert_eq!(extracted.content_html, body);
}

#[test]
fn test_extract_multibyte_article_excludes_trailing_markup() {
    let body = "İstanbul ".repeat(30);
    let html = format!(
        "<html><body><article>{body}</article><footer>site nav</footer></body></html>"
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert!(extracted.content_html.contains("İstanbul"));
    assert!(!extracted.content_html.contains("</article>"));
    assert!(!extracted.content_html.contains("footer"));
}

// === extract: title and site name ===

#[test]
fn test_extract_decodes_title_entities() {
    let html = format!(
        "<html><head><title> Ben &amp; Jerry &#8212; Profile </title></head>\
         <body><article>{}</article></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert_eq!(extracted.title, "Ben & Jerry \u{2014} Profile");
}

#[test]
fn test_extract_title_falls_back_to_host() {
    let html = format!("<html><body><article>{}</article></body></html>", filler(3));

    let extracted = extract(&html, "https://www.example.com/post/1").unwrap();
    assert_eq!(extracted.title, "example.com");
}

#[test]
fn test_extract_title_falls_back_to_untitled() {
    let html = format!("<html><body><article>{}</article></body></html>", filler(3));

    // No title tag and no usable host in the URL
    let extracted = extract(&html, "not-a-url").unwrap();
    assert_eq!(extracted.title, "Untitled");
}

#[test]
fn test_extract_reads_og_site_name() {
    let html = format!(
        "<html><head><meta property=\"og:site_name\" content=\"The Daily Byte\"></head>\
         <body><article>{}</article></body></html>",
        filler(3)
    );

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert_eq!(extracted.site_name.as_deref(), Some("The Daily Byte"));
}

#[test]
fn test_extract_site_name_falls_back_to_host() {
    let html = format!("<html><body><article>{}</article></body></html>", filler(3));

    let extracted = extract(&html, "https://blog.example.org/x").unwrap();
    assert_eq!(extracted.site_name.as_deref(), Some("blog.example.org"));
}

#[test]
fn test_extract_estimates_read_time() {
    let words_450 = vec!["word"; 450].join(" ");
    let html = format!("<html><body><article>{}</article></body></html>", words_450);

    let extracted = extract(&html, "https://example.com/post").unwrap();
    assert_eq!(extracted.estimated_read_time_minutes, 3);
}

// === estimate_read_time ===

#[test]
fn test_read_time_minimum_is_one_minute() {
    assert_eq!(estimate_read_time(""), 1);
    assert_eq!(estimate_read_time("a few words"), 1);
}

#[test]
fn test_read_time_rounds_up() {
    let exactly_200 = vec!["w"; 200].join(" ");
    assert_eq!(estimate_read_time(&exactly_200), 1);

    let just_over = vec!["w"; 201].join(" ");
    assert_eq!(estimate_read_time(&just_over), 2);
}

// === strip_tags ===

#[test]
fn test_strip_tags_removes_markup() {
    assert_eq!(strip_tags("<p>Hello <em>world</em></p>"), "Hello world");
}

#[test]
fn test_strip_tags_passes_plain_text_through() {
    assert_eq!(strip_tags("no markup here"), "no markup here");
}

#[test]
fn test_strip_tags_drops_unclosed_trailing_tag() {
    assert_eq!(strip_tags("before <unclosed"), "before ");
}

// === decode_entities ===

#[test]
fn test_decode_named_entities() {
    assert_eq!(decode_entities("&amp;&lt;&gt;&quot;&apos;"), "&<>\"'");
    assert_eq!(decode_entities("a&nbsp;b"), "a b");
    assert_eq!(decode_entities("it&rsquo;s"), "it\u{2019}s");
}

#[test]
fn test_decode_numeric_entities() {
    assert_eq!(decode_entities("&#65;B&#67;"), "ABC");
    assert_eq!(decode_entities("caf&#xE9;"), "caf\u{e9}");
}

#[test]
fn test_unknown_entities_pass_through() {
    assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
}

#[test]
fn test_invalid_numeric_entity_stays_literal() {
    // Surrogate code points have no char value
    assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
}

// === is_article_page ===

#[test]
fn test_article_element_marks_page() {
    assert!(is_article_page("<article>x</article>"));
    assert!(is_article_page("<ARTICLE>x</ARTICLE>"));
}

#[test]
fn test_dense_long_text_marks_page() {
    let page = "word ".repeat(125);
    assert!(is_article_page(&page));
}

#[test]
fn test_short_or_markup_heavy_pages_rejected() {
    assert!(!is_article_page(""));
    assert!(!is_article_page("hello"));

    let nav_soup = format!("{}<span>tiny</span>", "<div><ul><li></li></ul></div>".repeat(40));
    assert!(!is_article_page(&nav_soup));
}
