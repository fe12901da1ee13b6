//! Unit tests for the reading surface: document building, load fallback
//! between persisted highlights and fresh normalization, and the message
//! protocol from the embedded context.

use readstash::database::Database;
use readstash::managers::article_manager::{ArticleManager, ArticleManagerTrait};
use readstash::managers::highlight_store::{HighlightStore, HighlightStoreTrait};
use readstash::services::surface::{
    base_inner_html, build_document, default_mode_html, handle_surface_message, heading_sizes,
    load_document,
};
use readstash::types::article::{Article, NewArticle};
use readstash::types::message::SurfaceMessage;
use readstash::types::reader::{DocumentParams, ReaderPrefs, ReaderTheme};

fn article_with(content: &str, html_content: Option<&str>) -> Article {
    Article {
        id: "art-test".to_string(),
        url: "https://example.com/post".to_string(),
        title: "Test Article".to_string(),
        content: content.to_string(),
        html_content: html_content.map(|s| s.to_string()),
        site_name: None,
        estimated_read_time_minutes: 1,
        archived: false,
        saved_at: 1_700_000_000,
        last_opened_at: None,
        open_count: 0,
    }
}

/// In-memory database with one saved article; returns (db, article).
fn db_with_article(content: &str) -> (Database, Article) {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let article = {
        let mut mgr = ArticleManager::new(db.connection());
        mgr.save_article(NewArticle {
            url: "https://example.com/post".to_string(),
            title: "Test Article".to_string(),
            content: content.to_string(),
            html_content: None,
            site_name: None,
        })
        .expect("save_article failed")
    };
    (db, article)
}

// === build_document ===

#[test]
fn test_build_document_structure() {
    let html = build_document(&DocumentParams {
        title: Some("A Fine Title"),
        body_html: "<p>Body text.</p>",
        theme: ReaderTheme::Sepia,
        font_size_px: 18,
    });

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<meta charset=\"UTF-8\">"));
    assert!(html.contains("--reader-bg:#f4ecd8"));
    assert!(html.contains("--reader-fg:#433422"));
    assert!(html.contains("font-size:18px"));
    assert!(html.contains("<h1 class=\"article-title\">A Fine Title</h1>"));
    assert!(html.contains("<div id=\"content-root\"><p>Body text.</p></div>"));
    assert!(html.contains("id=\"highlight-toolbar\""));
    assert!(html.contains("<script>"));
}

#[test]
fn test_build_document_is_deterministic() {
    let params = DocumentParams {
        title: Some("Same"),
        body_html: "<p>Same body.</p>",
        theme: ReaderTheme::Dark,
        font_size_px: 20,
    };
    assert_eq!(build_document(&params), build_document(&params));
}

#[test]
fn test_build_document_omits_empty_title() {
    let no_title = build_document(&DocumentParams {
        title: None,
        body_html: "<p>x</p>",
        theme: ReaderTheme::Light,
        font_size_px: 18,
    });
    assert!(!no_title.contains("<h1 class=\"article-title\">"));

    let blank_title = build_document(&DocumentParams {
        title: Some("   "),
        body_html: "<p>x</p>",
        theme: ReaderTheme::Light,
        font_size_px: 18,
    });
    assert!(!blank_title.contains("<h1 class=\"article-title\">"));
}

#[test]
fn test_build_document_escapes_title() {
    let html = build_document(&DocumentParams {
        title: Some("Tom & Jerry <3"),
        body_html: "<p>x</p>",
        theme: ReaderTheme::Light,
        font_size_px: 18,
    });
    assert!(html.contains("Tom &amp; Jerry &lt;3"));
    assert!(!html.contains("Tom & Jerry <3"));
}

// === heading_sizes ===

#[test]
fn test_heading_sizes_scale_with_body_font() {
    assert_eq!(heading_sizes(18), (28, 24, 20));
    assert_eq!(heading_sizes(32), (51, 43, 36));
}

#[test]
fn test_heading_sizes_respect_floors() {
    // At the smallest body font every heading sits on its floor
    assert_eq!(heading_sizes(12), (28, 22, 18));
}

#[test]
fn test_heading_sizes_appear_in_document_css() {
    let html = build_document(&DocumentParams {
        title: None,
        body_html: "<h1>H</h1>",
        theme: ReaderTheme::Light,
        font_size_px: 12,
    });
    assert!(html.contains("h1{font-size:28px"));
    assert!(html.contains("h2{font-size:22px"));
    assert!(html.contains("h3{font-size:18px"));
}

// === base and default-mode bodies ===

#[test]
fn test_base_inner_html_prefers_sanitized_html_body() {
    let article = article_with(
        "ignored plain text",
        Some("<p>Rendered</p><script>alert(1)</script>"),
    );
    assert_eq!(base_inner_html(&article), "<p>Rendered</p>");
}

#[test]
fn test_base_inner_html_wraps_plain_content() {
    let article = article_with("First block.\n\nSecond block.", None);
    assert_eq!(
        base_inner_html(&article),
        "<p>First block.</p>\n<p>Second block.</p>"
    );

    // Whitespace-only html_content counts as absent
    let article = article_with("Only text.", Some("   "));
    assert_eq!(base_inner_html(&article), "<p>Only text.</p>");
}

#[test]
fn test_default_mode_runs_full_normalization() {
    let article = article_with("CHAPTER ONE\n\nThe story begins here.", None);

    // Default mode classifies structure; the surface wrapper does not
    assert!(default_mode_html(&article).contains("<h1>CHAPTER ONE</h1>"));
    assert!(!base_inner_html(&article).contains("<h1>"));
}

// === load_document ===

#[test]
fn test_load_document_without_record_uses_base_content() {
    let (db, article) = db_with_article("Fresh body text for reading.");
    let store = HighlightStore::new(db.connection());
    let prefs = ReaderPrefs::new(ReaderTheme::Light, 18);

    let html = load_document(&article, &prefs, &store);
    assert!(html.contains("<p>Fresh body text for reading.</p>"));
    assert!(!html.contains("<mark"));
}

#[test]
fn test_load_document_prefers_persisted_highlights() {
    let (db, article) = db_with_article("Fresh body text for reading.");
    let mut store = HighlightStore::new(db.connection());
    store.set(
        &article.id,
        "<p>Fresh <mark data-highlight=\"1\">body text</mark> for reading.</p>",
    );

    let prefs = ReaderPrefs::new(ReaderTheme::Light, 18);
    let html = load_document(&article, &prefs, &store);
    assert!(html.contains("<mark data-highlight=\"1\">body text</mark>"));
}

#[test]
fn test_load_document_renders_title_and_prefs() {
    let (db, article) = db_with_article("Body.");
    let store = HighlightStore::new(db.connection());
    let prefs = ReaderPrefs::new(ReaderTheme::Dark, 24);

    let html = load_document(&article, &prefs, &store);
    assert!(html.contains("<h1 class=\"article-title\">Test Article</h1>"));
    assert!(html.contains("--reader-bg:#1a1a1a"));
    assert!(html.contains("font-size:24px"));
}

// === handle_surface_message ===

#[test]
fn test_ready_message_is_parsed_and_stores_nothing() {
    let (db, article) = db_with_article("Body.");
    let mut store = HighlightStore::new(db.connection());

    let msg = handle_surface_message(&mut store, &article.id, r#"{"type":"ready"}"#);
    assert_eq!(msg, Some(SurfaceMessage::Ready));
    assert!(store.get(&article.id).is_none());
}

#[test]
fn test_save_message_persists_document() {
    let (db, article) = db_with_article("Body.");
    let mut store = HighlightStore::new(db.connection());

    let raw = r#"{"type":"save","html":"<p><mark data-highlight=\"1\">Body.</mark></p>"}"#;
    let msg = handle_surface_message(&mut store, &article.id, raw);

    assert!(matches!(msg, Some(SurfaceMessage::Save { .. })));
    assert_eq!(
        store.get(&article.id).as_deref(),
        Some("<p><mark data-highlight=\"1\">Body.</mark></p>")
    );
}

#[test]
fn test_malformed_messages_are_dropped() {
    let (db, article) = db_with_article("Body.");
    let mut store = HighlightStore::new(db.connection());

    assert_eq!(handle_surface_message(&mut store, &article.id, "not json"), None);
    assert_eq!(
        handle_surface_message(&mut store, &article.id, r#"{"type":"zap"}"#),
        None
    );
    // A save without its html payload does not parse
    assert_eq!(
        handle_surface_message(&mut store, &article.id, r#"{"type":"save"}"#),
        None
    );
    assert!(store.get(&article.id).is_none());
}

#[test]
fn test_save_for_unknown_article_never_blocks() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let mut store = HighlightStore::new(db.connection());

    // No such article row: the write is swallowed, not surfaced
    let raw = r#"{"type":"save","html":"<p>orphan</p>"}"#;
    let msg = handle_surface_message(&mut store, "no-such-article", raw);
    assert!(matches!(msg, Some(SurfaceMessage::Save { .. })));
    assert!(store.get("no-such-article").is_none());
}

// === End to end ===

#[test]
fn test_untitled_plain_article_renders_end_to_end() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let store = HighlightStore::new(db.connection());

    let mut article = article_with("Hello world.\n\nSecond paragraph.", None);
    article.title = String::new();
    let prefs = ReaderPrefs::new(ReaderTheme::Light, 16);

    let html = load_document(&article, &prefs, &store);

    assert!(html.contains("<p>Hello world.</p>"));
    assert!(html.contains("<p>Second paragraph.</p>"));
    assert!(
        !html.contains("<h1 class=\"article-title\">"),
        "blank title renders no heading"
    );
    assert!(html.contains("--reader-bg:#ffffff"));
    assert!(html.contains("--reader-fg:#1a1a1a"));
    assert!(html.contains("font-size:16px"));
}
