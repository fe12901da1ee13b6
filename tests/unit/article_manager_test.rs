//! Unit tests for the article manager: saving, validation, listing,
//! search, archiving, deletion, and reading stats.

use readstash::database::Database;
use readstash::managers::article_manager::{ArticleManager, ArticleManagerTrait};
use readstash::managers::highlight_store::{HighlightStore, HighlightStoreTrait};
use readstash::types::article::NewArticle;
use readstash::types::errors::ArticleError;

fn setup() -> Database {
    Database::open_in_memory().expect("open_in_memory failed")
}

fn new_article(url: &str, title: &str, content: &str) -> NewArticle {
    NewArticle {
        url: url.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        html_content: None,
        site_name: None,
    }
}

// === save_article ===

#[test]
fn test_save_assigns_id_and_defaults() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let article = mgr
        .save_article(new_article("https://example.com/post", "A Post", "Body text."))
        .unwrap();

    assert_eq!(article.id.len(), 36, "UUID v4 string form");
    assert_eq!(article.id.matches('-').count(), 4);
    assert!(article.saved_at > 0);
    assert!(!article.archived);
    assert_eq!(article.open_count, 0);
    assert!(article.last_opened_at.is_none());
}

#[test]
fn test_save_estimates_read_time() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let short = mgr
        .save_article(new_article("https://example.com/a", "A", "just a few words here"))
        .unwrap();
    assert_eq!(short.estimated_read_time_minutes, 1);

    let words_450 = vec!["word"; 450].join(" ");
    let long = mgr
        .save_article(new_article("https://example.com/b", "B", &words_450))
        .unwrap();
    assert_eq!(long.estimated_read_time_minutes, 3);

    // Read time never drops below one minute, even for empty bodies
    let empty = mgr
        .save_article(new_article("https://example.com/c", "C", ""))
        .unwrap();
    assert_eq!(empty.estimated_read_time_minutes, 1);
}

#[test]
fn test_save_trims_and_falls_back_title() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let trimmed = mgr
        .save_article(new_article("https://example.com/a", "  Spaced Out  ", "x"))
        .unwrap();
    assert_eq!(trimmed.title, "Spaced Out");

    // An empty title falls back to the URL
    let untitled = mgr
        .save_article(new_article("https://example.com/b", "   ", "x"))
        .unwrap();
    assert_eq!(untitled.title, "https://example.com/b");
}

#[test]
fn test_save_trims_url() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let article = mgr
        .save_article(new_article("  https://example.com/pad  ", "Pad", "x"))
        .unwrap();
    assert_eq!(article.url, "https://example.com/pad");
}

#[test]
fn test_save_rejects_invalid_urls() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    for bad in ["", "   ", "ftp://files.example.com", "example.com/no-scheme"] {
        let res = mgr.save_article(new_article(bad, "Bad", "x"));
        assert!(
            matches!(res, Err(ArticleError::InvalidUrl(_))),
            "URL {:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_save_rejects_duplicate_url() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    mgr.save_article(new_article("https://example.com/once", "Once", "x"))
        .unwrap();

    let res = mgr.save_article(new_article("https://example.com/once", "Again", "y"));
    assert!(matches!(res, Err(ArticleError::DuplicateUrl(_))));
}

// === get_article ===

#[test]
fn test_get_roundtrips_all_fields() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let saved = mgr
        .save_article(NewArticle {
            url: "https://example.com/full".to_string(),
            title: "Full".to_string(),
            content: "Plain body.".to_string(),
            html_content: Some("<p>Plain body.</p>".to_string()),
            site_name: Some("Example Blog".to_string()),
        })
        .unwrap();

    let fetched = mgr.get_article(&saved.id).unwrap();
    assert_eq!(fetched.url, saved.url);
    assert_eq!(fetched.title, saved.title);
    assert_eq!(fetched.content, saved.content);
    assert_eq!(fetched.html_content, saved.html_content);
    assert_eq!(fetched.site_name, saved.site_name);
    assert_eq!(fetched.saved_at, saved.saved_at);
}

#[test]
fn test_get_not_found() {
    let db = setup();
    let mgr = ArticleManager::new(db.connection());
    let res = mgr.get_article("no-such-id");
    assert!(matches!(res, Err(ArticleError::NotFound(_))));
}

// === list and search ===

#[test]
fn test_list_excludes_archived_by_default() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let keep = mgr
        .save_article(new_article("https://example.com/keep", "Keep", "x"))
        .unwrap();
    let shelve = mgr
        .save_article(new_article("https://example.com/shelve", "Shelve", "x"))
        .unwrap();
    mgr.set_archived(&shelve.id, true).unwrap();

    let active = mgr.list_articles(false).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, keep.id);

    let all = mgr.list_articles(true).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_list_paginated_counts_and_pages() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    for i in 0..5 {
        mgr.save_article(new_article(
            &format!("https://example.com/p{}", i),
            &format!("P{}", i),
            "x",
        ))
        .unwrap();
    }

    let (page, total) = mgr.list_articles_paginated(false, 2, 0).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(total, 5);

    let (tail, total) = mgr.list_articles_paginated(false, 10, 4).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(total, 5);
}

#[test]
fn test_paginated_total_respects_archive_filter() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let a = mgr
        .save_article(new_article("https://example.com/a", "A", "x"))
        .unwrap();
    mgr.save_article(new_article("https://example.com/b", "B", "x"))
        .unwrap();
    mgr.set_archived(&a.id, true).unwrap();

    let (_, active_total) = mgr.list_articles_paginated(false, 10, 0).unwrap();
    assert_eq!(active_total, 1);

    let (_, full_total) = mgr.list_articles_paginated(true, 10, 0).unwrap();
    assert_eq!(full_total, 2);
}

#[test]
fn test_search_matches_title_url_and_body() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    mgr.save_article(new_article(
        "https://rust-lang.org/blog",
        "Rust Blog",
        "Ownership and borrowing explained.",
    ))
    .unwrap();
    mgr.save_article(new_article(
        "https://example.com/cooking",
        "Pasta Night",
        "Boil the water first.",
    ))
    .unwrap();

    assert_eq!(mgr.search_articles("Rust").unwrap().len(), 1);
    assert_eq!(mgr.search_articles("cooking").unwrap().len(), 1, "URL match");
    assert_eq!(mgr.search_articles("borrowing").unwrap().len(), 1, "body match");
    assert_eq!(mgr.search_articles("zeppelin").unwrap().len(), 0);
}

// === delete and archive ===

#[test]
fn test_delete_removes_article_and_highlight_record() {
    let db = setup();

    let id = {
        let mut mgr = ArticleManager::new(db.connection());
        mgr.save_article(new_article("https://example.com/del", "Del", "x"))
            .unwrap()
            .id
    };
    {
        let mut store = HighlightStore::new(db.connection());
        store.set(&id, "<p>marked</p>");
        assert!(store.has_record(&id));
    }

    let mut mgr = ArticleManager::new(db.connection());
    mgr.delete_article(&id).unwrap();

    assert!(matches!(mgr.get_article(&id), Err(ArticleError::NotFound(_))));
    let store = HighlightStore::new(db.connection());
    assert!(store.get(&id).is_none());
}

#[test]
fn test_delete_not_found() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());
    let res = mgr.delete_article("ghost");
    assert!(matches!(res, Err(ArticleError::NotFound(_))));
}

#[test]
fn test_set_archived_toggles_both_ways() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let id = mgr
        .save_article(new_article("https://example.com/arch", "Arch", "x"))
        .unwrap()
        .id;

    mgr.set_archived(&id, true).unwrap();
    assert!(mgr.get_article(&id).unwrap().archived);

    mgr.set_archived(&id, false).unwrap();
    assert!(!mgr.get_article(&id).unwrap().archived);
}

#[test]
fn test_set_archived_not_found() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());
    assert!(matches!(
        mgr.set_archived("ghost", true),
        Err(ArticleError::NotFound(_))
    ));
}

// === record_open ===

#[test]
fn test_record_open_bumps_stats() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());

    let id = mgr
        .save_article(new_article("https://example.com/open", "Open", "x"))
        .unwrap()
        .id;

    mgr.record_open(&id).unwrap();
    mgr.record_open(&id).unwrap();

    let article = mgr.get_article(&id).unwrap();
    assert_eq!(article.open_count, 2);
    assert!(article.last_opened_at.is_some());
}

#[test]
fn test_record_open_not_found() {
    let db = setup();
    let mut mgr = ArticleManager::new(db.connection());
    assert!(matches!(
        mgr.record_open("ghost"),
        Err(ArticleError::NotFound(_))
    ));
}
