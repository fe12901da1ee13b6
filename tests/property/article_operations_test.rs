//! Property-based tests for article library operations.
//!
//! These tests verify that saving an article and then searching by its
//! title always finds it, that saved fields survive a fetch intact with
//! a consistent read-time estimate, and that archive filtering keeps the
//! active and full listings coherent.

use proptest::prelude::*;
use proptest::sample::Index;
use readstash::database::Database;
use readstash::managers::article_manager::{ArticleManager, ArticleManagerTrait};
use readstash::types::article::NewArticle;

/// Strategy for generating valid URL strings.
/// Produces URLs with http/https scheme, alphanumeric host, and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating titles without leading or trailing whitespace,
/// using characters that are inert in SQL LIKE patterns.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,28}[a-zA-Z0-9]"
}

fn arb_content() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{2,8}", 1..300).prop_map(|words| words.join(" "))
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

// **Property: save-then-search finds the article**
//
// *For any* valid URL, title, and body, saving an article then searching
// by the full title SHALL return a result containing that article.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn save_then_search_finds_article(
        url in arb_url(),
        title in arb_title(),
        content in arb_content(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let mut manager = ArticleManager::new(db.connection());

        let saved = manager
            .save_article(new_article(&url, &title, &content))
            .expect("save_article should succeed for valid inputs");

        let results = manager
            .search_articles(&title)
            .expect("search_articles should succeed");

        let found = results.iter().find(|a| a.id == saved.id);
        prop_assert!(
            found.is_some(),
            "Searching for title '{}' should find article '{}', got {} results",
            title,
            saved.id,
            results.len()
        );

        let article = found.unwrap();
        prop_assert_eq!(&article.url, &url, "Found article URL must match the original");
        prop_assert_eq!(&article.title, &title, "Found article title must match the original");
    }

    #[test]
    fn save_then_get_roundtrips_with_read_time(
        url in arb_url(),
        title in arb_title(),
        content in arb_content(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let mut manager = ArticleManager::new(db.connection());

        let saved = manager
            .save_article(new_article(&url, &title, &content))
            .expect("save_article should succeed for valid inputs");
        let fetched = manager
            .get_article(&saved.id)
            .expect("a just-saved article should be fetchable");

        prop_assert_eq!(&fetched.url, &url);
        prop_assert_eq!(&fetched.title, &title);
        prop_assert_eq!(&fetched.content, &content);
        prop_assert!(fetched.saved_at > 0);
        prop_assert!(!fetched.archived);

        let words = content.split_whitespace().count();
        let expected_minutes = ((words + 199) / 200).max(1) as u32;
        prop_assert_eq!(
            fetched.estimated_read_time_minutes,
            expected_minutes,
            "Read time should assume 200 words per minute, rounded up"
        );
    }

    #[test]
    fn archive_filtering_keeps_listings_coherent(
        titles in proptest::collection::vec(arb_title(), 2..6),
        pick in any::<Index>(),
    ) {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let mut manager = ArticleManager::new(db.connection());

        let mut ids = Vec::new();
        for (i, title) in titles.iter().enumerate() {
            let saved = manager
                .save_article(new_article(
                    &format!("https://example{}.com/read", i),
                    title,
                    "body text",
                ))
                .expect("save_article should succeed for valid inputs");
            ids.push(saved.id);
        }

        let archived_id = &ids[pick.index(ids.len())];
        manager
            .set_archived(archived_id, true)
            .expect("archiving an existing article should succeed");

        let active = manager.list_articles(false).expect("listing should succeed");
        let all = manager.list_articles(true).expect("listing should succeed");

        prop_assert_eq!(active.len(), titles.len() - 1);
        prop_assert_eq!(all.len(), titles.len());
        prop_assert!(
            active.iter().all(|a| &a.id != archived_id),
            "The archived article must not appear in the active listing"
        );
        prop_assert!(
            all.iter().any(|a| &a.id == archived_id),
            "The archived article must still appear in the full listing"
        );

        let (_, active_total) = manager
            .list_articles_paginated(false, 100, 0)
            .expect("pagination should succeed");
        prop_assert_eq!(active_total, (titles.len() - 1) as i64);
    }
}
