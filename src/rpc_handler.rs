//! RPC method handler for the ReadStash JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! appropriate managers and services via the `App` struct.

use std::str::FromStr;
use std::sync::Mutex;

use crate::app::App;
use crate::managers::article_manager::{ArticleManager, ArticleManagerTrait};
use crate::managers::highlight_store::{HighlightStore, HighlightStoreTrait};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::{highlighter, speech, surface, theme_engine};
use crate::types::article::NewArticle;
use crate::types::reader::{ReaderPrefs, ReaderTheme};

use serde_json::{json, Value};

/// Summary view of an article for list responses; bodies stay out of
/// list payloads.
fn article_summary(a: &crate::types::article::Article) -> Value {
    json!({
        "id": a.id,
        "url": a.url,
        "title": a.title,
        "site_name": a.site_name,
        "estimated_read_time_minutes": a.estimated_read_time_minutes,
        "archived": a.archived,
        "saved_at": a.saved_at,
        "last_opened_at": a.last_opened_at,
        "open_count": a.open_count,
    })
}

/// The document the highlighter operates on: the persisted highlighted
/// version when one exists, otherwise the article's normalized base body.
fn current_inner_html(
    store: &HighlightStore,
    mgr: &ArticleManager,
    article_id: &str,
) -> Result<String, String> {
    let article = mgr.get_article(article_id).map_err(|e| e.to_string())?;
    Ok(match store.get(article_id) {
        Some(saved) if !saved.trim().is_empty() => saved,
        _ => surface::base_inner_html(&article),
    })
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Articles ───
        "article.save" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let title = params.get("title").and_then(|v| v.as_str()).ok_or("missing title")?;
            let html_content = params
                .get("html")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            let content = match params.get("content").and_then(|v| v.as_str()) {
                Some(text) => text.to_string(),
                None => match &html_content {
                    // Derive the plain-text body when only HTML was supplied.
                    Some(html) => {
                        let stripped = crate::services::extractor::strip_tags(html);
                        crate::services::extractor::decode_entities(stripped.trim())
                    }
                    None => return Err("missing content: provide content or html".to_string()),
                },
            };
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut mgr = ArticleManager::new(conn);
            let article = mgr
                .save_article(NewArticle {
                    url: url.to_string(),
                    title: title.to_string(),
                    content,
                    html_content,
                    site_name: params
                        .get("site_name")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string()),
                })
                .map_err(|e| e.to_string())?;
            Ok(article_summary(&article))
        }
        #[cfg(feature = "fetch")]
        "article.save_url" => {
            let url = params.get("url").and_then(|v| v.as_str()).ok_or("missing url")?;
            let fetcher =
                crate::services::fetcher::PageFetcher::new().map_err(|e| e.to_string())?;
            let page_html = fetcher.fetch_html(url).map_err(|e| e.to_string())?;
            let extracted = crate::services::extractor::extract(&page_html, url)
                .ok_or_else(|| format!("no readable content found at {}", url))?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut mgr = ArticleManager::new(conn);
            let article = mgr
                .save_article(NewArticle {
                    url: url.to_string(),
                    title: extracted.title,
                    content: extracted.text_content,
                    html_content: Some(extracted.content_html),
                    site_name: extracted.site_name,
                })
                .map_err(|e| e.to_string())?;
            Ok(article_summary(&article))
        }
        "article.list" => {
            let include_archived = params
                .get("include_archived")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            match params.get("limit").and_then(|v| v.as_i64()) {
                Some(limit) => {
                    let offset = params.get("offset").and_then(|v| v.as_i64()).unwrap_or(0);
                    let (articles, total) = mgr
                        .list_articles_paginated(include_archived, limit, offset)
                        .map_err(|e| e.to_string())?;
                    let arr: Vec<Value> = articles.iter().map(article_summary).collect();
                    Ok(json!({"articles": arr, "total": total}))
                }
                None => {
                    let articles = mgr
                        .list_articles(include_archived)
                        .map_err(|e| e.to_string())?;
                    let arr: Vec<Value> = articles.iter().map(article_summary).collect();
                    Ok(json!(arr))
                }
            }
        }
        "article.get" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let article = mgr.get_article(id).map_err(|e| e.to_string())?;
            serde_json::to_value(&article).map_err(|e| e.to_string())
        }
        "article.search" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let articles = mgr.search_articles(query).map_err(|e| e.to_string())?;
            let arr: Vec<Value> = articles.iter().map(article_summary).collect();
            Ok(json!(arr))
        }
        "article.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut mgr = ArticleManager::new(conn);
            mgr.delete_article(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "article.archive" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let archived = params
                .get("archived")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut mgr = ArticleManager::new(conn);
            mgr.set_archived(id, archived).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "archived": archived}))
        }

        // ─── Reading surface ───
        "reader.render" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;

            let mut prefs = a.initial_prefs();
            if let Some(name) = params.get("theme").and_then(|v| v.as_str()) {
                prefs.theme = ReaderTheme::from_str(name).map_err(|e| e.to_string())?;
            }
            if let Some(px) = params.get("font_size_px").and_then(|v| v.as_u64()) {
                prefs = ReaderPrefs::new(prefs.theme, px as u32);
            }

            let conn = a.db.connection();
            let mut mgr = ArticleManager::new(conn);
            let article = mgr.get_article(id).map_err(|e| e.to_string())?;
            mgr.record_open(id).map_err(|e| e.to_string())?;

            let store = HighlightStore::new(conn);
            let html = surface::load_document(&article, &prefs, &store);
            Ok(json!({
                "html": html,
                "theme": prefs.theme.as_str(),
                "font_size_px": prefs.font_size_px,
            }))
        }
        "reader.palette" => {
            let name = params.get("theme").and_then(|v| v.as_str()).ok_or("missing theme")?;
            let theme = ReaderTheme::from_str(name).map_err(|e| e.to_string())?;
            let variables = theme_engine::css_variables(theme);
            let (swatch_bg, swatch_fg) = theme_engine::swatch_colors(theme);
            Ok(json!({
                "theme": theme.as_str(),
                "variables": variables,
                "swatch": {"background": swatch_bg, "text": swatch_fg},
            }))
        }

        // ─── Highlights ───
        "highlight.apply" => {
            let article_id = params
                .get("article_id")
                .and_then(|v| v.as_str())
                .ok_or("missing article_id")?;
            let quote = params.get("quote").and_then(|v| v.as_str()).ok_or("missing quote")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let mut store = HighlightStore::new(conn);
            let inner = current_inner_html(&store, &mgr, article_id)?;
            let highlighted =
                highlighter::highlight_quote(&inner, quote).map_err(|e| e.to_string())?;
            store.set(article_id, &highlighted);
            Ok(json!({
                "count": highlighter::count(&highlighted),
                "html": highlighted,
            }))
        }
        "highlight.remove" => {
            let article_id = params
                .get("article_id")
                .and_then(|v| v.as_str())
                .ok_or("missing article_id")?;
            let index = params
                .get("index")
                .and_then(|v| v.as_u64())
                .ok_or("missing index")? as usize;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let mut store = HighlightStore::new(conn);
            let inner = current_inner_html(&store, &mgr, article_id)?;
            let remaining = highlighter::remove_at(&inner, index).map_err(|e| e.to_string())?;
            store.set(article_id, &remaining);
            Ok(json!({
                "count": highlighter::count(&remaining),
                "html": remaining,
            }))
        }
        "highlight.list" => {
            let article_id = params
                .get("article_id")
                .and_then(|v| v.as_str())
                .ok_or("missing article_id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let store = HighlightStore::new(conn);
            let inner = current_inner_html(&store, &mgr, article_id)?;
            let quotes = highlighter::list(&inner);
            Ok(json!({"count": quotes.len(), "quotes": quotes}))
        }
        "highlight.clear" => {
            let article_id = params
                .get("article_id")
                .and_then(|v| v.as_str())
                .ok_or("missing article_id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut store = HighlightStore::new(conn);
            store.delete(article_id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let settings = a.settings_engine.get_settings();
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Speech ───
        "speech.text" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mgr = ArticleManager::new(conn);
            let article = mgr.get_article(id).map_err(|e| e.to_string())?;
            let text = speech::speech_text(&surface::base_inner_html(&article));
            let sentence_count = speech::split_sentences(&text).len();
            Ok(json!({"text": text, "sentence_count": sentence_count}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
