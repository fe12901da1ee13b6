//! Reading surface — builds the standalone document hosted in the isolated
//! browsing context, and handles the narrow message protocol coming back
//! from it.
//!
//! The embedded document is fully self-contained: palette CSS variables,
//! typography scaled to the session font size, and the highlight script
//! are all inlined. Every theme/font/article change rebuilds the whole
//! document and remounts the context; nothing is patched in place, so a
//! torn-down instance can never deliver messages into a newer one.

use tracing::debug;

use crate::managers::highlight_store::HighlightStoreTrait;
use crate::services::{normalizer, theme_engine};
use crate::types::article::Article;
use crate::types::message::SurfaceMessage;
use crate::types::reader::{DocumentParams, ReaderPrefs};

/// Highlight interaction script, inlined into every built document.
const HIGHLIGHT_JS: &str = include_str!("../../resources/reader/highlight.js");

/// Minimum heading sizes in CSS pixels; small body fonts do not shrink
/// headings below these.
const H1_FLOOR_PX: u32 = 28;
const H2_FLOOR_PX: u32 = 22;
const H3_FLOOR_PX: u32 = 18;

/// Heading pixel sizes for a body font size: h1 at 1.6x, h2 at 1.35x,
/// h3 at 1.15x, each floored.
pub fn heading_sizes(font_size_px: u32) -> (u32, u32, u32) {
    let h1 = (font_size_px * 160 / 100).max(H1_FLOOR_PX);
    let h2 = (font_size_px * 135 / 100).max(H2_FLOOR_PX);
    let h3 = (font_size_px * 115 / 100).max(H3_FLOOR_PX);
    (h1, h2, h3)
}

/// Builds the complete reading-surface document for the given parameters.
pub fn build_document(params: &DocumentParams) -> String {
    let (h1_px, h2_px, h3_px) = heading_sizes(params.font_size_px);

    // Sorted for a deterministic document; HashMap order is not.
    let mut vars: Vec<(String, String)> = theme_engine::css_variables(params.theme)
        .into_iter()
        .collect();
    vars.sort();

    let mut html = String::with_capacity(params.body_html.len() + HIGHLIGHT_JS.len() + 4000);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\">");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><style>",
    );

    html.push_str(":root{");
    for (name, value) in &vars {
        html.push_str(name);
        html.push(':');
        html.push_str(value);
        html.push(';');
    }
    html.push('}');

    html.push_str("*{margin:0;padding:0;box-sizing:border-box}");
    html.push_str(&format!(
        "body{{background:var(--reader-bg);color:var(--reader-fg);font-family:var(--reader-font-family);font-size:{}px;line-height:1.7;max-width:42em;margin:0 auto;padding:24px 20px 64px}}",
        params.font_size_px
    ));
    html.push_str(&format!(
        "h1{{font-size:{}px;line-height:1.25;margin:1.2em 0 0.5em}}h2{{font-size:{}px;line-height:1.3;margin:1.2em 0 0.5em}}h3{{font-size:{}px;line-height:1.35;margin:1.1em 0 0.4em}}",
        h1_px, h2_px, h3_px
    ));
    html.push_str("p{margin:0 0 1em}");
    html.push_str("ul,ol{margin:0 0 1em;padding-left:1.6em}li{margin-bottom:0.35em}");
    html.push_str("blockquote{border-left:3px solid var(--reader-border);color:var(--reader-muted);font-style:italic;margin:0 0 1em;padding:0.2em 0 0.2em 1em}");
    html.push_str("pre{background:var(--reader-header-bg);border:1px solid var(--reader-border);border-radius:6px;margin:0 0 1em;overflow-x:auto;padding:0.8em}");
    html.push_str("code{font-family:'SF Mono','Fira Code',Menlo,monospace;font-size:0.88em}");
    html.push_str("a{color:var(--reader-fg);text-decoration:underline}");
    html.push_str("img{max-width:100%;height:auto}");
    html.push_str("hr{border:none;border-top:1px solid var(--reader-border);margin:1.2em 0}");
    html.push_str(
        "::selection{background:var(--reader-selection-bg);color:var(--reader-selection-fg)}",
    );
    html.push_str("mark[data-highlight]{background:var(--reader-saved-highlight-bg);color:inherit;border-radius:2px;padding:0 1px;cursor:pointer}");
    html.push_str(".article-title{margin-top:0.2em}");
    html.push_str("#highlight-toolbar{display:none;position:absolute;z-index:10}");
    html.push_str("#highlight-btn{background:var(--reader-highlight-btn-bg);color:var(--reader-highlight-btn-fg);border:none;border-radius:6px;box-shadow:0 2px 8px rgba(0,0,0,0.25);cursor:pointer;font-size:14px;padding:6px 14px}");
    html.push_str("</style></head><body>");

    if let Some(title) = params.title {
        if !title.trim().is_empty() {
            html.push_str("<h1 class=\"article-title\">");
            html.push_str(&escape_text(title));
            html.push_str("</h1><hr>");
        }
    }

    html.push_str("<div id=\"content-root\">");
    html.push_str(params.body_html);
    html.push_str("</div>");
    html.push_str("<div id=\"highlight-toolbar\"><button id=\"highlight-btn\">Highlight</button></div>");
    html.push_str("<script>");
    html.push_str(HIGHLIGHT_JS);
    html.push_str("</script></body></html>");
    html
}

/// Inner HTML for an article with no saved highlight record: sanitized
/// pre-rendered HTML when present, otherwise the plain content paragraph-
/// wrapped for the surface.
pub fn base_inner_html(article: &Article) -> String {
    match &article.html_content {
        Some(html) if !html.trim().is_empty() => normalizer::sanitize_html(html),
        _ => normalizer::wrap_plain_text(&article.content),
    }
}

/// Rendering for the default (non-reading-mode) article view: the fuller
/// plain-text normalization rather than the surface's light wrapper.
pub fn default_mode_html(article: &Article) -> String {
    match &article.html_content {
        Some(html) if !html.trim().is_empty() => normalizer::sanitize_html(html),
        _ => normalizer::normalize_plain_text(&article.content),
    }
}

/// Host-side load sequence: prefer the persisted highlighted document,
/// fall back to fresh normalization. Store failures look like absence and
/// never block rendering.
pub fn load_document(
    article: &Article,
    prefs: &ReaderPrefs,
    store: &dyn HighlightStoreTrait,
) -> String {
    let inner = match store.get(&article.id) {
        Some(saved) if !saved.trim().is_empty() => {
            debug!(article_id = %article.id, "rendering persisted highlight record");
            saved
        }
        _ => base_inner_html(article),
    };

    let title = if article.title.trim().is_empty() {
        None
    } else {
        Some(article.title.as_str())
    };

    build_document(&DocumentParams {
        title,
        body_html: &inner,
        theme: prefs.theme,
        font_size_px: prefs.font_size_px,
    })
}

/// Handles one raw message from the embedded context. Save messages are
/// persisted against `article_id`; ready messages are logged. Returns the
/// parsed message, or `None` for anything malformed or unknown (dropped).
pub fn handle_surface_message(
    store: &mut dyn HighlightStoreTrait,
    article_id: &str,
    raw: &str,
) -> Option<SurfaceMessage> {
    let message = SurfaceMessage::parse(raw)?;
    match &message {
        SurfaceMessage::Ready => {
            debug!(article_id, "reading surface ready");
        }
        SurfaceMessage::Save { html } => {
            store.set(article_id, html);
        }
    }
    Some(message)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
