//! WebView reading shell using `wry` + `tao`.
//!
//! Architecture:
//! - Internal pages (library, reader chrome) are served via the `stash://`
//!   custom protocol; there is no external navigation at all.
//! - The article itself is hosted in a sandboxed iframe pointed at
//!   `stash://localhost/doc/{id}`, so the reading surface runs in its own
//!   browsing context. Theme and font changes reload the reader page,
//!   which remounts the iframe with a freshly built document.
//! - IPC from JS → Rust via `window.ipc.postMessage()`. The surface posts
//!   its messages either directly (when the platform injects `window.ipc`
//!   into iframes) or to the parent chrome page, which forwards them
//!   tagged with the article id it was built for.

use std::sync::{Arc, Mutex};

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::window::WindowBuilder;
use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::app::App;
use crate::managers::article_manager::{ArticleManager, ArticleManagerTrait};
use crate::managers::highlight_store::HighlightStore;
use crate::services::{surface, theme_engine};
use crate::types::article::Article;
use crate::types::reader::{ReaderPrefs, ReaderTheme};

#[derive(Debug)]
enum UserEvent {
    LoadUrl(String),
    EvalScript(String),
}

struct ReaderState {
    app: App,
    /// Session reading preferences; settings seed them at startup.
    prefs: ReaderPrefs,
    /// Article currently mounted in the reader, if any. Surface messages
    /// for any other article are stale and dropped.
    current_article: Option<String>,
    speech_on: bool,
}

const SHELL_JS: &str = include_str!("../../resources/ui/shell.js");

/// Build HTML for internal chrome pages (library, reader). The shell
/// bootstrap is INLINED because `with_initialization_script` does not run
/// on custom-protocol (`stash://`) pages on Windows WebView2.
fn shell_page(body: &str, extra_css: &str, extra_js: &str) -> String {
    let shell_css = include_str!("../../resources/ui/shell.css");
    let mut html = String::with_capacity(
        body.len() + extra_css.len() + extra_js.len() + shell_css.len() + SHELL_JS.len() + 2000,
    );
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>");
    html.push_str(":root{--shell-bg:#faf9f7;--shell-fg:#1f2328;--shell-muted:#6e7175;--shell-border:#e3e0db;--shell-header-bg:#f3f1ed;--shell-hover:#efede8;--shell-input-bg:#ffffff;--shell-accent:#b8763e;--shell-accent-soft:rgba(184,118,62,0.25);--font:-apple-system,BlinkMacSystemFont,\"Segoe UI\",\"Noto Sans\",Helvetica,Arial,sans-serif}");
    html.push_str("*{margin:0;padding:0;box-sizing:border-box}");
    html.push_str("body{font-family:var(--font);background:var(--shell-bg);color:var(--shell-fg)}");
    html.push_str(shell_css);
    html.push_str(extra_css);
    html.push_str("</style></head><body>");
    html.push_str(body);
    html.push_str("<script>");
    html.push_str(SHELL_JS);
    html.push_str("</script>");
    if !extra_js.is_empty() {
        html.push_str("<script>");
        html.push_str(extra_js);
        html.push_str("</script>");
    }
    html.push_str("</body></html>");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn library_html(state: &ReaderState) -> String {
    let conn = state.app.db.connection();
    let mgr = ArticleManager::new(conn);
    let articles = match mgr.list_articles(true) {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, "library listing failed");
            Vec::new()
        }
    };

    let mut cards = String::new();
    for a in &articles {
        let site = a.site_name.as_deref().unwrap_or("");
        let meta = if site.is_empty() {
            format!("{} min read", a.estimated_read_time_minutes)
        } else {
            format!("{} · {} min read", site, a.estimated_read_time_minutes)
        };
        let haystack = format!("{} {}", a.title, site).to_lowercase();
        let (arch_label, arch_to) = if a.archived { ("Unarchive", "0") } else { ("Archive", "1") };
        cards.push_str(&format!(
            concat!(
                "<div class=\"article-card{archived}\" data-cmd=\"open_article\" data-id=\"{id}\" data-search=\"{search}\">",
                "<div class=\"card-title\">{title}</div>",
                "<div class=\"card-meta\">{meta}</div>",
                "<div class=\"card-actions\">",
                "<button class=\"icon-btn\" data-cmd=\"archive_article\" data-id=\"{id}\" data-archived=\"{arch_to}\">{arch_label}</button>",
                "<button class=\"icon-btn\" data-cmd=\"delete_article\" data-id=\"{id}\">Delete</button>",
                "</div></div>"
            ),
            archived = if a.archived { " archived" } else { "" },
            id = escape_html(&a.id),
            search = escape_html(&haystack),
            title = escape_html(&a.title),
            meta = escape_html(&meta),
            arch_to = arch_to,
            arch_label = arch_label,
        ));
    }
    if articles.is_empty() {
        cards.push_str("<div class=\"empty-state\">Nothing stashed yet. Paste a URL above to save your first article.</div>");
    }

    let body = format!(
        concat!(
            "<div class=\"library-page\">",
            "<div class=\"shell-header\"><span class=\"shell-title\">ReadStash</span>",
            "<span class=\"shell-meta\">{count} saved</span></div>",
            "<div class=\"library-toolbar\">",
            "<input id=\"rs-save-input\" type=\"text\" placeholder=\"Save a URL...\" />",
            "<input id=\"rs-search\" type=\"text\" placeholder=\"Search your stash\" />",
            "</div>",
            "<div class=\"library-options\"><input id=\"rs-show-archived\" type=\"checkbox\" />",
            "<label for=\"rs-show-archived\">Show archived</label></div>",
            "<div class=\"article-list\">{cards}</div>",
            "</div>"
        ),
        count = articles.iter().filter(|a| !a.archived).count(),
        cards = cards,
    );

    let js = r#"
var si=document.getElementById('rs-save-input');
if(si){si.addEventListener('keydown',function(e){
  if(e.key==='Enter'&&e.target.value.trim()){
    __rs_ipc('save_url',{url:e.target.value.trim()});
    e.target.value='';
    __rs_showToast('Saving\u2026');
  }
});}
var q=document.getElementById('rs-search');
if(q){q.addEventListener('input',function(){
  var needle=q.value.trim().toLowerCase();
  document.querySelectorAll('.article-card').forEach(function(c){
    c.classList.toggle('filtered-out',needle!==''&&c.dataset.search.indexOf(needle)<0);
  });
});}
var sa=document.getElementById('rs-show-archived');
if(sa){sa.addEventListener('change',function(){
  document.body.classList.toggle('show-archived',sa.checked);
});}
"#;

    shell_page(&body, "", js)
}

fn reader_html(state: &ReaderState, article: &Article) -> String {
    let site = article.site_name.as_deref().unwrap_or("");
    let meta = if site.is_empty() {
        format!("{} min read", article.estimated_read_time_minutes)
    } else {
        format!("{} · {} min read", site, article.estimated_read_time_minutes)
    };

    let mut swatches = String::new();
    for theme in ReaderTheme::all() {
        let (bg, _fg) = theme_engine::swatch_colors(theme);
        let active = if theme == state.prefs.theme { " active" } else { "" };
        swatches.push_str(&format!(
            "<button class=\"swatch{active}\" style=\"background:{bg}\" title=\"{name}\" data-cmd=\"set_theme\" data-theme=\"{name}\"></button>",
            active = active,
            bg = bg,
            name = theme.as_str(),
        ));
    }

    let speech_label = if state.speech_on { "Stop" } else { "Listen" };
    let speech_class = if state.speech_on { " on" } else { "" };

    let body = format!(
        concat!(
            "<div class=\"reader-page\">",
            "<div class=\"shell-header\">",
            "<button class=\"icon-btn\" data-cmd=\"back\" title=\"Back to library\">&#8249; Library</button>",
            "<span class=\"shell-title\">{title}</span>",
            "<span class=\"shell-meta\">{meta}</span>",
            "<span class=\"shell-spacer\"></span>",
            "{swatches}",
            "<button class=\"icon-btn\" data-cmd=\"font_step\" data-delta=\"-1\" title=\"Smaller text\"{dec_dis}>A&#8722;</button>",
            "<button class=\"icon-btn\" data-cmd=\"font_step\" data-delta=\"1\" title=\"Larger text\"{inc_dis}>A+</button>",
            "<button id=\"rs-speech\" class=\"icon-btn{speech_class}\" data-cmd=\"toggle_speech\">{speech_label}</button>",
            "</div>",
            "<div id=\"rs-loading\" class=\"loading-overlay\"><div class=\"spinner\"></div></div>",
            "<iframe class=\"surface-frame\" src=\"stash://localhost/doc/{id}\" sandbox=\"allow-scripts\"></iframe>",
            "</div>"
        ),
        title = escape_html(&article.title),
        meta = escape_html(&meta),
        swatches = swatches,
        dec_dis = if state.prefs.can_decrease() { "" } else { " disabled" },
        inc_dis = if state.prefs.can_increase() { "" } else { " disabled" },
        speech_class = speech_class,
        speech_label = speech_label,
        id = escape_html(&article.id),
    );

    // Forward surface messages tagged with the article this page was built
    // for; the host drops anything that no longer matches its state.
    let js = format!(
        r#"
var RS_ARTICLE='{id}';
window.addEventListener('message',function(e){{
  if(typeof e.data!=='string')return;
  __rs_ipc('surface_message',{{article:RS_ARTICLE,payload:e.data}});
  try{{
    var m=JSON.parse(e.data);
    if(m&&m.type==='ready'){{
      var l=document.getElementById('rs-loading');
      if(l)l.classList.add('hidden');
    }}
  }}catch(err){{}}
}});
window.__rs_setSpeech=function(on){{
  var b=document.getElementById('rs-speech');
  if(b){{b.classList.toggle('on',!!on);b.textContent=on?'Stop':'Listen';}}
}};
setTimeout(function(){{
  var l=document.getElementById('rs-loading');
  if(l)l.classList.add('hidden');
}},4000);
"#,
        id = article.id,
    );

    shell_page(&body, "", &js)
}

fn doc_html(state: &ReaderState, article_id: &str) -> Option<String> {
    let conn = state.app.db.connection();
    let mgr = ArticleManager::new(conn);
    let article = match mgr.get_article(article_id) {
        Ok(a) => a,
        Err(e) => {
            warn!(article_id, error = %e, "surface document request for unknown article");
            return None;
        }
    };
    let store = HighlightStore::new(conn);
    Some(surface::load_document(&article, &state.prefs, &store))
}

fn not_found_html() -> String {
    shell_page(
        "<div class=\"empty-state\">That article is gone.</div>",
        "",
        "",
    )
}

// ─── IPC handler ───

fn handle_ipc(state: &mut ReaderState, message: &str) -> Option<UserEvent> {
    let msg: serde_json::Value = serde_json::from_str(message).ok()?;

    let Some(cmd) = msg.get("cmd").and_then(|v| v.as_str()) else {
        // No command field: this is a surface message posted straight from
        // the iframe on platforms that inject `window.ipc` there. It can
        // only belong to the currently mounted article.
        return handle_surface_payload(state, None, message);
    };

    match cmd {
        "open_article" => {
            let id = msg.get("id").and_then(|v| v.as_str())?;
            {
                let conn = state.app.db.connection();
                let mut mgr = ArticleManager::new(conn);
                if let Err(e) = mgr.record_open(id) {
                    warn!(article_id = id, error = %e, "open not recorded");
                    return Some(UserEvent::EvalScript(
                        "__rs_showToast('That article is gone')".into(),
                    ));
                }
            }
            stop_speech(state);
            state.current_article = Some(id.to_string());
            Some(UserEvent::LoadUrl(format!("stash://localhost/read/{}", id)))
        }

        "back" => {
            stop_speech(state);
            state.current_article = None;
            Some(UserEvent::LoadUrl("stash://localhost/library".to_string()))
        }

        "set_theme" => {
            let name = msg.get("theme").and_then(|v| v.as_str())?;
            match name.parse::<ReaderTheme>() {
                Ok(theme) => state.prefs.theme = theme,
                Err(e) => {
                    warn!(error = %e, "theme change ignored");
                    return None;
                }
            }
            reload_reader(state)
        }

        "font_step" => {
            let delta: i32 = msg
                .get("delta")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())?;
            if delta > 0 {
                state.prefs.increase_font();
            } else {
                state.prefs.decrease_font();
            }
            reload_reader(state)
        }

        "save_url" => handle_save_url(state, &msg),

        "delete_article" => {
            let id = msg.get("id").and_then(|v| v.as_str())?;
            let conn = state.app.db.connection();
            let mut mgr = ArticleManager::new(conn);
            match mgr.delete_article(id) {
                Ok(()) => Some(UserEvent::LoadUrl("stash://localhost/library".to_string())),
                Err(e) => Some(UserEvent::EvalScript(format!(
                    "__rs_showToast('{}')",
                    escape_js(&e.to_string())
                ))),
            }
        }

        "archive_article" => {
            let id = msg.get("id").and_then(|v| v.as_str())?;
            let archived = msg.get("archived").and_then(|v| v.as_str()) == Some("1");
            let conn = state.app.db.connection();
            let mut mgr = ArticleManager::new(conn);
            match mgr.set_archived(id, archived) {
                Ok(()) => Some(UserEvent::LoadUrl("stash://localhost/library".to_string())),
                Err(e) => Some(UserEvent::EvalScript(format!(
                    "__rs_showToast('{}')",
                    escape_js(&e.to_string())
                ))),
            }
        }

        "toggle_speech" => handle_toggle_speech(state),

        "surface_message" => {
            let article = msg.get("article").and_then(|v| v.as_str())?.to_string();
            let payload = msg.get("payload").and_then(|v| v.as_str())?.to_string();
            handle_surface_payload(state, Some(&article), &payload)
        }

        _ => None,
    }
}

/// Routes one raw surface message to the store, guarded against stale
/// contexts: the message must belong to the article that is mounted now.
fn handle_surface_payload(
    state: &mut ReaderState,
    claimed_article: Option<&str>,
    payload: &str,
) -> Option<UserEvent> {
    let current = state.current_article.clone()?;
    if let Some(claimed) = claimed_article {
        if claimed != current {
            debug!(claimed, current = %current, "stale surface message dropped");
            return None;
        }
    }
    let conn = state.app.db.connection();
    let mut store = HighlightStore::new(conn);
    surface::handle_surface_message(&mut store, &current, payload);
    None
}

#[cfg(feature = "fetch")]
fn handle_save_url(state: &mut ReaderState, msg: &serde_json::Value) -> Option<UserEvent> {
    use crate::services::{extractor, fetcher};
    use crate::types::article::NewArticle;

    let url = msg.get("url").and_then(|v| v.as_str())?.trim().to_string();

    let saved = fetcher::PageFetcher::new()
        .and_then(|f| f.fetch_html(&url))
        .map_err(|e| e.to_string())
        .and_then(|html| {
            extractor::extract(&html, &url)
                .ok_or_else(|| format!("no readable content found at {}", url))
        })
        .and_then(|extracted| {
            let conn = state.app.db.connection();
            let mut mgr = ArticleManager::new(conn);
            mgr.save_article(NewArticle {
                url: url.clone(),
                title: extracted.title,
                content: extracted.text_content,
                html_content: Some(extracted.content_html),
                site_name: extracted.site_name,
            })
            .map_err(|e| e.to_string())
        });

    match saved {
        Ok(article) => {
            debug!(article_id = %article.id, "article saved from url");
            Some(UserEvent::LoadUrl("stash://localhost/library".to_string()))
        }
        Err(e) => Some(UserEvent::EvalScript(format!(
            "__rs_showToast('{}')",
            escape_js(&e)
        ))),
    }
}

#[cfg(not(feature = "fetch"))]
fn handle_save_url(_state: &mut ReaderState, _msg: &serde_json::Value) -> Option<UserEvent> {
    Some(UserEvent::EvalScript(
        "__rs_showToast('Built without fetch support')".to_string(),
    ))
}

fn handle_toggle_speech(state: &mut ReaderState) -> Option<UserEvent> {
    use crate::services::speech;

    if state.speech_on {
        stop_speech(state);
        return Some(UserEvent::EvalScript("__rs_setSpeech(false)".to_string()));
    }

    let id = state.current_article.clone()?;
    let text = {
        let conn = state.app.db.connection();
        let mgr = ArticleManager::new(conn);
        let article = match mgr.get_article(&id) {
            Ok(a) => a,
            Err(e) => {
                warn!(article_id = %id, error = %e, "speech request for unknown article");
                return None;
            }
        };
        speech::speech_text(&surface::base_inner_html(&article))
    };

    match state.app.speech.play(&text) {
        Ok(()) => {
            state.speech_on = true;
            Some(UserEvent::EvalScript("__rs_setSpeech(true)".to_string()))
        }
        Err(e) => {
            warn!(error = %e, "speech playback failed to start");
            Some(UserEvent::EvalScript(format!(
                "__rs_showToast('{}')",
                escape_js(&e.to_string())
            )))
        }
    }
}

fn stop_speech(state: &mut ReaderState) {
    if state.speech_on {
        state.app.speech.stop();
        state.speech_on = false;
    }
}

/// Remounts the reader for the current article; falls back to the library
/// when nothing is open.
fn reload_reader(state: &ReaderState) -> Option<UserEvent> {
    match &state.current_article {
        Some(id) => Some(UserEvent::LoadUrl(format!("stash://localhost/read/{}", id))),
        None => Some(UserEvent::LoadUrl("stash://localhost/library".to_string())),
    }
}

fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', " ")
}

// ─── Main entry point ───

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir = crate::platform::get_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        warn!(error = %e, "data directory not created; using working directory");
    }
    let db_path = data_dir.join("readstash.db");
    let mut app = App::new(db_path.to_str().unwrap_or("readstash.db"))
        .expect("Failed to initialize ReadStash");
    app.startup();
    let prefs = app.initial_prefs();

    let state = Arc::new(Mutex::new(ReaderState {
        app,
        prefs,
        current_article: None,
        speech_on: false,
    }));

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title("ReadStash")
        .with_inner_size(tao::dpi::LogicalSize::new(1100.0, 800.0))
        .build(&event_loop)
        .expect("Failed to create window");

    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let protocol_state = state.clone();

    let builder = WebViewBuilder::new()
        .with_custom_protocol("stash".into(), move |_wv_id, request| {
            let path = request.uri().path().to_string();
            let s = protocol_state.lock().expect("reader state poisoned");
            let html = if let Some(id) = path.strip_prefix("/doc/") {
                doc_html(&s, id).unwrap_or_else(not_found_html)
            } else if let Some(id) = path.strip_prefix("/read/") {
                let conn = s.app.db.connection();
                let mgr = ArticleManager::new(conn);
                match mgr.get_article(id) {
                    Ok(article) => reader_html(&s, &article),
                    Err(_) => not_found_html(),
                }
            } else {
                // "/library", "/", and anything unknown
                library_html(&s)
            };
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(html.into_bytes().into())
                .unwrap()
        })
        // with_initialization_script runs on every http/https navigation
        // automatically but not on stash:// pages on Windows WebView2, so
        // the shell bootstrap is also inlined by shell_page().
        .with_initialization_script(SHELL_JS)
        .with_url("stash://localhost/library")
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let body = msg.body().as_str();
            let preview: String = body.chars().take(200).collect();
            debug!(ipc = %preview);
            let mut s = ipc_state.lock().expect("reader state poisoned");
            if let Some(event) = handle_ipc(&mut s, body) {
                let _ = ipc_proxy.send_event(event);
            }
        })
        .with_new_window_req_handler(move |_url, _features| {
            // The shell never opens external pages.
            wry::NewWindowResponse::Deny
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().expect("Failed to get GTK vbox");
        builder.build_gtk(vbox).expect("Failed to create WebView")
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window).expect("Failed to create WebView");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                let mut s = state.lock().expect("reader state poisoned");
                s.app.shutdown();
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::LoadUrl(url) => {
                    debug!(%url, "loading shell page");
                    let _ = webview.load_url(&url);
                }
                UserEvent::EvalScript(js) => {
                    let _ = webview.evaluate_script(&js);
                }
            },

            _ => {}
        }
    });
}
