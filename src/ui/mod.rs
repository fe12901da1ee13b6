//! ReadStash UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2 (Chromium-based)
//! - Linux: WebKitGTK (non-Chromium)
//! - macOS: WKWebView (WebKit, non-Chromium)
//!
//! The library and reader chrome are rendered as HTML/CSS/JS inside the
//! WebView; the article itself lives in a nested, isolated surface frame.
//! Communication between the Rust backend and JS frontend uses wry IPC.

pub mod webview_app;
