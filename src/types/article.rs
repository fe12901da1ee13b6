use serde::{Deserialize, Serialize};

/// A saved article in the library.
///
/// `content` always holds the plain-text body and is the rendering fallback;
/// `html_content` takes precedence when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub html_content: Option<String>,
    pub site_name: Option<String>,
    pub estimated_read_time_minutes: u32,
    pub archived: bool,
    pub saved_at: i64,
    pub last_opened_at: Option<i64>,
    pub open_count: i64,
}

/// Input payload for saving an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
}

/// Content pulled out of a fetched page, ready to become an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    /// Inner HTML of the detected content region.
    pub content_html: String,
    /// Tag-stripped text of the content region.
    pub text_content: String,
    pub site_name: Option<String>,
    pub estimated_read_time_minutes: u32,
}

impl Article {
    /// Body the reading surface should render when no highlighted
    /// version has been persisted.
    pub fn display_body(&self) -> &str {
        match &self.html_content {
            Some(html) if !html.trim().is_empty() => html,
            _ => &self.content,
        }
    }

    /// Whether the stored body is already HTML rather than plain text.
    pub fn has_html_body(&self) -> bool {
        matches!(&self.html_content, Some(html) if !html.trim().is_empty())
    }
}
