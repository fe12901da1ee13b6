use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ThemeError;

/// Smallest selectable reader font size, in CSS pixels.
pub const MIN_FONT_SIZE: u32 = 12;
/// Largest selectable reader font size, in CSS pixels.
pub const MAX_FONT_SIZE: u32 = 32;
/// Increment applied by the font stepper controls.
pub const FONT_SIZE_STEP: u32 = 2;

/// Reader color theme selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReaderTheme {
    Light,
    Sepia,
    Dark,
}

impl ReaderTheme {
    /// All themes in the order the selector presents them.
    pub fn all() -> [ReaderTheme; 3] {
        [ReaderTheme::Light, ReaderTheme::Sepia, ReaderTheme::Dark]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderTheme::Light => "light",
            ReaderTheme::Sepia => "sepia",
            ReaderTheme::Dark => "dark",
        }
    }
}

impl Default for ReaderTheme {
    fn default() -> Self {
        ReaderTheme::Light
    }
}

impl fmt::Display for ReaderTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReaderTheme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ReaderTheme::Light),
            "sepia" => Ok(ReaderTheme::Sepia),
            "dark" => Ok(ReaderTheme::Dark),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }
}

/// Complete color palette for one reader theme.
///
/// Every field is populated for every theme; resolution is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
    pub header_background: &'static str,
    pub selection_background: &'static str,
    pub selection_text: &'static str,
    pub highlight_button_background: &'static str,
    pub highlight_button_text: &'static str,
    pub saved_highlight_background: &'static str,
}

/// Per-session reading preferences.
///
/// Settings supply the initial values; in-session stepper changes are
/// transient and never written back automatically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReaderPrefs {
    pub theme: ReaderTheme,
    pub font_size_px: u32,
}

impl ReaderPrefs {
    pub fn new(theme: ReaderTheme, font_size_px: u32) -> Self {
        Self {
            theme,
            font_size_px: font_size_px.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
        }
    }

    /// Steps the font size up, saturating at the maximum.
    pub fn increase_font(&mut self) {
        self.font_size_px = (self.font_size_px + FONT_SIZE_STEP).min(MAX_FONT_SIZE);
    }

    /// Steps the font size down, saturating at the minimum.
    pub fn decrease_font(&mut self) {
        self.font_size_px = self.font_size_px.saturating_sub(FONT_SIZE_STEP).max(MIN_FONT_SIZE);
    }

    pub fn can_increase(&self) -> bool {
        self.font_size_px < MAX_FONT_SIZE
    }

    pub fn can_decrease(&self) -> bool {
        self.font_size_px > MIN_FONT_SIZE
    }
}

impl Default for ReaderPrefs {
    fn default() -> Self {
        Self {
            theme: ReaderTheme::default(),
            font_size_px: 18,
        }
    }
}

/// Inputs for building one reading-surface document.
#[derive(Debug, Clone)]
pub struct DocumentParams<'a> {
    /// Title rendered as the document heading; `None` omits the heading.
    pub title: Option<&'a str>,
    /// Inner HTML of the content root. Must already be normalized.
    pub body_html: &'a str,
    pub theme: ReaderTheme,
    pub font_size_px: u32,
}
