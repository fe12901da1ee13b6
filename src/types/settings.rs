use serde::{Deserialize, Serialize};

use super::reader::{ReaderPrefs, ReaderTheme, MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Top-level application settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StashSettings {
    pub general: GeneralSettings,
    pub reader: ReaderSettings,
    pub speech: SpeechSettings,
}

impl Default for StashSettings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            reader: ReaderSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl StashSettings {
    /// Initial reading preferences for a newly opened article.
    ///
    /// Stepper and theme changes made while reading stay in-session; they
    /// are not written back here.
    pub fn initial_prefs(&self) -> ReaderPrefs {
        ReaderPrefs::new(self.reader.theme, self.reader.font_size_px)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub language: String,
    /// Overrides the platform data directory when set.
    pub data_dir_override: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            data_dir_override: None,
        }
    }
}

/// Default appearance of the reading surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReaderSettings {
    pub theme: ReaderTheme,
    pub font_size_px: u32,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            theme: ReaderTheme::Light,
            font_size_px: 18,
        }
    }
}

impl ReaderSettings {
    /// Whether the stored font size is inside the selectable range.
    pub fn font_size_valid(&self) -> bool {
        (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size_px)
    }
}

/// Read-aloud settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub words_per_minute: u32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            words_per_minute: 180,
        }
    }
}
