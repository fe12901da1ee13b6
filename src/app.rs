//! App core for ReadStash.
//!
//! Central struct holding the database handle and long-lived services,
//! managing application lifecycle.

use std::sync::Arc;

use tracing::info;

use crate::database::connection::Database;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::speech::{NullSynthesizer, SpeechController};
use crate::types::reader::ReaderPrefs;

/// Central application struct holding the database and long-lived services.
///
/// `ArticleManager` and `HighlightStore` are created on demand via
/// `db.connection()` because they borrow the connection with a lifetime
/// parameter.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub speech: SpeechController<NullSynthesizer>,
}

impl App {
    /// Creates a new App, opening the database and loading settings.
    ///
    /// `ArticleManager` and `HighlightStore` are not stored directly because
    /// they borrow `&Connection` with a lifetime. Use `db.connection()` to
    /// create them on demand via `ArticleManager::new(app.db.connection())`.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);

        let mut settings_engine = SettingsEngine::new(None);
        let _ = settings_engine.load();

        let speech = SpeechController::new(NullSynthesizer::new());

        Ok(Self {
            db,
            settings_engine,
            speech,
        })
    }

    /// Reading preferences for a freshly opened article: the settings file
    /// supplies the starting theme and font size; stepper changes made
    /// while reading stay in the session.
    pub fn initial_prefs(&self) -> ReaderPrefs {
        self.settings_engine.get_settings().initial_prefs()
    }

    /// Startup sequence: reload settings from disk and log the state.
    pub fn startup(&mut self) {
        let _ = self.settings_engine.load();
        let settings = self.settings_engine.get_settings();
        info!(
            theme = %settings.reader.theme,
            font_size_px = settings.reader.font_size_px,
            speech_enabled = settings.speech.enabled,
            "readstash started"
        );
    }

    /// Shutdown sequence: stop any read-aloud playback.
    pub fn shutdown(&mut self) {
        self.speech.stop();
        info!("readstash shut down");
    }
}
