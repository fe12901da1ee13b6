// ReadStash services
// Services provide the reading pipeline and its supporting machinery:
// content normalization, theme resolution, reading-surface documents,
// highlight operations, extraction, speech, and settings.

pub mod extractor;
pub mod highlighter;
pub mod normalizer;
pub mod settings_engine;
pub mod speech;
pub mod surface;
pub mod theme_engine;

#[cfg(feature = "fetch")]
pub mod fetcher;
