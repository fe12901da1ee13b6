use std::fmt;

// === ArticleError ===

/// Errors related to article library operations.
#[derive(Debug)]
pub enum ArticleError {
    /// Article with the given ID was not found.
    NotFound(String),
    /// An article with the same URL is already saved.
    DuplicateUrl(String),
    /// The provided URL is empty or not http(s).
    InvalidUrl(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for ArticleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleError::NotFound(id) => write!(f, "Article not found: {}", id),
            ArticleError::DuplicateUrl(url) => write!(f, "Article already saved: {}", url),
            ArticleError::InvalidUrl(url) => write!(f, "Invalid article URL: {}", url),
            ArticleError::DatabaseError(msg) => {
                write!(f, "Article database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ArticleError {}

// === HighlightError ===

/// Errors related to highlight operations on serialized documents.
#[derive(Debug)]
pub enum HighlightError {
    /// The quoted text could not be located in the document.
    QuoteNotFound(String),
    /// The range does not denote a usable region of the document.
    InvalidRange(String),
    /// The selection range touches an existing highlight.
    OverlapsExisting,
    /// The selection range would split element markup.
    SplitsMarkup,
    /// No highlight exists at the given index.
    NotFound(usize),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::QuoteNotFound(quote) => {
                write!(f, "Text not found in article: {}", quote)
            }
            HighlightError::InvalidRange(msg) => write!(f, "Invalid highlight range: {}", msg),
            HighlightError::OverlapsExisting => {
                write!(f, "Selection overlaps an existing highlight")
            }
            HighlightError::SplitsMarkup => {
                write!(f, "Selection would split document markup")
            }
            HighlightError::NotFound(index) => write!(f, "No highlight at index: {}", index),
            HighlightError::DatabaseError(msg) => {
                write!(f, "Highlight database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HighlightError {}

// === ThemeError ===

/// Errors related to reader theme handling.
#[derive(Debug)]
pub enum ThemeError {
    /// The theme name is not one of light, sepia, or dark.
    UnknownTheme(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::UnknownTheme(name) => write!(f, "Unknown reader theme: {}", name),
        }
    }
}

impl std::error::Error for ThemeError {}

// === FetchError ===

/// Errors related to downloading page content.
#[derive(Debug)]
pub enum FetchError {
    /// The URL could not be parsed or is not http(s).
    InvalidUrl(String),
    /// A network error occurred during the request.
    NetworkError(String),
    /// The server responded with a non-success status code.
    BadStatus(u16),
    /// The response body was not text we can extract from.
    NotReadable(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl(url) => write!(f, "Invalid fetch URL: {}", url),
            FetchError::NetworkError(msg) => write!(f, "Fetch network error: {}", msg),
            FetchError::BadStatus(code) => write!(f, "Fetch failed with status: {}", code),
            FetchError::NotReadable(msg) => write!(f, "Fetch response not readable: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === SpeechError ===

/// Errors related to the speech playback controller.
#[derive(Debug)]
pub enum SpeechError {
    /// The synthesizer backend reported a failure.
    EngineFailure(String),
    /// A playback control was issued with nothing playing.
    NothingPlaying,
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::EngineFailure(msg) => write!(f, "Speech engine failure: {}", msg),
            SpeechError::NothingPlaying => write!(f, "No speech playback in progress"),
        }
    }
}

impl std::error::Error for SpeechError {}
