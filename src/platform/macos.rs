// ReadStash platform paths for macOS
// Config: ~/Library/Application Support/ReadStash
// Data:   ~/Library/Application Support/ReadStash
// Cache:  ~/Library/Caches/ReadStash

use std::env;
use std::path::PathBuf;

/// Returns the home directory on macOS.
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for ReadStash on macOS.
/// `~/Library/Application Support/ReadStash`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("ReadStash")
}

/// Returns the data directory for ReadStash on macOS.
/// `~/Library/Application Support/ReadStash`
pub fn get_data_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("ReadStash")
}

/// Returns the cache directory for ReadStash on macOS.
/// `~/Library/Caches/ReadStash`
pub fn get_cache_dir() -> PathBuf {
    home_dir().join("Library").join("Caches").join("ReadStash")
}
