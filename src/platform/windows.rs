// ReadStash platform paths for Windows
// Config: %APPDATA%/ReadStash
// Data:   %APPDATA%/ReadStash
// Cache:  %LOCALAPPDATA%/ReadStash/cache

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for ReadStash on Windows.
/// `%APPDATA%/ReadStash`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ReadStash")
}

/// Returns the data directory for ReadStash on Windows.
/// `%APPDATA%/ReadStash`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ReadStash")
}

/// Returns the cache directory for ReadStash on Windows.
/// `%LOCALAPPDATA%/ReadStash/cache`
pub fn get_cache_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata)
        .join("ReadStash")
        .join("cache")
}
