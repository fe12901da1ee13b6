// ReadStash platform paths for Linux
// Config: ~/.config/readstash
// Data:   ~/.local/share/readstash
// Cache:  ~/.cache/readstash

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for ReadStash on Linux.
/// Uses `$XDG_CONFIG_HOME/readstash` if set, otherwise `~/.config/readstash`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("readstash")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("readstash")
    }
}

/// Returns the data directory for ReadStash on Linux.
/// Uses `$XDG_DATA_HOME/readstash` if set, otherwise `~/.local/share/readstash`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("readstash")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("readstash")
    }
}

/// Returns the cache directory for ReadStash on Linux.
/// Uses `$XDG_CACHE_HOME/readstash` if set, otherwise `~/.cache/readstash`.
pub fn get_cache_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("readstash")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".cache").join("readstash")
    }
}
