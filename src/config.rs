// Config module for shared path and environment utilities

use crate::constants;
use crate::platform::HostPlatform;
use std::path::PathBuf;

/// Directory holding `config.json`.
///
/// `TDL_CONFIG_DIR` wins when set. Otherwise the location matches what the
/// in-runtime companion extension writes to, so both sides share one file.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TDL_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    match HostPlatform::current() {
        HostPlatform::Windows => dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("TD Launcher Plus"),
        HostPlatform::MacOs => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("td-launcher"),
        HostPlatform::Other => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("td-launcher"),
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join(constants::CONFIG_FILE)
}

/// Applications directory to scan for runtime bundles, if bundle discovery
/// applies on this host.
pub fn applications_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TDL_APPLICATIONS_DIR") {
        return Some(PathBuf::from(dir));
    }
    match HostPlatform::current() {
        HostPlatform::MacOs => Some(PathBuf::from(constants::MAC_APPLICATIONS_DIR)),
        _ => None,
    }
}

/// Explicit inspection tool path, bypassing per-platform lookup.
pub fn inspector_override() -> Option<PathBuf> {
    std::env::var("TDL_TOEEXPAND").ok().map(PathBuf::from)
}

/// Location of the macOS shared file list for the runtime's recent documents.
pub fn bookmark_store_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TDL_BOOKMARK_STORE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(constants::BOOKMARK_STORE))
}
