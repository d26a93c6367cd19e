// Constants module for shared string constants

pub const CONFIG_FILE: &str = "config.json";
pub const PROJECT_EXTENSION: &str = "toe";

pub const DESIGNER_PRODUCT: &str = "TouchDesigner";
pub const PLAYER_PRODUCT: &str = "TouchPlayer";

pub const DOWNLOAD_BASE_URL: &str = "https://download.derivative.ca";

/// Schema version written into new configuration documents.
pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_MAX_RECENT_FILES: usize = 33;

/// Seconds between installed-version rescans while an installer is running.
pub const INSTALL_POLL_SECS: u64 = 3;

/// Registry key holding the runtime's own recent-files list (HKCU).
#[cfg_attr(not(windows), allow(dead_code))]
pub const NATIVE_RECENTS_KEY: &str = r"Software\Derivative\recent files";
/// Registry key prefix for installed products (HKLM), product name appended.
#[cfg_attr(not(windows), allow(dead_code))]
pub const INSTALLS_KEY: &str = r"SOFTWARE\Derivative";

/// Shared file list written by macOS for the runtime's recent documents.
pub const BOOKMARK_STORE: &str = "Library/Application Support/com.apple.sharedfilelist/com.apple.LSSharedFileList.ApplicationRecentDocuments/ca.derivative.touchdesigner.sfl4";
pub const MAC_APPLICATIONS_DIR: &str = "/Applications";
