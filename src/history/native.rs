// Native history sources: the runtime's own recent-files list

use crate::config;
use crate::document::RecentEntry;
use crate::history::bookmark;
use crate::platform::HostPlatform;
use std::path::PathBuf;

/// How native entries are interleaved with launcher entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrder {
    /// The native list is read live, so it always leads.
    NativeFirst,
    /// The native list is a snapshot; launcher entries opened after the last
    /// companion sync go in front of it, older ones after it.
    SinceLastSync,
}

/// A read-mostly view of the runtime's own recent-files list.
pub trait NativeHistory {
    /// Entries straight from the native store, most recent first.
    fn read(&self) -> Vec<RecentEntry>;

    fn merge_order(&self) -> MergeOrder;

    /// Whether the companion-extension mirror in the config is part of the
    /// native list for this source.
    fn uses_config_mirror(&self) -> bool;

    /// Blank the native entry for `path` so the runtime forgets it too.
    /// Stores this process does not own report false.
    fn blank(&self, _path: &str) -> bool {
        false
    }

    /// Blank every native entry whose file no longer exists, returning how
    /// many were blanked.
    fn prune_missing(&self) -> usize {
        0
    }
}

/// The native source for the current host.
pub fn for_host() -> Box<dyn NativeHistory> {
    match HostPlatform::current() {
        HostPlatform::Windows => Box::new(RegistryHistory),
        HostPlatform::MacOs => Box::new(BookmarkHistory::new(config::bookmark_store_path())),
        HostPlatform::Other => Box::new(ConfigMirror),
    }
}

/// Hosts with no native store: the companion mirror is all there is.
pub struct ConfigMirror;

impl NativeHistory for ConfigMirror {
    fn read(&self) -> Vec<RecentEntry> {
        Vec::new()
    }

    fn merge_order(&self) -> MergeOrder {
        MergeOrder::NativeFirst
    }

    fn uses_config_mirror(&self) -> bool {
        true
    }
}

/// macOS shared file list. Reading it may need Full Disk Access, which a
/// packaged launcher usually lacks, so the companion mirror is merged in.
pub struct BookmarkHistory {
    store: Option<PathBuf>,
}

impl BookmarkHistory {
    pub fn new(store: Option<PathBuf>) -> Self {
        Self { store }
    }
}

impl NativeHistory for BookmarkHistory {
    fn read(&self) -> Vec<RecentEntry> {
        match &self.store {
            Some(store) => bookmark::read_store(store)
                .into_iter()
                .map(RecentEntry::native)
                .collect(),
            None => Vec::new(),
        }
    }

    fn merge_order(&self) -> MergeOrder {
        MergeOrder::SinceLastSync
    }

    fn uses_config_mirror(&self) -> bool {
        true
    }
}

/// Windows registry `fileN` values under HKCU.
pub struct RegistryHistory;

impl NativeHistory for RegistryHistory {
    fn read(&self) -> Vec<RecentEntry> {
        order_registry_values(registry::read_values())
            .into_iter()
            .map(RecentEntry::native)
            .collect()
    }

    fn merge_order(&self) -> MergeOrder {
        MergeOrder::NativeFirst
    }

    fn uses_config_mirror(&self) -> bool {
        false
    }

    fn blank(&self, path: &str) -> bool {
        registry::blank_matching(|value| crate::paths::same_file(value, path)) > 0
    }

    fn prune_missing(&self) -> usize {
        registry::blank_matching(|value| !std::path::Path::new(value).exists())
    }
}

/// Order registry `fileN` values by their numeric suffix (lower is more
/// recent), dropping other names and blanked slots. Names with a
/// non-numeric suffix sort last.
pub fn order_registry_values(values: Vec<(String, String)>) -> Vec<String> {
    let mut indexed: Vec<(u32, String)> = values
        .into_iter()
        .filter(|(name, value)| name.starts_with("file") && !value.trim().is_empty())
        .map(|(name, value)| {
            let index = name[4..].parse::<u32>().unwrap_or(9999);
            (index, value)
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, value)| value).collect()
}

#[cfg(windows)]
mod registry {
    use crate::constants;
    use log::debug;
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE};
    use winreg::types::FromRegValue;

    pub fn read_values() -> Vec<(String, String)> {
        let key = match RegKey::predef(HKEY_CURRENT_USER).open_subkey(constants::NATIVE_RECENTS_KEY) {
            Ok(key) => key,
            Err(e) => {
                debug!("Could not read native recent files from registry: {}", e);
                return Vec::new();
            }
        };

        key.enum_values()
            .filter_map(|entry| entry.ok())
            .filter_map(|(name, value)| String::from_reg_value(&value).ok().map(|v| (name, v)))
            .collect()
    }

    /// Set every `fileN` value whose path satisfies `matches` to an empty
    /// string. Slots are blanked, never deleted, so the runtime's numbering
    /// stays intact.
    pub fn blank_matching(matches: impl Fn(&str) -> bool) -> usize {
        let key = match RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(constants::NATIVE_RECENTS_KEY, KEY_READ | KEY_SET_VALUE)
        {
            Ok(key) => key,
            Err(e) => {
                debug!("Could not open native recent files for writing: {}", e);
                return 0;
            }
        };

        let targets: Vec<String> = key
            .enum_values()
            .filter_map(|entry| entry.ok())
            .filter_map(|(name, value)| String::from_reg_value(&value).ok().map(|v| (name, v)))
            .filter(|(name, value)| name.starts_with("file") && !value.trim().is_empty() && matches(value))
            .map(|(name, _)| name)
            .collect();

        let mut blanked = 0;
        for name in targets {
            match key.set_value(&name, &String::new()) {
                Ok(()) => {
                    debug!("Blanked registry entry {}", name);
                    blanked += 1;
                }
                Err(e) => debug!("Could not blank registry entry {}: {}", name, e),
            }
        }
        blanked
    }
}

#[cfg(not(windows))]
mod registry {
    pub fn read_values() -> Vec<(String, String)> {
        Vec::new()
    }

    pub fn blank_matching(_matches: impl Fn(&str) -> bool) -> usize {
        0
    }
}
