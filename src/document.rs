// Configuration document shared with the companion extension

use crate::constants;
use crate::paths;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Unix epoch seconds. Stored as a JSON number because the companion
/// extension writes `time.time()` values into the same file.
pub type Timestamp = f64;

pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Key older releases used for the launcher history.
const LEGACY_RECENTS_KEY: &str = "recent_files";
const RECENTS_KEY: &str = "launcher_recents";

/// Where a history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntrySource {
    #[serde(rename = "launcher")]
    Launcher,
    #[serde(rename = "td")]
    Native,
    #[serde(rename = "legacy")]
    Legacy,
}

impl EntrySource {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("launcher") => EntrySource::Launcher,
            Some("td") | Some("native") => EntrySource::Native,
            _ => EntrySource::Legacy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecentEntry")]
pub struct RecentEntry {
    pub path: String,
    pub source: EntrySource,
    #[serde(rename = "last_opened", skip_serializing_if = "Option::is_none")]
    pub last_opened_at: Option<Timestamp>,
}

impl RecentEntry {
    pub fn launcher(path: impl Into<String>, opened_at: Timestamp) -> Self {
        Self {
            path: path.into(),
            source: EntrySource::Launcher,
            last_opened_at: Some(opened_at),
        }
    }

    pub fn native(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: EntrySource::Native,
            last_opened_at: None,
        }
    }
}

/// Entries have been written both as bare path strings and as records,
/// depending on which release or extension wrote them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecentEntry {
    Path(String),
    Record {
        path: String,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        last_opened: Option<Timestamp>,
    },
}

impl From<RawRecentEntry> for RecentEntry {
    fn from(raw: RawRecentEntry) -> Self {
        match raw {
            RawRecentEntry::Path(path) => RecentEntry {
                path,
                source: EntrySource::Legacy,
                last_opened_at: None,
            },
            RawRecentEntry::Record {
                path,
                source,
                last_opened,
            } => RecentEntry {
                path,
                source: EntrySource::from_tag(source.as_deref()),
                last_opened_at: last_opened,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTemplateEntry")]
pub struct TemplateEntry {
    pub path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<Timestamp>,
}

impl TemplateEntry {
    pub fn new(path: impl Into<String>, name: Option<String>, added_at: Timestamp) -> Self {
        let path = path.into();
        let name = name.unwrap_or_else(|| paths::file_stem(&path));
        Self {
            path,
            name,
            added_at: Some(added_at),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTemplateEntry {
    Path(String),
    Record {
        path: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        added_at: Option<Timestamp>,
    },
}

impl From<RawTemplateEntry> for TemplateEntry {
    fn from(raw: RawTemplateEntry) -> Self {
        match raw {
            RawTemplateEntry::Path(path) => TemplateEntry {
                name: paths::file_stem(&path),
                path,
                added_at: None,
            },
            RawTemplateEntry::Record {
                path,
                name,
                added_at,
            } => TemplateEntry {
                name: name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| paths::file_stem(&path)),
                path,
                added_at,
            },
        }
    }
}

/// The whole persisted configuration. Every field is optional on disk and
/// backfilled from the defaults; keys this release does not know about are
/// carried through untouched.
///
/// Keys are decoded one at a time, so a bad value only costs that key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDocument {
    #[serde(rename = "version")]
    pub schema_version: u32,
    pub launcher_recents: Vec<RecentEntry>,
    #[serde(rename = "td_recents")]
    pub native_recents: Vec<RecentEntry>,
    #[serde(rename = "td_recents_timestamp")]
    pub native_recents_synced_at: Timestamp,
    pub templates: Vec<TemplateEntry>,
    pub max_recent_files: usize,
    #[serde(rename = "confirm_remove_from_list")]
    pub confirm_removal: bool,
    pub show_icons: bool,
    #[serde(rename = "show_readme")]
    pub show_auxiliary_info: bool,
    #[serde(rename = "show_full_history")]
    pub show_merged_history: bool,
    pub has_prompted_file_assoc: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            schema_version: constants::SCHEMA_VERSION,
            launcher_recents: Vec::new(),
            native_recents: Vec::new(),
            native_recents_synced_at: 0.0,
            templates: Vec::new(),
            max_recent_files: constants::DEFAULT_MAX_RECENT_FILES,
            confirm_removal: true,
            show_icons: false,
            show_auxiliary_info: false,
            show_merged_history: true,
            has_prompted_file_assoc: false,
            extra: Map::new(),
        }
    }
}

impl ConfigDocument {
    /// Read the document at `path`, never failing.
    ///
    /// A missing, unreadable, or malformed file yields the defaults: a broken
    /// config must not stop anyone from launching a project.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Self::from_json(&text))
        {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    "Could not read config {}: {}. Using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Parse a document, applying the `recent_files` → `launcher_recents`
    /// migration before decoding.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let mut value: Value = serde_json::from_str(text)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Config root is not a JSON object"))?;

        if object.contains_key(LEGACY_RECENTS_KEY) && !object.contains_key(RECENTS_KEY) {
            if let Some(legacy) = object.remove(LEGACY_RECENTS_KEY) {
                debug!("Migrating '{}' to '{}'", LEGACY_RECENTS_KEY, RECENTS_KEY);
                object.insert(RECENTS_KEY.to_string(), legacy);
            }
        }

        Ok(Self::from_object(std::mem::take(object)))
    }

    fn from_object(mut object: Map<String, Value>) -> Self {
        let mut document = Self::default();

        take_value(&mut object, "version", &mut document.schema_version);
        take_list(&mut object, RECENTS_KEY, &mut document.launcher_recents);
        take_list(&mut object, "td_recents", &mut document.native_recents);
        take_value(
            &mut object,
            "td_recents_timestamp",
            &mut document.native_recents_synced_at,
        );
        take_list(&mut object, "templates", &mut document.templates);
        take_value(&mut object, "max_recent_files", &mut document.max_recent_files);
        take_value(
            &mut object,
            "confirm_remove_from_list",
            &mut document.confirm_removal,
        );
        take_value(&mut object, "show_icons", &mut document.show_icons);
        take_value(&mut object, "show_readme", &mut document.show_auxiliary_info);
        take_value(
            &mut object,
            "show_full_history",
            &mut document.show_merged_history,
        );
        take_value(
            &mut object,
            "has_prompted_file_assoc",
            &mut document.has_prompted_file_assoc,
        );

        document.extra = object;
        document
    }

    /// Write the document as pretty-printed JSON, creating the directory if
    /// needed. Returns false on any failure; nothing is retried.
    pub fn save(&self, path: &Path) -> bool {
        match self.write(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save config {}: {}", path.display(), e);
                false
            }
        }
    }

    fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Replace `slot` with the decoded value of `key`, keeping the default when
/// the value has the wrong shape.
fn take_value<T: DeserializeOwned>(object: &mut Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = object.remove(key) else {
        return;
    };
    match serde_json::from_value(value) {
        Ok(decoded) => *slot = decoded,
        Err(e) => warn!("Ignoring config key '{}': {}", key, e),
    }
}

/// Decode a list entry by entry; entries that do not decode are dropped.
fn take_list<T: DeserializeOwned>(object: &mut Map<String, Value>, key: &str, slot: &mut Vec<T>) {
    let items = match object.remove(key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!("Ignoring config key '{}': expected a list, found {}", key, other);
            return;
        }
        None => return,
    };

    *slot = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed entry in '{}': {}", key, e);
                None
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let doc = ConfigDocument::load(&dir.path().join("config.json"));
        assert_eq!(doc, ConfigDocument::default());
        assert_eq!(doc.max_recent_files, 33);
        assert!(doc.confirm_removal);
        assert!(doc.show_merged_history);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigDocument::load(&path), ConfigDocument::default());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert_eq!(ConfigDocument::load(&path), ConfigDocument::default());
    }

    #[test]
    fn test_legacy_recent_files_migrate() {
        let text = r#"{"recent_files": ["/a/one.toe", {"path": "/a/two.toe", "last_opened": 12.5}]}"#;
        let doc = ConfigDocument::from_json(text).unwrap();

        assert_eq!(doc.launcher_recents.len(), 2);
        assert_eq!(doc.launcher_recents[0].path, "/a/one.toe");
        assert_eq!(doc.launcher_recents[0].source, EntrySource::Legacy);
        assert_eq!(doc.launcher_recents[1].path, "/a/two.toe");
        assert_eq!(doc.launcher_recents[1].last_opened_at, Some(12.5));
        assert!(!doc.extra.contains_key("recent_files"));

        let saved = serde_json::to_value(&doc).unwrap();
        assert!(saved.get("recent_files").is_none());
        assert!(saved.get("launcher_recents").is_some());
    }

    #[test]
    fn test_legacy_key_ignored_when_new_key_present() {
        let text = r#"{"recent_files": ["/old.toe"], "launcher_recents": ["/new.toe"]}"#;
        let doc = ConfigDocument::from_json(text).unwrap();
        assert_eq!(doc.launcher_recents.len(), 1);
        assert_eq!(doc.launcher_recents[0].path, "/new.toe");
        // Left in place, carried through as an unknown key
        assert!(doc.extra.contains_key("recent_files"));
    }

    #[test]
    fn test_partial_document_backfills_defaults() {
        let text = r#"{"max_recent_files": 5, "show_icons": true, "td_recents_timestamp": 100}"#;
        let doc = ConfigDocument::from_json(text).unwrap();
        assert_eq!(doc.max_recent_files, 5);
        assert!(doc.show_icons);
        assert_eq!(doc.native_recents_synced_at, 100.0);
        assert!(doc.confirm_removal);
        assert!(doc.templates.is_empty());
    }

    #[test]
    fn test_entry_sources_decode() {
        let text = r#"{
            "launcher_recents": [{"path": "/a.toe", "source": "launcher", "last_opened": 1.0}],
            "td_recents": ["/b.toe", {"path": "/c.toe", "source": "td"}, {"path": "/d.toe", "source": "other"}]
        }"#;
        let doc = ConfigDocument::from_json(text).unwrap();
        assert_eq!(doc.launcher_recents[0].source, EntrySource::Launcher);
        assert_eq!(doc.native_recents[0].source, EntrySource::Legacy);
        assert_eq!(doc.native_recents[1].source, EntrySource::Native);
        assert_eq!(doc.native_recents[2].source, EntrySource::Legacy);
    }

    #[test]
    fn test_template_entries_decode() {
        let text = r#"{"templates": ["/t/Base.toe", {"path": "/t/Grid.toe", "name": "Grid layout"}]}"#;
        let doc = ConfigDocument::from_json(text).unwrap();
        assert_eq!(doc.templates[0].name, "Base");
        assert_eq!(doc.templates[0].added_at, None);
        assert_eq!(doc.templates[1].name, "Grid layout");
    }

    #[test]
    fn test_bad_values_only_cost_their_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let text = r#"{
            "launcher_recents": ["/a/one.toe", 42, {"name": "no path"}, "/a/two.toe"],
            "templates": [{"path": "/t/Base.toe"}],
            "max_recent_files": null,
            "td_recents_timestamp": null,
            "show_icons": "yes",
            "td_recents": {"not": "a list"},
            "window": {"w": 960}
        }"#;
        fs::write(&path, text).unwrap();

        let doc = ConfigDocument::load(&path);
        let recents: Vec<&str> = doc.launcher_recents.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(recents, vec!["/a/one.toe", "/a/two.toe"]);
        assert_eq!(doc.templates.len(), 1);
        assert_eq!(doc.max_recent_files, constants::DEFAULT_MAX_RECENT_FILES);
        assert_eq!(doc.native_recents_synced_at, 0.0);
        assert!(!doc.show_icons);
        assert!(doc.native_recents.is_empty());
        assert!(doc.extra.contains_key("window"));
        assert!(!doc.extra.contains_key("max_recent_files"));

        // Saving keeps what was recovered
        assert!(doc.save(&path));
        let reloaded = ConfigDocument::load(&path);
        assert_eq!(reloaded.launcher_recents.len(), 2);
        assert_eq!(reloaded.max_recent_files, constants::DEFAULT_MAX_RECENT_FILES);
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let doc = ConfigDocument::from_json(r#"{"window": {"w": 960}}"#).unwrap();

        assert!(doc.save(&path));
        let reloaded = ConfigDocument::load(&path);
        assert_eq!(reloaded.extra.get("window"), doc.extra.get("window"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"version\": 1"));
        assert!(text.contains("\"confirm_remove_from_list\": true"));
    }

    #[test]
    fn test_save_failure_returns_false() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let doc = ConfigDocument::default();
        assert!(!doc.save(&blocker.join("config.json")));
    }
}
