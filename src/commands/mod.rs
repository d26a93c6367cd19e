// Command implementations behind the CLI

pub mod inspect;
pub mod install;
pub mod open;
pub mod prefs;
pub mod recents;
pub mod templates;
pub mod url;
pub mod versions;

use crate::config;
use crate::constants;
use crate::document::ConfigDocument;
use crate::history::{HistoryStore, native};
use crate::project;
use crate::runtime::VersionKey;
use std::path::Path;

/// History store for this machine's config and native history.
pub fn open_store() -> HistoryStore {
    HistoryStore::open(config::config_path(), native::for_host())
}

/// Accept `2023.12370` as shorthand for `TouchDesigner.2023.12370`.
pub fn parse_key(raw: &str) -> VersionKey {
    let key = VersionKey::new(raw.trim());
    if key.product().is_some() {
        key
    } else {
        VersionKey::for_product(constants::DESIGNER_PRODUCT, raw.trim())
    }
}

/// Whether `path` names a project file by extension.
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(constants::PROJECT_EXTENSION))
}

/// Extra lines shown under a listed project, per the display preferences.
pub fn entry_details(path: &str, document: &ConfigDocument) -> Vec<String> {
    let file = Path::new(path);
    let mut details = Vec::new();

    if !file.exists() {
        details.push("missing".to_string());
        return details;
    }

    if document.show_auxiliary_info {
        let modified = project::modified_time(file);
        if !modified.is_empty() {
            details.push(format!("modified {}", modified));
        }
        if let Some(summary) = project::summary(file) {
            details.push(summary);
        }
    }
    if document.show_icons
        && let Some(icon) = project::find_icon(file)
    {
        details.push(format!("icon {}", icon.display()));
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_adds_product() {
        assert_eq!(parse_key("2023.12370").as_str(), "TouchDesigner.2023.12370");
        assert_eq!(parse_key(" TouchPlayer.2023.1 ").as_str(), "TouchPlayer.2023.1");
        assert_eq!(parse_key("TouchDesigner.2023.1").as_str(), "TouchDesigner.2023.1");
    }

    #[test]
    fn test_is_project_file() {
        assert!(is_project_file(Path::new("/p/show.toe")));
        assert!(is_project_file(Path::new("/p/SHOW.TOE")));
        assert!(!is_project_file(Path::new("/p/show.tox")));
        assert!(!is_project_file(Path::new("/p/toe")));
    }

    #[test]
    fn test_missing_entries_are_flagged() {
        let document = ConfigDocument::default();
        assert_eq!(entry_details("/definitely/not/here.toe", &document), vec!["missing"]);
    }
}
