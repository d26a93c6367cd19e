// Prefs command for showing and changing preferences

use crate::commands::open_store;
use crate::config;
use crate::ui;

#[derive(Debug, Default)]
pub struct PrefChanges {
    pub max_recent: Option<usize>,
    pub confirm_removal: Option<bool>,
    pub merged_history: Option<bool>,
    pub show_icons: Option<bool>,
    pub show_info: Option<bool>,
}

pub fn prefs(changes: PrefChanges) -> anyhow::Result<()> {
    let mut store = open_store();

    if let Some(max) = changes.max_recent {
        if max == 0 {
            anyhow::bail!("--max-recent must be at least 1");
        }
        store.set_max_recent_files(max);
    }
    if let Some(value) = changes.confirm_removal {
        store.set_confirm_removal(value);
    }
    if let Some(value) = changes.merged_history {
        store.set_show_merged_history(value);
    }
    if let Some(value) = changes.show_icons {
        store.set_show_icons(value);
    }
    if let Some(value) = changes.show_info {
        store.set_show_auxiliary_info(value);
    }

    let document = store.document();
    ui::header(&format!("Preferences ({})", config::config_path().display()));
    ui::field("max-recent", &document.max_recent_files.to_string());
    ui::field("confirm-removal", &document.confirm_removal.to_string());
    ui::field("merged-history", &document.show_merged_history.to_string());
    ui::field("show-icons", &document.show_icons.to_string());
    ui::field("show-info", &document.show_auxiliary_info.to_string());
    Ok(())
}
