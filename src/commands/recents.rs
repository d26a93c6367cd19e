// Recents command for listing and pruning project history

use crate::cli::RecentsAction;
use crate::commands::{entry_details, open_store};
use crate::document::EntrySource;
use crate::history::HistoryStore;
use crate::paths;
use crate::prompt;
use crate::ui;
use std::path::Path;

pub fn recents(action: Option<RecentsAction>, local: bool) -> anyhow::Result<()> {
    let mut store = open_store();

    match action {
        None => list(&store, local),
        Some(RecentsAction::Remove { path, yes }) => remove(&mut store, &path, yes),
        Some(RecentsAction::Clean) => {
            let removed = store.clear_missing_files();
            if removed == 0 {
                ui::success("No missing files in history");
            } else {
                ui::success(&format!("Removed {} missing file(s)", removed));
            }
            Ok(())
        }
        Some(RecentsAction::Clear { yes }) => {
            if !yes && !prompt::confirm("Clear all recent projects?", false) {
                ui::dim("Cancelled");
                return Ok(());
            }
            store.clear_recents();
            ui::success("Cleared recent projects");
            Ok(())
        }
    }
}

fn source_tag(source: EntrySource) -> &'static str {
    match source {
        EntrySource::Launcher => "launcher",
        EntrySource::Native => "td",
        EntrySource::Legacy => "legacy",
    }
}

fn list(store: &HistoryStore, local: bool) -> anyhow::Result<()> {
    let document = store.document();
    let entries = if local {
        store.reconciled_recents(false)
    } else {
        store.recents()
    };

    if entries.is_empty() {
        ui::dim("No recent projects");
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        ui::list_item(
            i + 1,
            source_tag(entry.source),
            &entry.path,
            &entry_details(&entry.path, document),
        );
    }
    Ok(())
}

/// Remove with the three-way confirmation unless the user has turned it off.
fn remove(store: &mut HistoryStore, path: &Path, yes: bool) -> anyhow::Result<()> {
    let target = paths::absolute_string(path);
    let listed = store
        .reconciled_recents(true)
        .iter()
        .any(|entry| paths::same_file(&entry.path, &target));
    if !listed {
        anyhow::bail!("{} is not in the recent projects", path.display());
    }

    if !yes && store.document().confirm_removal {
        let (confirmed, suppress) = prompt::confirm_removal(&paths::display_name(&target)).outcome();
        if !confirmed {
            if !ui::is_tty() {
                ui::dim("Cancelled (pass --yes to remove without a prompt)");
            } else {
                ui::dim("Cancelled");
            }
            return Ok(());
        }
        if suppress {
            store.set_confirm_removal(false);
        }
    }

    store.remove_recent_file(path);
    ui::success(&format!("Removed {}", target));
    Ok(())
}
