// Templates command for managing starter projects

use crate::cli::TemplatesAction;
use crate::commands::{entry_details, is_project_file, open_store};
use crate::history::HistoryStore;
use crate::paths;
use crate::prompt;
use crate::ui;
use std::path::Path;

pub fn templates(action: Option<TemplatesAction>) -> anyhow::Result<()> {
    let mut store = open_store();

    match action {
        None => list(&store),
        Some(TemplatesAction::Add { path, name }) => {
            if !path.exists() {
                anyhow::bail!("Project file not found: {}", path.display());
            }
            if !is_project_file(&path) {
                anyhow::bail!("{} is not a .toe project", path.display());
            }
            if store.add_template(&path, name) {
                ui::success(&format!("Added template {}", paths::absolute_string(&path)));
            } else {
                ui::warning(&format!("{} is already a template", path.display()));
            }
            Ok(())
        }
        Some(TemplatesAction::Remove { path, yes }) => remove(&mut store, &path, yes),
        Some(TemplatesAction::Up { path }) => {
            moved(store.move_template_up(&path), &path)?;
            list(&store)
        }
        Some(TemplatesAction::Down { path }) => {
            moved(store.move_template_down(&path), &path)?;
            list(&store)
        }
    }
}

fn moved(found: bool, path: &Path) -> anyhow::Result<()> {
    if !found {
        anyhow::bail!("{} is not a template", path.display());
    }
    Ok(())
}

fn list(store: &HistoryStore) -> anyhow::Result<()> {
    let templates = store.templates();
    if templates.is_empty() {
        ui::dim("No templates. Add one with 'tdl templates add PATH'");
        return Ok(());
    }

    for (i, template) in templates.iter().enumerate() {
        let mut details = vec![template.path.clone()];
        details.extend(entry_details(&template.path, store.document()));
        ui::list_item(i + 1, "template", &template.name, &details);
    }
    Ok(())
}

fn remove(store: &mut HistoryStore, path: &Path, yes: bool) -> anyhow::Result<()> {
    let target = paths::absolute_string(path);
    if !store
        .templates()
        .iter()
        .any(|t| paths::same_file(&t.path, &target))
    {
        anyhow::bail!("{} is not a template", path.display());
    }

    if !yes && store.document().confirm_removal {
        let (confirmed, suppress) = prompt::confirm_removal(&paths::display_name(&target)).outcome();
        if !confirmed {
            ui::dim("Cancelled");
            return Ok(());
        }
        if suppress {
            store.set_confirm_removal(false);
        }
    }

    store.remove_template(path);
    ui::success(&format!("Removed template {}", target));
    Ok(())
}
