// Open command for launching a project in the right build

use crate::commands::inspect::{analyze, report_failure};
use crate::commands::{is_project_file, open_store, parse_key};
use crate::launch::{self, LaunchCommand};
use crate::prompt;
use crate::runtime::{InstalledVersion, Resolver, VersionKey};
use crate::ui;
use log::debug;
use std::path::Path;

pub async fn open(
    file: &Path,
    version: Option<String>,
    player: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("Project file not found: {}", file.display());
    }
    if !is_project_file(file) {
        anyhow::bail!("{} is not a .toe project", file.display());
    }

    let resolver = Resolver::from_env();
    if resolver.installations().designers.is_empty() {
        anyhow::bail!("No TouchDesigner builds are installed");
    }

    let designer = match version {
        Some(raw) => {
            let key = parse_key(&raw);
            resolver
                .installed(&key)
                .filter(|v| !v.key.is_player())
                .ok_or_else(|| anyhow::anyhow!("{} is not installed. Run 'tdl versions' to list builds.", key))?
        }
        None => select_for_project(&resolver, file).await?,
    };

    let target = if player {
        resolver.player_for(&designer.key).ok_or_else(|| {
            anyhow::anyhow!("TouchPlayer {} is not installed", designer.key.numeric())
        })?
    } else {
        designer
    };

    let command = LaunchCommand::new(target, file, resolver.platform());
    if dry_run {
        ui::status("[DRY RUN]", &format!("Would run {}", command.display()));
        return Ok(());
    }

    launch::launch(target, file, resolver.platform())?;
    ui::success(&format!(
        "Opened {} in {}",
        crate::paths::display_name(&file.to_string_lossy()),
        target.key
    ));

    let mut store = open_store();
    store.add_recent_file(file);
    Ok(())
}

/// Build the project asks for, or the closest one when it is missing.
/// When the project cannot be inspected the user picks from the installed
/// builds.
async fn select_for_project<'a>(
    resolver: &'a Resolver,
    file: &Path,
) -> anyhow::Result<&'a InstalledVersion> {
    let required = match analyze(resolver, file).await {
        Ok(key) => key,
        Err(e) => {
            report_failure(&e);
            return choose_manually(resolver);
        }
    };

    if let Some(exact) = resolver.installed(&required) {
        return Ok(exact);
    }

    let best = resolver
        .best_match(&required)
        .ok_or_else(|| anyhow::anyhow!("No TouchDesigner builds are installed"))?;
    ui::warning(&format!(
        "{} is not installed, using {} instead",
        required, best.key
    ));
    ui::dim(&format!("  Install it with: tdl install {}", required));
    Ok(best)
}

fn choose_manually(resolver: &Resolver) -> anyhow::Result<&InstalledVersion> {
    let keys: Vec<VersionKey> = resolver.sorted_version_keys();
    let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    // Newest first is the natural default
    let default = labels.len().saturating_sub(1);

    let index = prompt::select("Choose a TouchDesigner build", &labels, default)
        .ok_or_else(|| anyhow::anyhow!("No build selected. Pass --version to choose one."))?;
    debug!("Manually selected {}", labels[index]);

    resolver
        .installed(&keys[index])
        .ok_or_else(|| anyhow::anyhow!("{} is no longer installed", keys[index]))
}
