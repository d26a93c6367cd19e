// Inspect command for reporting which build a project needs

use crate::commands::is_project_file;
use crate::project;
use crate::runtime::analysis::{Analysis, AnalysisStatus};
use crate::runtime::{InspectError, Resolver, VersionKey};
use crate::ui;
use log::debug;
use std::path::Path;
use std::time::Duration;

/// Run the inspection tool in the background while a spinner turns.
pub async fn analyze(resolver: &Resolver, file: &Path) -> Result<VersionKey, InspectError> {
    let name = crate::paths::display_name(&file.to_string_lossy());
    let pb = ui::spinner(&format!("Analyzing {}...", name));

    let analysis = Analysis::new(resolver.inspector().clone());
    analysis.request(file.to_path_buf());

    let required = loop {
        if analysis.status() == AnalysisStatus::Ready
            && let Some(result) = analysis.take_result()
        {
            debug!("Analysis {} finished for {}", result.generation, result.path.display());
            break result.required;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    };

    match &required {
        Ok(key) => ui::finish_spinner_resolved(&pb, &name, key.as_str()),
        Err(_) => ui::finish_spinner_error(&pb, &format!("Could not determine the build for {}", name)),
    }
    required
}

/// Print an inspection failure with its hint.
pub fn report_failure(error: &InspectError) {
    let hint = error.suggestion();
    ui::error_with_hint(&error.to_string(), hint.as_deref());
}

pub async fn inspect(file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("Project file not found: {}", file.display());
    }
    if !is_project_file(file) {
        ui::warning(&format!("{} does not look like a .toe project", file.display()));
    }

    let resolver = Resolver::from_env();
    let required = match analyze(&resolver, file).await {
        Ok(key) => key,
        Err(e) => {
            report_failure(&e);
            anyhow::bail!("Could not determine the required TouchDesigner build");
        }
    };

    ui::field("Required", required.as_str());

    if resolver.is_installed(&required) {
        ui::field("Installed", "yes");
    } else {
        ui::field("Installed", "no");
        match resolver.best_match(&required) {
            Some(best) => ui::field("Closest", best.key.as_str()),
            None => ui::field("Closest", "none installed"),
        }
        if let Some(url) = resolver.download_url(&required) {
            ui::field("Download", &url);
        }
    }

    let player = if resolver.is_player_installed(&required) {
        "installed"
    } else {
        "not installed"
    };
    ui::field("Player", player);

    let modified = project::modified_time(file);
    if !modified.is_empty() {
        ui::field("Modified", &modified);
    }
    if let Some(summary) = project::summary(file) {
        ui::field("Summary", &summary);
    }
    Ok(())
}
