// Install command for downloading and running a build's installer

use crate::commands::inspect::{analyze, report_failure};
use crate::commands::{is_project_file, parse_key};
use crate::constants;
use crate::prompt;
use crate::runtime::download::{self, Progress};
use crate::runtime::install::{InstallWatch, open_installer};
use crate::runtime::{Resolver, VersionKey};
use crate::ui;
use indicatif::ProgressBar;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct InstallOptions {
    pub dir: Option<PathBuf>,
    pub no_wait: bool,
    pub poll_secs: Option<u64>,
    pub keep: bool,
    pub delete: bool,
}

pub async fn install(target: &str, options: InstallOptions) -> anyhow::Result<()> {
    let mut resolver = Resolver::from_env();
    let key = resolve_target(&resolver, target).await?;

    if resolver.is_installed(&key) {
        ui::success(&format!("{} is already installed", key));
        return Ok(());
    }

    let url = resolver
        .download_url(&key)
        .ok_or_else(|| anyhow::anyhow!("No download available for '{}'", key))?;
    let dir = options.dir.clone().unwrap_or_else(default_download_dir);

    ui::action(&format!("Downloading {}", url));
    let installer = download_with_progress(&url, &dir).await?;

    open_installer(&installer, resolver.platform())?;
    ui::success(&format!("Started installer {}", installer.display()));

    if options.no_wait {
        ui::dim("Not waiting for the install to finish (--no-wait)");
        return Ok(());
    }

    let interval = Duration::from_secs(options.poll_secs.unwrap_or(constants::INSTALL_POLL_SECS).max(1));
    let mut watch = InstallWatch::new();
    watch.begin(key.clone());

    let pb = ui::spinner(&format!("Waiting for {} to be installed...", key));
    let installed = watch
        .wait(
            interval,
            || resolver.scan(),
            |secs| pb.set_message(format!("Waiting for {} to be installed... {}s", key, secs)),
        )
        .await;

    match installed {
        Some(done) => ui::finish_spinner_success(&pb, &format!("{} installed", done)),
        None => {
            ui::clear_bar(&pb);
            return Ok(());
        }
    }
    resolver.refresh();

    cleanup_installer(&installer, &options);
    Ok(())
}

/// A project path resolves to the build it needs; anything else is a key.
async fn resolve_target(resolver: &Resolver, target: &str) -> anyhow::Result<VersionKey> {
    let path = Path::new(target);
    if !(is_project_file(path) && path.exists()) {
        return Ok(parse_key(target));
    }

    match analyze(resolver, path).await {
        Ok(key) => Ok(key),
        Err(e) => {
            report_failure(&e);
            anyhow::bail!("Could not determine which build {} needs", path.display())
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(std::env::temp_dir)
}

async fn download_with_progress(url: &str, dir: &Path) -> anyhow::Result<PathBuf> {
    let name = download::filename_from_url(url);
    let mut bar: Option<ProgressBar> = None;

    let result = download::download_installer(url, dir, |progress: Progress| {
        let pb = bar.get_or_insert_with(|| ui::download_bar(progress.total, &name));
        pb.set_position(progress.downloaded);
        if let Some(fraction) = progress.fraction() {
            pb.set_message(format!("{} {:.0}%", name, fraction * 100.0));
        }
    })
    .await;

    match (result, bar) {
        (Ok(path), Some(pb)) => {
            ui::finish_download_success(&pb, &name);
            Ok(path)
        }
        (Ok(path), None) => Ok(path),
        (Err(e), pb) => {
            if let Some(pb) = pb {
                ui::finish_spinner_error(&pb, &format!("Download of {} failed", name));
            }
            Err(e)
        }
    }
}

fn cleanup_installer(installer: &Path, options: &InstallOptions) {
    let delete = if options.delete {
        true
    } else if options.keep {
        false
    } else {
        prompt::confirm(&format!("Delete installer {}?", installer.display()), false)
    };

    if !delete {
        ui::dim(&format!("Installer kept at {}", installer.display()));
        return;
    }
    match fs::remove_file(installer) {
        Ok(()) => ui::success(&format!("Deleted {}", installer.display())),
        Err(e) => {
            debug!("Could not delete {}: {}", installer.display(), e);
            ui::warning(&format!("Could not delete {}: {}", installer.display(), e));
        }
    }
}
