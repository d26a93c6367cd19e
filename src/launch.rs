// Starting a runtime build with a project

use crate::platform::HostPlatform;
use crate::runtime::InstalledVersion;
use anyhow::{Context, Result};
use log::info;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// The process that opens `project` in a given build.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl LaunchCommand {
    /// macOS hands the project to the bundle through `open -a`, so the app
    /// starts the way Finder would start it. Elsewhere the executable gets the
    /// project as its only argument.
    pub fn new(version: &InstalledVersion, project: &Path, platform: HostPlatform) -> Self {
        match (&version.bundle, platform) {
            (Some(bundle), HostPlatform::MacOs) => Self {
                program: "open".into(),
                args: vec!["-a".into(), bundle.into(), project.into()],
            },
            _ => Self {
                program: version.executable.clone().into_os_string(),
                args: vec![project.into()],
            },
        }
    }

    /// Shell-style rendering for dry runs and logs.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| {
                let text = part.to_string_lossy();
                if text.contains(' ') {
                    format!("\"{}\"", text)
                } else {
                    text.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Start the process without waiting for it.
    pub fn spawn(&self) -> Result<()> {
        Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.display()))?;
        info!("Launched {}", self.display());
        Ok(())
    }
}

/// Open `project` in `version`.
pub fn launch(version: &InstalledVersion, project: &Path, platform: HostPlatform) -> Result<()> {
    if !version.executable.exists() {
        anyhow::bail!(
            "Executable for {} not found at {}",
            version.key,
            version.executable.display()
        );
    }
    if !project.exists() {
        anyhow::bail!("Project file not found: {}", project.display());
    }
    LaunchCommand::new(version, project, platform).spawn()
}
