// Installer hand-off and install-completion polling

use crate::document::{self, Timestamp};
use crate::platform::HostPlatform;
use crate::runtime::discovery::Installations;
use crate::runtime::version_key::VersionKey;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum InstallState {
    Idle,
    Pending { key: VersionKey, since: Timestamp },
}

/// Tracks one outstanding installer run.
///
/// There is no timeout: a pending install stays pending until its build shows
/// up in a rescan.
#[derive(Debug, Clone)]
pub struct InstallWatch {
    state: InstallState,
}

impl Default for InstallWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallWatch {
    pub fn new() -> Self {
        Self {
            state: InstallState::Idle,
        }
    }

    pub fn begin(&mut self, key: VersionKey) {
        debug!("Waiting for {} to be installed", key);
        self.state = InstallState::Pending {
            key,
            since: document::now(),
        };
    }

    pub fn pending_key(&self) -> Option<&VersionKey> {
        match &self.state {
            InstallState::Pending { key, .. } => Some(key),
            InstallState::Idle => None,
        }
    }

    /// Compare a fresh scan against the pending build. Returns the build and
    /// goes idle once it is installed.
    pub fn check(&mut self, installs: &Installations) -> Option<VersionKey> {
        let key = self.pending_key()?;
        if !installs.contains(key) {
            return None;
        }
        let key = key.clone();
        info!("{} is now installed", key);
        self.state = InstallState::Idle;
        Some(key)
    }

    /// Rescan every `interval` until the pending build appears.
    ///
    /// `on_tick` is handed the seconds spent waiting so far before each
    /// sleep. Returns immediately with `None` when nothing is pending.
    pub async fn wait(
        &mut self,
        interval: Duration,
        mut rescan: impl FnMut() -> Installations,
        mut on_tick: impl FnMut(u64),
    ) -> Option<VersionKey> {
        let since = match &self.state {
            InstallState::Pending { since, .. } => *since,
            InstallState::Idle => return None,
        };

        loop {
            if let Some(key) = self.check(&rescan()) {
                return Some(key);
            }
            let waited = (document::now() - since).max(0.0) as u64;
            on_tick(waited);
            tokio::time::sleep(interval).await;
        }
    }
}

/// Hand a downloaded installer to the OS.
///
/// macOS mounts disk images through `open`; elsewhere the installer is run
/// directly. Returns once the installer has been started.
pub fn open_installer(installer: &Path, platform: HostPlatform) -> Result<()> {
    if !installer.exists() {
        anyhow::bail!("Installer not found: {}", installer.display());
    }

    let mut command = match platform {
        HostPlatform::MacOs => {
            let mut command = Command::new("open");
            command.arg(installer);
            command
        }
        _ => Command::new(installer),
    };

    command
        .spawn()
        .with_context(|| format!("Failed to start installer {}", installer.display()))?;
    info!("Started installer {}", installer.display());
    Ok(())
}
