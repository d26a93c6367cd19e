// Runtime module: which TouchDesigner builds exist and which one a project needs

pub mod analysis;
pub mod discovery;
pub mod download;
pub mod inspect;
pub mod install;
pub mod version_key;

pub use discovery::{InstalledVersion, Installations};
pub use inspect::{InspectError, Inspector};
pub use version_key::VersionKey;

use crate::config;
use crate::platform::{CpuArch, HostPlatform};
use std::path::PathBuf;

/// Installed builds plus the means to inspect projects against them.
///
/// Installations are a snapshot; call [`Resolver::refresh`] after anything
/// that may have changed them.
pub struct Resolver {
    platform: HostPlatform,
    arch: CpuArch,
    applications_dir: Option<PathBuf>,
    inspector_override: Option<PathBuf>,
    installs: Installations,
    inspector: Inspector,
}

impl Resolver {
    pub fn new(
        platform: HostPlatform,
        arch: CpuArch,
        applications_dir: Option<PathBuf>,
        inspector_override: Option<PathBuf>,
    ) -> Self {
        let installs = discovery::discover(platform, applications_dir.as_deref());
        let tool = Inspector::locate(platform, &installs, inspector_override.clone());
        Self {
            platform,
            arch,
            applications_dir,
            inspector_override,
            installs,
            inspector: Inspector::new(tool),
        }
    }

    /// Resolver for this machine, honoring the environment overrides.
    pub fn from_env() -> Self {
        Self::new(
            HostPlatform::current(),
            CpuArch::current(),
            config::applications_dir(),
            config::inspector_override(),
        )
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    /// Scan again without touching the current snapshot.
    pub fn scan(&self) -> Installations {
        discovery::discover(self.platform, self.applications_dir.as_deref())
    }

    /// Replace the snapshot with a fresh scan.
    ///
    /// A resolver that had no inspection tool looks for one again, since the
    /// first installed build brings it along.
    pub fn refresh(&mut self) -> &Installations {
        self.installs = self.scan();
        if self.inspector.tool().is_none() {
            let tool = Inspector::locate(self.platform, &self.installs, self.inspector_override.clone());
            if tool.is_some() {
                self.inspector = Inspector::new(tool);
            }
        }
        &self.installs
    }

    pub fn installations(&self) -> &Installations {
        &self.installs
    }

    /// Installed designer builds, oldest first.
    pub fn sorted_version_keys(&self) -> Vec<VersionKey> {
        self.installs.designers.keys().cloned().collect()
    }

    pub fn is_installed(&self, key: &VersionKey) -> bool {
        self.installs.contains(key)
    }

    pub fn installed(&self, key: &VersionKey) -> Option<&InstalledVersion> {
        self.installs.get(key)
    }

    /// Player build with the same year and build as `key`, whatever product
    /// `key` names.
    pub fn player_for(&self, key: &VersionKey) -> Option<&InstalledVersion> {
        let numbers = key.numbers();
        self.installs
            .players
            .values()
            .find(|player| player.key.numbers() == numbers)
    }

    pub fn is_player_installed(&self, key: &VersionKey) -> bool {
        self.player_for(key).is_some()
    }

    /// Designer build to offer for `required`; see
    /// [`version_key::resolve_best_match`].
    pub fn best_match(&self, required: &VersionKey) -> Option<&InstalledVersion> {
        let installed: Vec<&InstalledVersion> = self.installs.designers.values().collect();
        version_key::resolve_best_match(required, &installed, |v| &v.key).copied()
    }

    pub fn download_url(&self, key: &VersionKey) -> Option<String> {
        download::installer_url(key, self.platform, self.arch)
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }
}
