// Installed runtime discovery

use crate::constants;
use crate::platform::HostPlatform;
use crate::runtime::version_key::VersionKey;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One runtime build found on this machine.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledVersion {
    pub key: VersionKey,
    pub executable: PathBuf,
    /// The `.app` bundle, for hosts that launch through one.
    pub bundle: Option<PathBuf>,
    pub install_dir: PathBuf,
}

/// Designer and player builds, each keyed and ordered by version.
#[derive(Debug, Clone, Default)]
pub struct Installations {
    pub designers: BTreeMap<VersionKey, InstalledVersion>,
    pub players: BTreeMap<VersionKey, InstalledVersion>,
}

impl Installations {
    pub fn is_empty(&self) -> bool {
        self.designers.is_empty() && self.players.is_empty()
    }

    /// Exact lookup in whichever list the key's product belongs to.
    pub fn get(&self, key: &VersionKey) -> Option<&InstalledVersion> {
        if key.is_player() {
            self.players.get(key)
        } else {
            self.designers.get(key)
        }
    }

    pub fn contains(&self, key: &VersionKey) -> bool {
        self.get(key).is_some()
    }
}

/// Scan the host for installed builds, always from scratch.
///
/// An applications directory switches on bundle scanning regardless of the
/// host, which is how macOS is handled and how tests point the scan at a
/// fixture directory. Windows reads the registry.
pub fn discover(platform: HostPlatform, applications_dir: Option<&Path>) -> Installations {
    let mut found = Installations::default();

    if let Some(dir) = applications_dir {
        found.designers = into_map(scan_bundles(dir, constants::DESIGNER_PRODUCT));
        found.players = into_map(scan_bundles(dir, constants::PLAYER_PRODUCT));
    } else if platform == HostPlatform::Windows {
        let values = registry::read_values(constants::DESIGNER_PRODUCT);
        found.designers = into_map(match_registry_installs(constants::DESIGNER_PRODUCT, &values));
        found.players = into_map(derive_players(found.designers.values()));
    }

    debug!(
        "Discovered {} designer and {} player builds",
        found.designers.len(),
        found.players.len()
    );
    found
}

fn into_map(versions: Vec<InstalledVersion>) -> BTreeMap<VersionKey, InstalledVersion> {
    versions.into_iter().map(|v| (v.key.clone(), v)).collect()
}

/// Registry value names that denote a build, such as `2023.34567`.
fn is_version_name(name: &str) -> bool {
    match name.split_once('.') {
        Some((year, build)) => {
            year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && !build.is_empty()
                && build.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Pair the build names under a product's registry key with their install
/// folders.
///
/// Builds are value names like `2023.34567`; install folders live in sibling
/// `Path`, `Path_3`, ... values, and the one belonging to a build is the one
/// whose text contains the build. A build only counts if
/// `<install>\bin\<product>.exe` exists.
pub fn match_registry_installs(product: &str, values: &[(String, String)]) -> Vec<InstalledVersion> {
    let install_paths: Vec<&str> = values
        .iter()
        .filter(|(name, _)| name.starts_with("Path"))
        .map(|(_, value)| value.as_str())
        .collect();

    values
        .iter()
        .map(|(name, _)| name.as_str())
        .filter(|name| is_version_name(name))
        .filter_map(|version| {
            let install = install_paths.iter().find(|path| path.contains(version))?;
            let install_dir = PathBuf::from(install);
            let executable = install_dir.join("bin").join(format!("{}.exe", product));
            if !executable.exists() {
                debug!("Skipping {} {}: {} missing", product, version, executable.display());
                return None;
            }
            Some(InstalledVersion {
                key: VersionKey::for_product(product, version),
                executable,
                bundle: None,
                install_dir,
            })
        })
        .collect()
}

/// Windows ships the player inside each designer install.
fn derive_players<'a>(designers: impl Iterator<Item = &'a InstalledVersion>) -> Vec<InstalledVersion> {
    designers
        .filter_map(|designer| {
            let executable = designer
                .install_dir
                .join("bin")
                .join(format!("{}.exe", constants::PLAYER_PRODUCT));
            executable.exists().then(|| InstalledVersion {
                key: designer.key.with_product(constants::PLAYER_PRODUCT),
                executable,
                bundle: None,
                install_dir: designer.install_dir.clone(),
            })
        })
        .collect()
}

/// Find `<product>*.app` bundles in `dir` and read their build from
/// `Contents/Info.plist`.
pub fn scan_bundles(dir: &Path, product: &str) -> Vec<InstalledVersion> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Could not read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(product) || !name.ends_with(".app") {
            continue;
        }
        if let Some(version) = read_bundle(&entry.path(), product) {
            found.push(version);
        }
    }
    found
}

fn read_bundle(bundle: &Path, product: &str) -> Option<InstalledVersion> {
    let info_path = bundle.join("Contents").join("Info.plist");
    let info = match plist::Value::from_file(&info_path) {
        Ok(info) => info,
        Err(e) => {
            warn!("Could not read Info.plist for {}: {}", bundle.display(), e);
            return None;
        }
    };

    let bundle_version = info
        .as_dictionary()
        .and_then(|dict| dict.get("CFBundleVersion"))
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if bundle_version.is_empty() {
        warn!("No bundle version found for {}", bundle.display());
        return None;
    }

    let parts: Vec<&str> = bundle_version.split('.').collect();
    if parts.len() < 2 {
        warn!("Could not parse version from {}", bundle_version);
        return None;
    }

    let executable = bundle.join("Contents").join("MacOS").join(product);
    if !executable.exists() {
        debug!("Skipping {}: {} missing", bundle.display(), executable.display());
        return None;
    }

    let key = VersionKey::for_product(product, &format!("{}.{}", parts[0], parts[1]));
    debug!("Found {} at {}", key, executable.display());
    Some(InstalledVersion {
        key,
        executable,
        bundle: Some(bundle.to_path_buf()),
        install_dir: bundle.to_path_buf(),
    })
}

#[cfg(windows)]
mod registry {
    use crate::constants;
    use log::debug;
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::types::FromRegValue;

    /// Every value under `HKLM\SOFTWARE\Derivative\<product>`. Values that
    /// are not strings keep their name with empty text.
    pub fn read_values(product: &str) -> Vec<(String, String)> {
        let path = format!(r"{}\{}", constants::INSTALLS_KEY, product);
        let key = match RegKey::predef(HKEY_LOCAL_MACHINE).open_subkey(&path) {
            Ok(key) => key,
            Err(e) => {
                debug!("No {} installs in registry: {}", product, e);
                return Vec::new();
            }
        };

        key.enum_values()
            .filter_map(|entry| entry.ok())
            .map(|(name, value)| {
                let text = String::from_reg_value(&value).unwrap_or_default();
                (name, text)
            })
            .collect()
    }
}

#[cfg(not(windows))]
mod registry {
    pub fn read_values(_product: &str) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Lay out a fake `<name>.app` bundle with the given build and,
    /// optionally, its executable.
    pub(crate) fn make_bundle(dir: &Path, name: &str, product: &str, version: &str, with_exe: bool) -> PathBuf {
        let bundle = dir.join(format!("{}.app", name));
        let contents = bundle.join("Contents");
        fs::create_dir_all(contents.join("MacOS")).unwrap();

        let mut dict = plist::Dictionary::new();
        dict.insert("CFBundleVersion".to_string(), plist::Value::String(version.to_string()));
        plist::Value::Dictionary(dict)
            .to_file_xml(contents.join("Info.plist"))
            .unwrap();

        if with_exe {
            fs::write(contents.join("MacOS").join(product), "").unwrap();
        }
        bundle
    }

    fn make_install(root: &Path, folder: &str, players: bool) -> PathBuf {
        let install = root.join(folder);
        fs::create_dir_all(install.join("bin")).unwrap();
        fs::write(install.join("bin").join("TouchDesigner.exe"), "").unwrap();
        if players {
            fs::write(install.join("bin").join("TouchPlayer.exe"), "").unwrap();
        }
        install
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_is_version_name() {
        assert!(is_version_name("2023.34567"));
        assert!(is_version_name("2019.1"));
        assert!(!is_version_name("23.34567"));
        assert!(!is_version_name("2023."));
        assert!(!is_version_name("2023.1.2"));
        assert!(!is_version_name("Path_3"));
    }

    #[test]
    fn test_registry_installs_matched_by_substring() {
        let temp = TempDir::new().unwrap();
        let newer = make_install(temp.path(), "TouchDesigner.2023.34567", true);
        let older = make_install(temp.path(), "TouchDesigner.2022.28040", false);

        let values = vec![
            pair("2023.34567", ""),
            pair("2022.28040", ""),
            pair("2021.10000", ""),
            pair("Path", &newer.to_string_lossy()),
            pair("Path_3", &older.to_string_lossy()),
            pair("Path_6", "C:\\missing\\TouchDesigner.2021.10000"),
            pair("Version", "2023.34567"),
        ];

        let mut found = match_registry_installs("TouchDesigner", &values);
        found.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<&str> = found.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["TouchDesigner.2022.28040", "TouchDesigner.2023.34567"]);
        assert_eq!(found[1].install_dir, newer);
        assert!(found[1].executable.ends_with("bin/TouchDesigner.exe"));
        assert!(found[1].bundle.is_none());

        let players = derive_players(found.iter());
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].key.as_str(), "TouchPlayer.2023.34567");
        assert!(players[0].executable.ends_with("bin/TouchPlayer.exe"));
    }

    #[test]
    fn test_bundle_scan() {
        let temp = TempDir::new().unwrap();
        make_bundle(temp.path(), "TouchDesigner", "TouchDesigner", "2023.11880", true);
        make_bundle(temp.path(), "TouchDesigner.2022", "TouchDesigner", "2022.35320.1", true);
        make_bundle(temp.path(), "TouchDesigner Broken", "TouchDesigner", "2021", true);
        make_bundle(temp.path(), "TouchDesigner NoExe", "TouchDesigner", "2020.100", false);
        make_bundle(temp.path(), "TouchPlayer", "TouchPlayer", "2023.11880", true);
        fs::create_dir_all(temp.path().join("TouchDesigner Folder")).unwrap();

        let found = discover(HostPlatform::Other, Some(temp.path()));
        let designers: Vec<&str> = found.designers.keys().map(|k| k.as_str()).collect();
        assert_eq!(designers, vec!["TouchDesigner.2022.35320", "TouchDesigner.2023.11880"]);

        let players: Vec<&str> = found.players.keys().map(|k| k.as_str()).collect();
        assert_eq!(players, vec!["TouchPlayer.2023.11880"]);

        let newest = &found.designers[&VersionKey::new("TouchDesigner.2023.11880")];
        assert_eq!(newest.bundle.as_deref(), Some(temp.path().join("TouchDesigner.app").as_path()));
        assert!(newest.executable.ends_with("Contents/MacOS/TouchDesigner"));
    }

    #[test]
    fn test_missing_applications_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let found = discover(HostPlatform::MacOs, Some(&temp.path().join("nope")));
        assert!(found.is_empty());
    }
}
