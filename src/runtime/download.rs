// Installer URLs and streaming downloads

use crate::constants;
use crate::platform::{CpuArch, HostPlatform};
use crate::runtime::version_key::VersionKey;
use anyhow::Result;
use log::{debug, info};
use reqwest::{Client, Response};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("tdl/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    /// Shared HTTP client with proper User-Agent
    static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client");
}

/// Installer URL for `key` on the given host.
///
/// 2017 and 2018 Windows builds were published as `TouchDesigner099` with a
/// `.64-Bit` suffix, 2019 Windows builds under the same name without it.
/// Everything else follows `<Product>.<year>.<build><arch><ext>`, where only
/// non-Windows hosts carry an architecture suffix and a TouchPlayer product.
/// Returns `None` for keys with fewer than three dot-separated segments.
pub fn installer_url(key: &VersionKey, platform: HostPlatform, arch: CpuArch) -> Option<String> {
    let segments: Vec<&str> = key.as_str().split('.').collect();
    if segments.len() < 3 {
        return None;
    }
    let (product, year, build) = (segments[0], segments[1], segments[2]);

    let url = match platform {
        HostPlatform::Windows => match year {
            "2017" | "2018" => format!(
                "{}/TouchDesigner099.{}.{}.64-Bit.exe",
                constants::DOWNLOAD_BASE_URL,
                year,
                build
            ),
            "2019" => format!(
                "{}/TouchDesigner099.{}.{}.exe",
                constants::DOWNLOAD_BASE_URL,
                year,
                build
            ),
            _ => format!(
                "{}/{}.{}.{}.exe",
                constants::DOWNLOAD_BASE_URL,
                constants::DESIGNER_PRODUCT,
                year,
                build
            ),
        },
        HostPlatform::MacOs | HostPlatform::Other => {
            let url_product = if product == constants::PLAYER_PRODUCT {
                constants::PLAYER_PRODUCT
            } else {
                constants::DESIGNER_PRODUCT
            };
            format!(
                "{}/{}.{}.{}.{}.dmg",
                constants::DOWNLOAD_BASE_URL,
                url_product,
                year,
                build,
                arch.suffix()
            )
        }
    };

    Some(url)
}

/// Last path segment of a URL, without any query string.
pub fn filename_from_url(url: &str) -> String {
    url.split('/')
        .next_back()
        .unwrap_or("installer")
        .split('?')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("installer")
        .to_string()
}

/// Bytes received so far and the total, when the server announced one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub downloaded: u64,
    pub total: Option<u64>,
}

impl Progress {
    /// Fraction complete in `0.0..=1.0`, if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.downloaded as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

/// Download `url` into `dir`, reporting progress after every chunk.
///
/// Data goes to a `.part` file that is renamed once the transfer completes,
/// so an interrupted download never looks like a finished installer.
pub async fn download_installer(
    url: &str,
    dir: &Path,
    mut on_progress: impl FnMut(Progress),
) -> Result<PathBuf> {
    let mut response: Response = CLIENT.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed: {} ({})", url, response.status());
    }

    fs::create_dir_all(dir)?;
    let target = dir.join(filename_from_url(url));
    let partial = target.with_extension(format!(
        "{}.part",
        target
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
    ));

    let total = response.content_length();
    debug!("Downloading {} ({:?} bytes) to {}", url, total, partial.display());

    let mut file = fs::File::create(&partial)?;
    let mut downloaded: u64 = 0;
    on_progress(Progress { downloaded, total });

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        on_progress(Progress { downloaded, total });
    }
    file.flush()?;
    drop(file);

    fs::rename(&partial, &target)?;
    info!("Downloaded {} ({} bytes)", target.display(), downloaded);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(key: &str, platform: HostPlatform, arch: CpuArch) -> Option<String> {
        installer_url(&VersionKey::new(key), platform, arch)
    }

    #[test]
    fn test_windows_url() {
        let u = url("TouchDesigner.2023.34567", HostPlatform::Windows, CpuArch::Intel).unwrap();
        assert_eq!(u, "https://download.derivative.ca/TouchDesigner.2023.34567.exe");
        assert!(u.ends_with("2023.34567.exe"));
    }

    #[test]
    fn test_mac_urls_carry_arch() {
        let arm = url("TouchDesigner.2023.34567", HostPlatform::MacOs, CpuArch::Arm64).unwrap();
        assert!(arm.contains(".arm64.dmg"));
        assert_eq!(arm, "https://download.derivative.ca/TouchDesigner.2023.34567.arm64.dmg");

        let intel = url("TouchDesigner.2023.34567", HostPlatform::MacOs, CpuArch::Intel).unwrap();
        assert!(intel.ends_with(".intel.dmg"));
    }

    #[test]
    fn test_legacy_windows_years() {
        assert_eq!(
            url("TouchDesigner.2018.28120", HostPlatform::Windows, CpuArch::Intel).unwrap(),
            "https://download.derivative.ca/TouchDesigner099.2018.28120.64-Bit.exe"
        );
        assert_eq!(
            url("TouchDesigner.2017.10000", HostPlatform::Windows, CpuArch::Intel).unwrap(),
            "https://download.derivative.ca/TouchDesigner099.2017.10000.64-Bit.exe"
        );
        assert_eq!(
            url("TouchDesigner.2019.20700", HostPlatform::Windows, CpuArch::Intel).unwrap(),
            "https://download.derivative.ca/TouchDesigner099.2019.20700.exe"
        );
        // Legacy naming is Windows-only
        assert_eq!(
            url("TouchDesigner.2018.28120", HostPlatform::MacOs, CpuArch::Intel).unwrap(),
            "https://download.derivative.ca/TouchDesigner.2018.28120.intel.dmg"
        );
    }

    #[test]
    fn test_player_product() {
        assert_eq!(
            url("TouchPlayer.2023.11880", HostPlatform::MacOs, CpuArch::Arm64).unwrap(),
            "https://download.derivative.ca/TouchPlayer.2023.11880.arm64.dmg"
        );
        assert_eq!(
            url("TouchPlayer.2023.11880", HostPlatform::Windows, CpuArch::Intel).unwrap(),
            "https://download.derivative.ca/TouchDesigner.2023.11880.exe"
        );
    }

    #[test]
    fn test_short_keys_have_no_url() {
        assert!(url("TouchDesigner.2023", HostPlatform::Windows, CpuArch::Intel).is_none());
        assert!(url("2023.34567", HostPlatform::MacOs, CpuArch::Arm64).is_none());
        assert!(url("", HostPlatform::MacOs, CpuArch::Arm64).is_none());
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://download.derivative.ca/TouchDesigner.2023.1.exe?x=1"),
            "TouchDesigner.2023.1.exe"
        );
        assert_eq!(filename_from_url("https://host/"), "installer");
    }

    #[test]
    fn test_progress_fraction() {
        let half = Progress { downloaded: 50, total: Some(100) };
        assert_eq!(half.fraction(), Some(0.5));
        let over = Progress { downloaded: 150, total: Some(100) };
        assert_eq!(over.fraction(), Some(1.0));
        let unknown = Progress { downloaded: 10, total: None };
        assert_eq!(unknown.fraction(), None);
    }
}
