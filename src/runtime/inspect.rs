// Required-version inspection through the runtime's toeexpand tool

use crate::constants;
use crate::paths;
use crate::platform::HostPlatform;
use crate::runtime::discovery::Installations;
use crate::runtime::version_key::VersionKey;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use thiserror::Error;

const TOOL_DIR: &str = "toeexpand";
const TOOL_NAME: &str = "toeexpand";

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Project file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No toeexpand tool found")]
    ToolMissing,

    #[error("Could not run {tool}: {source}")]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("toeexpand output is not valid UTF-8")]
    Decode,

    #[error("toeexpand produced no useful output")]
    NoOutput,

    #[error("Unexpected toeexpand output: {0:?}")]
    UnexpectedOutput(Vec<String>),
}

impl InspectError {
    /// Hint shown beneath the error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            InspectError::ToolMissing => Some(
                "Install a TouchDesigner build, or point TDL_TOEEXPAND at a toeexpand binary."
                    .to_string(),
            ),
            InspectError::FileNotFound(_) => None,
            _ => Some("Choose a version manually with --version.".to_string()),
        }
    }
}

/// Runs the inspection tool and remembers what each project requires.
///
/// Clones share one cache, so a background worker and the caller see the
/// same results. Only successful inspections are cached, keyed by absolute
/// path, for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    tool: Option<PathBuf>,
    cache: Arc<Mutex<HashMap<PathBuf, VersionKey>>>,
}

impl Inspector {
    pub fn new(tool: Option<PathBuf>) -> Self {
        Self {
            tool,
            cache: Arc::default(),
        }
    }

    /// Find the tool for this host.
    ///
    /// An explicit override wins. Windows ships the tool in a `toeexpand`
    /// folder beside the launcher executable; bundle installs carry it in
    /// `Contents/MacOS` of any designer bundle, the oldest one tried first.
    pub fn locate(
        platform: HostPlatform,
        installs: &Installations,
        override_path: Option<PathBuf>,
    ) -> Option<PathBuf> {
        if let Some(path) = override_path {
            return Some(path);
        }

        if platform == HostPlatform::Windows
            && let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            let bundled = dir.join(TOOL_DIR).join(format!("{}.exe", TOOL_NAME));
            if bundled.exists() {
                return Some(bundled);
            }
        }

        installs
            .designers
            .values()
            .filter_map(|v| v.bundle.as_ref())
            .map(|bundle| bundle.join("Contents").join("MacOS").join(TOOL_NAME))
            .find(|tool| tool.exists())
    }

    pub fn tool(&self) -> Option<&Path> {
        self.tool.as_deref()
    }

    /// Previously inspected requirement for `path`, without running the tool.
    pub fn cached(&self, path: &Path) -> Option<VersionKey> {
        let key = paths::absolute(path);
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
    }

    /// The runtime build `path` was saved with.
    ///
    /// Blocks for as long as the tool runs. The tool's exit status carries no
    /// meaning (it commonly exits 1 with good output), so only its stdout is
    /// judged.
    pub fn inspect(&self, path: &Path) -> Result<VersionKey, InspectError> {
        let absolute = paths::absolute(path);
        if !absolute.exists() {
            return Err(InspectError::FileNotFound(absolute));
        }
        if let Some(hit) = self.cached(&absolute) {
            debug!("Using cached requirement {} for {}", hit, absolute.display());
            return Ok(hit);
        }

        let tool = self.tool.as_ref().ok_or(InspectError::ToolMissing)?;
        debug!("Running {} -b {}", tool.display(), absolute.display());

        let output = Command::new(tool)
            .arg("-b")
            .arg(&absolute)
            .output()
            .map_err(|source| InspectError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            debug!("toeexpand exited with {}", output.status);
        }
        if !output.stderr.is_empty() {
            debug!("toeexpand stderr: {:?}", String::from_utf8_lossy(&output.stderr));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| InspectError::Decode)?;
        debug!("toeexpand stdout: {:?}", stdout);

        let required = parse_inspector_output(&stdout)?;
        info!("{} requires {}", absolute.display(), required);

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(absolute, required.clone());
        Ok(required)
    }
}

/// Pull the required build out of `toeexpand -b` output.
///
/// The second non-empty line ends with the build, e.g. `build 2023.34567`.
pub fn parse_inspector_output(stdout: &str) -> Result<VersionKey, InspectError> {
    let cleaned = stdout.replace('\r', "");
    if cleaned.trim().len() < 5 {
        return Err(InspectError::NoOutput);
    }

    let lines: Vec<String> = cleaned
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if lines.len() < 2 {
        return Err(InspectError::UnexpectedOutput(lines));
    }

    let Some(build) = lines[1].split_whitespace().next_back() else {
        return Err(InspectError::UnexpectedOutput(lines));
    };
    Ok(VersionKey::for_product(constants::DESIGNER_PRODUCT, build))
}
