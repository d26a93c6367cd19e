// Best-effort path recovery from macOS bookmark blobs

use log::debug;
use std::path::Path;

/// Top-level directory names used to find where the path starts inside the
/// blob. Anything before the first of these is header noise.
const ROOT_DIRS: &[&str] = &[
    "Users",
    "Volumes",
    "Applications",
    "Library",
    "System",
    "private",
    "tmp",
    "var",
    "opt",
    "usr",
    "etc",
    "Network",
    "bin",
    "sbin",
    "cores",
    "dev",
];

const URL_MARKER: &str = "file:///";
const MAX_EXTENSION_LEN: usize = 5;

/// Extract a POSIX path from bookmark data.
///
/// This is a byte-pattern heuristic, not a parser for the bookmark format.
/// The blob is split into printable fragments; path components sit before
/// the `file:///` fragment, the filename is the last fragment with a short
/// alphanumeric extension, and the path starts at the first fragment naming
/// a known root directory. Returns `None` when no filename or root is found,
/// or fewer than two components lie between them.
pub fn extract_path(bookmark: &[u8]) -> Option<String> {
    let fragments = printable_fragments(bookmark);

    let components: Vec<&str> = fragments
        .iter()
        .map(String::as_str)
        .filter(|f| !is_marker(f))
        .collect();

    let candidates = match components.iter().position(|c| *c == URL_MARKER) {
        Some(end) => &components[..end],
        None => &components[..],
    };

    let filename_idx = candidates.iter().rposition(|c| has_short_extension(c))?;

    let start_idx = candidates[..filename_idx]
        .iter()
        .position(|c| ROOT_DIRS.contains(c))?;

    let parts = &candidates[start_idx..=filename_idx];
    if parts.len() < 2 {
        return None;
    }
    Some(format!("/{}", parts.join("/")))
}

/// Split on runs of bytes outside printable ASCII. Each byte is taken as one
/// character, so the split never fails on invalid UTF-8.
fn printable_fragments(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|b| !(0x20..=0x7e).contains(b))
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.iter().map(|&b| b as char).collect())
        .collect()
}

/// Fragments beginning with the `book` magic are container markers.
fn is_marker(fragment: &str) -> bool {
    fragment
        .get(..4.min(fragment.len()))
        .map(|head| head.to_lowercase().contains("book"))
        .unwrap_or(false)
}

fn has_short_extension(fragment: &str) -> bool {
    match fragment.rsplit_once('.') {
        Some((_, ext)) => {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

/// Read every bookmark in a shared file list (`.sfl4`, a keyed-archiver
/// binary plist) and return the paths that could be recovered, in store
/// order, without duplicates.
///
/// A missing or unparseable store reads as empty.
pub fn read_store(store: &Path) -> Vec<String> {
    if !store.exists() {
        debug!("Bookmark store not found: {}", store.display());
        return Vec::new();
    }

    let value = match plist::Value::from_file(store) {
        Ok(value) => value,
        Err(e) => {
            debug!("Could not parse bookmark store {}: {}", store.display(), e);
            return Vec::new();
        }
    };

    let objects = value
        .as_dictionary()
        .and_then(|dict| dict.get("$objects"))
        .and_then(|objects| objects.as_array());

    let mut paths: Vec<String> = Vec::new();
    for object in objects.into_iter().flatten() {
        let Some(data) = object.as_data() else {
            continue;
        };
        if !data.starts_with(b"book") {
            continue;
        }
        match extract_path(data) {
            Some(path) if !paths.contains(&path) => paths.push(path),
            Some(_) => {}
            None => debug!("Skipping bookmark without a recoverable path"),
        }
    }
    paths
}
