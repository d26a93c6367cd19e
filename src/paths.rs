// Path helpers shared by the history lists

use std::path::{Component, Path, PathBuf};

/// Make a path absolute against the current directory without touching the
/// filesystem, folding `.` and `..` lexically. Falls back to the input when
/// the current directory is unknown.
pub fn absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut folded = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = folded.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    folded.pop();
                } else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
                    // Only a relative path keeps a leading `..`
                    folded.push("..");
                }
            }
            other => folded.push(other),
        }
    }
    folded
}

/// Absolute path as the string stored in the config.
pub fn absolute_string(path: &Path) -> String {
    absolute(path).to_string_lossy().into_owned()
}

/// Key under which two spellings of the same file compare equal.
///
/// The path is made absolute, separators are unified to `/`, `.` and `..`
/// are folded lexically, and the result is lowercased. The same project can
/// reach the launcher through the runtime's history with different casing or
/// separators, so comparison ignores both on every platform.
pub fn comparison_key(path: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }

    let absolute = absolute(Path::new(path));
    let unified = absolute.to_string_lossy().replace('\\', "/");
    let rooted = unified.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    let key = if rooted { format!("/{}", joined) } else { joined };
    key.to_lowercase()
}

/// Whether two stored paths name the same file.
pub fn same_file(a: &str, b: &str) -> bool {
    let key_a = comparison_key(a);
    !key_a.is_empty() && key_a == comparison_key(b)
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// File stem, used as the default template label.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
