// Project folder details shown next to history entries

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const SUMMARY_MAX_CHARS: usize = 250;

/// Last-modified time as `YYYY-MM-DD HH:MM` local time, empty when unknown.
pub fn modified_time(path: &Path) -> String {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|mtime| DateTime::<Local>::from(mtime).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Project name without the extension, plus the same name with a trailing
/// `.<number>` save counter dropped when it has one (`show.7` → `show`).
/// The shorter name is tried first.
fn icon_names(project: &Path) -> Vec<String> {
    let base = project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut names = Vec::new();
    if let Some((stem, counter)) = base.rsplit_once('.')
        && !counter.is_empty()
        && counter.chars().all(|c| c.is_ascii_digit())
    {
        names.push(stem.to_string());
    }
    names.push(base);
    names
}

fn first_existing(dir: &Path, stems: &[String]) -> Option<PathBuf> {
    stems.iter().find_map(|stem| {
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|candidate| candidate.is_file())
    })
}

fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Image to show for a project.
///
/// In order: `icon_<name>`, `icon_temp_<name>`, `icon`, then the most
/// recently modified other image in the folder that does not start with
/// `icon_`. Each named candidate is tried as png, jpg and jpeg.
pub fn find_icon(project: &Path) -> Option<PathBuf> {
    if !project.exists() {
        return None;
    }
    let dir = project
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let names = icon_names(project);

    let named: Vec<String> = names.iter().map(|n| format!("icon_{}", n)).collect();
    if let Some(icon) = first_existing(dir, &named) {
        return Some(icon);
    }
    let generated: Vec<String> = names.iter().map(|n| format!("icon_temp_{}", n)).collect();
    if let Some(icon) = first_existing(dir, &generated) {
        return Some(icon);
    }
    if let Some(icon) = first_existing(dir, &["icon".to_string()]) {
        return Some(icon);
    }

    fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            is_image(&name) && !name.starts_with("icon_")
        })
        .filter_map(|e| {
            let meta = e.metadata().ok()?;
            meta.is_file().then_some((meta.modified().ok()?, e.path()))
        })
        .max_by_key(|(mtime, _)| *mtime)
        .map(|(_, path)| path)
}

/// `README*.md` beside the project, matched case-insensitively.
pub fn find_readme(project: &Path) -> Option<PathBuf> {
    if !project.exists() {
        return None;
    }
    let dir = project.parent()?;
    let mut readmes: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            name.starts_with("readme") && name.ends_with(".md")
        })
        .map(|e| e.path())
        .collect();
    readmes.sort();
    readmes.into_iter().next()
}

/// First line of README prose, skipping markdown scaffolding.
pub fn summary_line(readme: &str) -> Option<String> {
    readme
        .lines()
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && !line.starts_with(['#', '*', '-', '>', '=', '[', '!'])
                && !line.starts_with("```")
        })
        .map(|line| {
            if line.chars().count() > SUMMARY_MAX_CHARS {
                let cut: String = line.chars().take(SUMMARY_MAX_CHARS - 3).collect();
                format!("{}...", cut)
            } else {
                line.to_string()
            }
        })
}

/// One-line description of a project from its README, if any.
pub fn summary(project: &Path) -> Option<String> {
    let readme = find_readme(project)?;
    let text = fs::read_to_string(readme).ok()?;
    summary_line(&text)
}
