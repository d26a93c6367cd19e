// History module: launcher recents, templates, and native history merging

pub mod bookmark;
pub mod native;
pub mod reconcile;

use crate::document::{self, ConfigDocument, RecentEntry, TemplateEntry};
use crate::paths;
use log::{debug, info};
use native::NativeHistory;
use std::path::{Path, PathBuf};

/// Owns the configuration document and persists it after every mutation.
///
/// Mutations are read-modify-write on the in-memory document followed by one
/// synchronous save; a failed save is logged and the in-memory state is kept.
pub struct HistoryStore {
    path: PathBuf,
    document: ConfigDocument,
    native: Box<dyn NativeHistory>,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>, native: Box<dyn NativeHistory>) -> Self {
        let path = path.into();
        let document = ConfigDocument::load(&path);
        debug!(
            "Loaded config {} ({} launcher recents, {} templates)",
            path.display(),
            document.launcher_recents.len(),
            document.templates.len()
        );
        Self {
            path,
            document,
            native,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn save(&self) -> bool {
        self.document.save(&self.path)
    }

    /// Record a successful launch of `path`.
    pub fn add_recent_file(&mut self, path: &Path) {
        let stored = paths::absolute_string(path);
        let recents = &mut self.document.launcher_recents;

        recents.retain(|entry| !paths::same_file(&entry.path, &stored));
        recents.insert(0, RecentEntry::launcher(stored, document::now()));

        let limit = self.document.max_recent_files.max(1);
        recents.truncate(limit);
        self.save();
    }

    /// Forget `path` in every history this process can write to.
    pub fn remove_recent_file(&mut self, path: &Path) {
        let target = paths::absolute_string(path);

        self.document
            .launcher_recents
            .retain(|entry| !paths::same_file(&entry.path, &target));
        self.document
            .native_recents
            .retain(|entry| !paths::same_file(&entry.path, &target));

        if self.native.blank(&target) {
            debug!("Blanked native entry for {}", target);
        }
        self.save();
    }

    pub fn clear_recents(&mut self) {
        self.document.launcher_recents.clear();
        self.document.native_recents.clear();
        self.save();
    }

    /// Drop entries whose files are gone and return how many were removed.
    ///
    /// Read-only native stores are left alone; the registry is pruned by
    /// blanking.
    pub fn clear_missing_files(&mut self) -> usize {
        fn exists(path: &str) -> bool {
            Path::new(path).exists()
        }

        let mut removed = 0;

        let before = self.document.launcher_recents.len();
        self.document.launcher_recents.retain(|e| exists(&e.path));
        removed += before - self.document.launcher_recents.len();

        let before = self.document.native_recents.len();
        self.document.native_recents.retain(|e| exists(&e.path));
        removed += before - self.document.native_recents.len();

        removed += self.native.prune_missing();

        let before = self.document.templates.len();
        self.document.templates.retain(|t| exists(&t.path));
        removed += before - self.document.templates.len();

        info!("Removed {} missing file(s) from history", removed);
        self.save();
        removed
    }

    /// Recent files for display. Without `merge_native` this is the launcher
    /// history alone.
    pub fn reconciled_recents(&self, merge_native: bool) -> Vec<RecentEntry> {
        if !merge_native {
            return self.document.launcher_recents.clone();
        }

        let mut native_entries = self.native.read();
        if self.native.uses_config_mirror() {
            native_entries.extend(self.document.native_recents.iter().cloned());
        }

        reconcile::reconcile(
            &self.document.launcher_recents,
            &native_entries,
            self.native.merge_order(),
            self.document.native_recents_synced_at,
        )
    }

    /// Recents using the stored merged-history preference.
    pub fn recents(&self) -> Vec<RecentEntry> {
        self.reconciled_recents(self.document.show_merged_history)
    }

    pub fn templates(&self) -> &[TemplateEntry] {
        &self.document.templates
    }

    /// Add a template at the top of the list. Returns false if it is already
    /// listed.
    pub fn add_template(&mut self, path: &Path, name: Option<String>) -> bool {
        let stored = paths::absolute_string(path);
        if self.template_index(&stored).is_some() {
            return false;
        }
        self.document
            .templates
            .insert(0, TemplateEntry::new(stored, name, document::now()));
        self.save();
        true
    }

    pub fn remove_template(&mut self, path: &Path) -> bool {
        let target = paths::absolute_string(path);
        let before = self.document.templates.len();
        self.document
            .templates
            .retain(|t| !paths::same_file(&t.path, &target));
        let removed = self.document.templates.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    /// Move a template one place up; the first wraps to the bottom.
    pub fn move_template_up(&mut self, path: &Path) -> bool {
        let Some(index) = self.template_index(&paths::absolute_string(path)) else {
            return false;
        };
        let templates = &mut self.document.templates;
        if index == 0 {
            let first = templates.remove(0);
            templates.push(first);
        } else {
            templates.swap(index, index - 1);
        }
        self.save();
        true
    }

    /// Move a template one place down; the last wraps to the top.
    pub fn move_template_down(&mut self, path: &Path) -> bool {
        let Some(index) = self.template_index(&paths::absolute_string(path)) else {
            return false;
        };
        let templates = &mut self.document.templates;
        if index + 1 >= templates.len() {
            let last = templates.remove(index);
            templates.insert(0, last);
        } else {
            templates.swap(index, index + 1);
        }
        self.save();
        true
    }

    fn template_index(&self, path: &str) -> Option<usize> {
        self.document
            .templates
            .iter()
            .position(|t| paths::same_file(&t.path, path))
    }

    pub fn set_max_recent_files(&mut self, max: usize) {
        self.document.max_recent_files = max.max(1);
        let limit = self.document.max_recent_files;
        self.document.launcher_recents.truncate(limit);
        self.save();
    }

    pub fn set_confirm_removal(&mut self, value: bool) {
        self.document.confirm_removal = value;
        self.save();
    }

    pub fn set_show_icons(&mut self, value: bool) {
        self.document.show_icons = value;
        self.save();
    }

    pub fn set_show_auxiliary_info(&mut self, value: bool) {
        self.document.show_auxiliary_info = value;
        self.save();
    }

    pub fn set_show_merged_history(&mut self, value: bool) {
        self.document.show_merged_history = value;
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EntrySource;
    use native::MergeOrder;
    use std::fs;
    use tempfile::TempDir;

    /// Native source with fixed entries, for exercising merge rules.
    struct FixedNative {
        entries: Vec<&'static str>,
        order: MergeOrder,
        mirror: bool,
    }

    impl NativeHistory for FixedNative {
        fn read(&self) -> Vec<RecentEntry> {
            self.entries.iter().map(|p| RecentEntry::native(*p)).collect()
        }

        fn merge_order(&self) -> MergeOrder {
            self.order
        }

        fn uses_config_mirror(&self) -> bool {
            self.mirror
        }
    }

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join("config.json"), Box::new(native::ConfigMirror))
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"toe").unwrap();
        path
    }

    fn template_names(store: &HistoryStore) -> Vec<String> {
        store.templates().iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_add_recent_moves_to_front() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let a = dir.path().join("A.toe");
        let b = dir.path().join("B.toe");

        store.add_recent_file(&a);
        store.add_recent_file(&b);
        store.add_recent_file(&a);

        let recents = &store.document().launcher_recents;
        assert_eq!(recents.len(), 2);
        assert!(paths::same_file(&recents[0].path, a.to_str().unwrap()));
        assert_eq!(recents[0].source, EntrySource::Launcher);
        assert!(recents[0].last_opened_at.is_some());
    }

    #[test]
    fn test_add_recent_dedups_other_spellings() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let upper = dir.path().join("Show.toe");
        let lower = dir.path().join("show.toe");

        store.add_recent_file(&upper);
        store.add_recent_file(&lower);

        let recents = &store.document().launcher_recents;
        assert_eq!(recents.len(), 1);
        assert_eq!(recents[0].path, lower.to_string_lossy());
    }

    #[test]
    fn test_stored_paths_are_normalized() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let dotted = dir.path().join("sub").join("..").join(".").join("Show.toe");
        let plain = paths::absolute_string(&dir.path().join("Show.toe"));

        store.add_recent_file(&dotted);
        assert_eq!(store.document().launcher_recents[0].path, plain);

        assert!(store.add_template(&dotted, None));
        assert_eq!(store.templates()[0].path, plain);
    }

    #[test]
    fn test_history_is_bounded() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_max_recent_files(3);

        for i in 0..10 {
            store.add_recent_file(&dir.path().join(format!("p{}.toe", i)));
            assert!(store.document().launcher_recents.len() <= 3);
        }
        assert!(store.document().launcher_recents[0].path.ends_with("p9.toe"));
    }

    #[test]
    fn test_mutations_persist() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_recent_file(&dir.path().join("kept.toe"));
        store.set_show_icons(true);

        let reopened = store_in(&dir);
        assert_eq!(reopened.document().launcher_recents.len(), 1);
        assert!(reopened.document().show_icons);
    }

    #[test]
    fn test_remove_recent_clears_both_lists() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.json");
        let target = dir.path().join("gone.toe");
        let text = serde_json::json!({
            "launcher_recents": [{"path": target, "source": "launcher"}],
            "td_recents": [target.to_string_lossy().to_uppercase()],
        });
        fs::write(&config, text.to_string()).unwrap();

        let mut store = HistoryStore::open(&config, Box::new(native::ConfigMirror));
        store.remove_recent_file(&target);
        assert!(store.document().launcher_recents.is_empty());
        assert!(store.document().native_recents.is_empty());
    }

    #[test]
    fn test_clear_missing_files_scenario() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "A.toe");
        let b = dir.path().join("B.toe");
        let c = touch(&dir, "C.toe");
        let d = dir.path().join("D.toe");

        let config = dir.path().join("config.json");
        let text = serde_json::json!({
            "launcher_recents": [a, b, c],
            "templates": [d],
        });
        fs::write(&config, text.to_string()).unwrap();

        let mut store = HistoryStore::open(&config, Box::new(native::ConfigMirror));
        assert_eq!(store.clear_missing_files(), 2);

        let remaining: Vec<&str> = store
            .document()
            .launcher_recents
            .iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(remaining, vec![a.to_str().unwrap(), c.to_str().unwrap()]);
        assert!(store.templates().is_empty());
    }

    #[test]
    fn test_reconciled_without_merge_is_launcher_only() {
        let dir = TempDir::new().unwrap();
        let mut store = HistoryStore::open(
            dir.path().join("config.json"),
            Box::new(FixedNative {
                entries: vec!["/native/one.toe"],
                order: MergeOrder::NativeFirst,
                mirror: false,
            }),
        );
        store.add_recent_file(Path::new("/launcher/one.toe"));

        let local = store.reconciled_recents(false);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].path, "/launcher/one.toe");

        let merged = store.reconciled_recents(true);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].path, "/native/one.toe");
    }

    #[test]
    fn test_mirror_merged_for_snapshot_sources() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"td_recents": ["/mirror/a.toe", "/native/shared.toe"], "td_recents_timestamp": 100,
                "launcher_recents": [{"path": "/launch/new.toe", "source": "launcher", "last_opened": 500},
                                     {"path": "/launch/old.toe", "source": "launcher", "last_opened": 50}]}"#,
        )
        .unwrap();

        let store = HistoryStore::open(
            &config,
            Box::new(FixedNative {
                entries: vec!["/native/shared.toe", "/native/b.toe"],
                order: MergeOrder::SinceLastSync,
                mirror: true,
            }),
        );
        let paths: Vec<String> = store.recents().into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec![
                "/launch/new.toe",
                "/native/shared.toe",
                "/native/b.toe",
                "/mirror/a.toe",
                "/launch/old.toe",
            ]
        );
    }

    #[test]
    fn test_template_wrap_up_and_down() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for name in ["c", "b", "a"] {
            assert!(store.add_template(&dir.path().join(format!("{}.toe", name)), None));
        }
        assert_eq!(template_names(&store), vec!["a", "b", "c"]);

        assert!(store.move_template_up(&dir.path().join("a.toe")));
        assert_eq!(template_names(&store), vec!["b", "c", "a"]);

        assert!(store.move_template_down(&dir.path().join("a.toe")));
        assert_eq!(template_names(&store), vec!["a", "b", "c"]);

        assert!(store.move_template_down(&dir.path().join("a.toe")));
        assert_eq!(template_names(&store), vec!["b", "a", "c"]);

        assert!(store.move_template_up(&dir.path().join("a.toe")));
        assert_eq!(template_names(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_template_moves_are_noops() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let only = dir.path().join("only.toe");
        store.add_template(&only, Some("Only".into()));

        assert!(store.move_template_up(&only));
        assert!(store.move_template_down(&only));
        assert_eq!(template_names(&store), vec!["Only"]);
        assert!(!store.move_template_up(&dir.path().join("missing.toe")));
    }

    #[test]
    fn test_add_template_twice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let path = dir.path().join("base.toe");
        assert!(store.add_template(&path, None));
        assert!(!store.add_template(&path, Some("again".into())));
        assert_eq!(store.templates().len(), 1);
        assert!(store.remove_template(&path));
        assert!(!store.remove_template(&path));
    }
}
