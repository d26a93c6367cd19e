// Merging launcher history with the runtime's native history

use crate::document::{EntrySource, RecentEntry, Timestamp};
use crate::history::native::MergeOrder;
use crate::paths;
use std::collections::HashSet;

/// Merge launcher and native histories into one display list.
///
/// Each logical file appears once: entries are compared by
/// [`paths::comparison_key`] and the first occurrence in merge order wins.
/// Native entries are retagged as [`EntrySource::Native`].
pub fn reconcile(
    launcher: &[RecentEntry],
    native: &[RecentEntry],
    order: MergeOrder,
    synced_at: Timestamp,
) -> Vec<RecentEntry> {
    let mut merged = Merged::default();

    match order {
        MergeOrder::NativeFirst => {
            merged.extend(native, Some(EntrySource::Native));
            merged.extend(launcher, None);
        }
        MergeOrder::SinceLastSync => {
            let (mut newer, older): (Vec<RecentEntry>, Vec<RecentEntry>) = launcher
                .iter()
                .cloned()
                .partition(|entry| entry.last_opened_at.unwrap_or(0.0) > synced_at);
            newer.sort_by(|a, b| {
                let a = a.last_opened_at.unwrap_or(0.0);
                let b = b.last_opened_at.unwrap_or(0.0);
                b.total_cmp(&a)
            });

            merged.extend(&newer, None);
            merged.extend(native, Some(EntrySource::Native));
            merged.extend(&older, None);
        }
    }

    merged.entries
}

#[derive(Default)]
struct Merged {
    seen: HashSet<String>,
    entries: Vec<RecentEntry>,
}

impl Merged {
    fn extend(&mut self, items: &[RecentEntry], retag: Option<EntrySource>) {
        for item in items {
            let key = paths::comparison_key(&item.path);
            if key.is_empty() || !self.seen.insert(key) {
                continue;
            }
            let mut entry = item.clone();
            if let Some(source) = retag {
                entry.source = source;
            }
            self.entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher(path: &str, at: f64) -> RecentEntry {
        RecentEntry::launcher(path, at)
    }

    fn native(path: &str) -> RecentEntry {
        RecentEntry::native(path)
    }

    fn paths_of(entries: &[RecentEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_native_first_order() {
        let merged = reconcile(
            &[launcher("/p/a.toe", 10.0), launcher("/p/b.toe", 5.0)],
            &[native("/p/n1.toe"), native("/p/n2.toe")],
            MergeOrder::NativeFirst,
            0.0,
        );
        assert_eq!(paths_of(&merged), vec!["/p/n1.toe", "/p/n2.toe", "/p/a.toe", "/p/b.toe"]);
        assert_eq!(merged[0].source, EntrySource::Native);
        assert_eq!(merged[2].source, EntrySource::Launcher);
    }

    #[test]
    fn test_dedup_across_case_and_separators() {
        let merged = reconcile(
            &[
                launcher("/Proj/Show.toe", 3.0),
                launcher("/proj/show.toe", 2.0),
                launcher("/Proj/Other.toe", 1.0),
            ],
            &[native("/PROJ\\SHOW.TOE"), native("/proj//show.toe")],
            MergeOrder::NativeFirst,
            0.0,
        );
        assert_eq!(paths_of(&merged), vec!["/PROJ\\SHOW.TOE", "/Proj/Other.toe"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let launcher_list = vec![launcher("/x/A.toe", 2.0), launcher("/X/a.toe", 1.0)];
        let once = reconcile(&launcher_list, &[native("/x/a.TOE")], MergeOrder::NativeFirst, 0.0);
        let twice = reconcile(&once, &[], MergeOrder::NativeFirst, 0.0);
        assert_eq!(once.len(), 1);
        assert_eq!(paths_of(&once), paths_of(&twice));
    }

    #[test]
    fn test_since_last_sync_interleaves() {
        let merged = reconcile(
            &[
                launcher("/p/old1.toe", 50.0),
                launcher("/p/new_early.toe", 150.0),
                launcher("/p/old2.toe", 10.0),
                launcher("/p/new_late.toe", 300.0),
            ],
            &[native("/p/n1.toe"), native("/p/n2.toe")],
            MergeOrder::SinceLastSync,
            100.0,
        );
        assert_eq!(
            paths_of(&merged),
            vec![
                "/p/new_late.toe",
                "/p/new_early.toe",
                "/p/n1.toe",
                "/p/n2.toe",
                "/p/old1.toe",
                "/p/old2.toe",
            ]
        );
    }

    #[test]
    fn test_since_last_sync_prefers_newer_launcher_copy() {
        let merged = reconcile(
            &[launcher("/p/shared.toe", 200.0)],
            &[native("/P/Shared.toe")],
            MergeOrder::SinceLastSync,
            100.0,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, EntrySource::Launcher);
    }

    #[test]
    fn test_untimed_launcher_entries_count_as_older() {
        let mut legacy = native("/p/legacy.toe");
        legacy.source = EntrySource::Legacy;
        let merged = reconcile(
            &[legacy],
            &[native("/p/n.toe")],
            MergeOrder::SinceLastSync,
            0.0,
        );
        assert_eq!(paths_of(&merged), vec!["/p/n.toe", "/p/legacy.toe"]);
    }

    #[test]
    fn test_empty_paths_dropped() {
        let merged = reconcile(&[], &[native(""), native("  ")], MergeOrder::NativeFirst, 0.0);
        assert!(merged.is_empty());
    }
}
