//! Directory listings shared across pages.
//!
//! Sibling pages of a class are found by listing its directory. Classes of
//! the same package share a directory, so listings are kept per directory
//! for the lifetime of the cache.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ListingCache {
    entries: Mutex<HashMap<PathBuf, Arc<[String]>>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted file names in `dir`. An unreadable directory lists as empty.
    pub fn list(&self, dir: &Path) -> Arc<[String]> {
        let cached = self.entries.lock().get(dir).cloned();
        if let Some(names) = cached {
            return names;
        }

        let mut names: Vec<String> = match fs::read_dir(dir) {
            Ok(read) => read
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect(),
            Err(err) => {
                debug!(dir = %dir.display(), %err, "cannot list directory");
                Vec::new()
            }
        };
        names.sort();

        let names: Arc<[String]> = names.into();
        self.entries
            .lock()
            .insert(dir.to_path_buf(), Arc::clone(&names));
        names
    }

    /// Forget every listing, e.g. after the page tree changed on disk.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_sorted_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("B.html"), "").unwrap();
        fs::write(dir.path().join("A.html"), "").unwrap();

        let cache = ListingCache::new();
        assert_eq!(&*cache.list(dir.path()), &["A.html".to_string(), "B.html".to_string()]);
    }

    #[test]
    fn listing_is_reused_until_cleared() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.html"), "").unwrap();

        let cache = ListingCache::new();
        assert_eq!(cache.list(dir.path()).len(), 1);
        fs::write(dir.path().join("A.Inner.html"), "").unwrap();
        assert_eq!(cache.list(dir.path()).len(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.list(dir.path()).len(), 2);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ListingCache::new();
        assert!(cache.list(&dir.path().join("nope")).is_empty());
    }
}
