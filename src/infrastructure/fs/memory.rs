//! In-memory File Source
//!
//! Keeps files in a map with explicit modification times, so staleness can
//! be tested without sleeping between writes.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{wildcard_match, FileSource, FsError, FsResult};
use crate::domain::value_objects::{normalize_path, FileTime};

/// Shared by every instance, so a target written after its source is newer
static CLOCK: AtomicU64 = AtomicU64::new(0);

fn tick() -> FileTime {
    FileTime::from_nanos(CLOCK.fetch_add(1, Ordering::SeqCst) + 1)
}

fn advance_clock(time: u64) {
    CLOCK.fetch_max(time, Ordering::SeqCst);
}

/// File source held entirely in memory
///
/// Every write advances a clock shared by all instances, so a later write
/// always has a strictly newer timestamp than an earlier one.
#[derive(Debug, Default)]
pub struct MemoryFileSource {
    files: Mutex<BTreeMap<String, (Vec<u8>, FileTime)>>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<String, (Vec<u8>, FileTime)>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a file stamped with the next clock tick
    pub fn insert(&self, path: &str, content: impl AsRef<[u8]>) {
        let time = tick();
        self.files()
            .insert(normalize_path(path), (content.as_ref().to_vec(), time));
    }

    /// Insert a file with an explicit timestamp; the clock moves past it
    pub fn insert_with_time(&self, path: &str, content: impl AsRef<[u8]>, time: u64) {
        advance_clock(time);
        self.files().insert(
            normalize_path(path),
            (content.as_ref().to_vec(), FileTime::from_nanos(time)),
        );
    }

    /// Bump the timestamp of an existing file to the next clock tick
    pub fn touch(&self, path: &str) -> bool {
        let time = tick();
        match self.files().get_mut(&normalize_path(path)) {
            Some(entry) => {
                entry.1 = time;
                true
            }
            None => false,
        }
    }

    pub fn set_modified(&self, path: &str, time: u64) {
        advance_clock(time);
        if let Some(entry) = self.files().get_mut(&normalize_path(path)) {
            entry.1 = FileTime::from_nanos(time);
        }
    }

    pub fn remove(&self, path: &str) -> bool {
        self.files().remove(&normalize_path(path)).is_some()
    }

    /// Every stored path, sorted
    pub fn paths(&self) -> Vec<String> {
        self.files().keys().cloned().collect()
    }
}

impl FileSource for MemoryFileSource {
    fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        self.files()
            .get(&normalize_path(path))
            .map(|(data, _)| data.clone())
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, data: &[u8]) -> FsResult<()> {
        self.insert(path, data);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files().contains_key(&normalize_path(path))
    }

    fn last_modified(&self, path: &str) -> Option<FileTime> {
        self.files()
            .get(&normalize_path(path))
            .map(|(_, time)| *time)
    }

    fn make_directory(&self, _path: &str) -> FsResult<()> {
        Ok(())
    }

    fn find_files_recursive(&self, dir: &str, pattern: &str) -> FsResult<Vec<String>> {
        let prefix = normalize_path(dir);
        let prefix = prefix.trim_end_matches('/');
        Ok(self
            .files()
            .keys()
            .filter(|path| {
                prefix.is_empty()
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .filter(|path| {
                let name = path.rsplit('/').next().unwrap_or(path.as_str());
                wildcard_match(pattern, name)
            })
            .cloned()
            .collect())
    }

    fn full_path(&self, path: &str) -> PathBuf {
        PathBuf::from("memory:").join(path)
    }
}
