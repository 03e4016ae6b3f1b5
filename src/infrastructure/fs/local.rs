//! Local File Source Implementation
//!
//! Implements the FileSource port for one directory on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::ports::{wildcard_match, FileSource, FsError, FsResult};
use crate::domain::value_objects::{normalize_path, FileTime};

/// Directory-rooted file source with atomic writes
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
}

impl LocalFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        Some(normalize_path(&relative.to_string_lossy()))
    }
}

impl FileSource for LocalFileSource {
    fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        std::fs::read(self.resolve(path)).map_err(|e| FsError::io(path, e))
    }

    fn write(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let full = self.resolve(path);
        let parent = full.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(|e| FsError::io(path, e))?;

        // Write next to the destination, then rename over it
        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| FsError::io(path, e))?;
        temp.write_all(data).map_err(|e| FsError::io(path, e))?;
        temp.persist(&full)
            .map_err(|e| FsError::io(path, e.error))?;
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn last_modified(&self, path: &str) -> Option<FileTime> {
        let metadata = std::fs::metadata(self.resolve(path)).ok()?;
        metadata.modified().ok().map(FileTime::from_system_time)
    }

    fn make_directory(&self, path: &str) -> FsResult<()> {
        std::fs::create_dir_all(self.resolve(path)).map_err(|e| FsError::io(path, e))
    }

    fn find_files_recursive(&self, dir: &str, pattern: &str) -> FsResult<Vec<String>> {
        let start = self.resolve(dir);
        if !start.is_dir() {
            return Err(FsError::NotFound(dir.to_string()));
        }

        let walker = WalkBuilder::new(&start)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| FsError::Other(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !wildcard_match(pattern, &name) {
                continue;
            }
            if let Some(relative) = self.relative(entry.path()) {
                files.push(relative);
            }
        }
        Ok(files)
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.resolve(path)
    }
}
