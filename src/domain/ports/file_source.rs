//! FileSource port - abstraction over one rooted directory tree
//!
//! All paths are relative to the root of the source and use `/` as
//! separator. This lets compilers and stores work against the local disk or
//! an in-memory tree without knowing which.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::FileTime;

/// Result type for file source operations
pub type FsResult<T> = Result<T, FsError>;

/// File source operation errors
#[derive(Debug, Error)]
pub enum FsError {
    /// File not found
    #[error("file not found: {0}")]
    NotFound(String),

    /// I/O error on a specific path
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl FsError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound(path.to_string())
        } else {
            FsError::Io {
                path: path.to_string(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

/// Abstract file source interface
///
/// Implementations:
/// - `LocalFileSource` - a directory on disk
/// - `MemoryFileSource` - in-memory tree with explicit timestamps (tests)
pub trait FileSource: Send + Sync {
    /// Read the whole file
    fn read(&self, path: &str) -> FsResult<Vec<u8>>;

    /// Read file content as UTF-8
    fn read_to_string(&self, path: &str) -> FsResult<String> {
        let data = self.read(path)?;
        String::from_utf8(data).map_err(|e| FsError::Other(format!("'{path}' is not UTF-8: {e}")))
    }

    /// Write a file, creating parent directories as needed
    fn write(&self, path: &str, data: &[u8]) -> FsResult<()>;

    /// Check if file exists
    fn exists(&self, path: &str) -> bool;

    /// Last modification time, `None` if the file cannot be queried
    fn last_modified(&self, path: &str) -> Option<FileTime>;

    /// Create directory and parents
    fn make_directory(&self, path: &str) -> FsResult<()>;

    /// Every file below `dir` whose name matches the wildcard `pattern`
    /// (`*` and `?`), as root-relative paths.
    fn find_files_recursive(&self, dir: &str, pattern: &str) -> FsResult<Vec<String>>;

    /// Absolute location of `path`, for diagnostics
    fn full_path(&self, path: &str) -> PathBuf;
}

/// Match a file name against a wildcard pattern supporting `*` and `?`.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, n));
            p += 1;
        } else if let Some((sp, sn)) = star {
            p = sp + 1;
            n = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}
