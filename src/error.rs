//! Error types for Mason
//!
//! Uses `thiserror` for library errors. Per-asset compile failures are not
//! represented here: they are recoverable and live in
//! [`CompileError`](crate::domain::ports::CompileError).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Mason operations
pub type MasonResult<T> = Result<T, MasonError>;

/// Main error type for Mason operations
#[derive(Error, Debug)]
pub enum MasonError {
    /// The build configuration file does not exist. Fatal to startup.
    #[error("build configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// The build configuration file exists but could not be understood
    #[error("invalid build configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Source directory missing
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File source error
    #[error(transparent)]
    Fs(#[from] crate::domain::ports::FsError),

    /// A metadata store could not be written
    #[error("failed to persist build metadata: {0}")]
    Store(#[from] crate::domain::ports::StoreError),

    /// Directory watcher could not be installed
    #[error("failed to watch {path}: {message}")]
    Watch { path: PathBuf, message: String },

    /// Console server could not bind its port
    #[error("failed to start console server on port {port}: {source}")]
    Console {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
