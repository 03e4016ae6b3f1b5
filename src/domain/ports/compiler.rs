//! Compiler port - contract every per-type asset compiler implements
//!
//! A compiler turns one source asset into one target asset. While doing so it
//! may record dependency edges, request shader permutations and record
//! string ids through the [`CompilerContext`].

use thiserror::Error;

use crate::domain::entities::{BuildSettings, DependencyGraph, ShaderDatabase, StringIdRepository};
use crate::domain::ports::FileSource;

/// Result of compiling one asset
pub type CompileResult = Result<(), CompileError>;

/// Why a single asset failed to compile. Never fatal to a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// Compiler-specific failure
    #[error("{0}")]
    Failed(String),

    /// Source could not be read
    #[error("failed to read '{path}': {message}")]
    Read { path: String, message: String },

    /// Target could not be written
    #[error("failed to write '{path}': {message}")]
    Write { path: String, message: String },

    /// Dependency propagation returned to an asset already being propagated
    #[error("dependency cycle: {}", chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },
}

impl CompileError {
    pub fn failed(message: impl Into<String>) -> Self {
        CompileError::Failed(message.into())
    }
}

/// Everything a compiler may touch while compiling
pub struct CompilerContext<'a> {
    pub source: &'a dyn FileSource,
    pub target: &'a dyn FileSource,
    pub dependencies: &'a mut DependencyGraph,
    pub shaders: &'a mut ShaderDatabase,
    pub string_ids: &'a mut StringIdRepository,
    pub settings: &'a BuildSettings,
}

/// Per-type asset compiler
pub trait Compiler: Send {
    /// Compile `source` into `target`
    fn compile(&self, source: &str, target: &str, context: &mut CompilerContext<'_>) -> CompileResult;

    /// Whether `target` is stale; defaults to a timestamp comparison
    fn need_compile(&self, source: &str, target: &str, context: &CompilerContext<'_>) -> bool {
        is_target_stale(context.source, context.target, source, target)
    }

    /// Output type tag (target extension)
    fn output_type(&self) -> &str;

    /// Input type tag (source extension)
    fn source_type(&self) -> &str;
}

/// True if `target` is missing or strictly older than `source`.
///
/// A source whose timestamp cannot be read is never considered stale.
pub fn is_target_stale(
    source_fs: &dyn FileSource,
    target_fs: &dyn FileSource,
    source: &str,
    target: &str,
) -> bool {
    let Some(source_time) = source_fs.last_modified(source) else {
        tracing::warn!(source = %source, "Failed to retrieve last modified time for source file");
        return false;
    };
    match target_fs.last_modified(target) {
        Some(target_time) => target_time < source_time,
        None => true,
    }
}

/// Write a compiled asset to the target tree
pub fn write_asset(target_fs: &dyn FileSource, path: &str, data: &[u8]) -> CompileResult {
    target_fs.write(path, data).map_err(|e| CompileError::Write {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Read a source asset
pub fn read_asset(source_fs: &dyn FileSource, path: &str) -> Result<Vec<u8>, CompileError> {
    source_fs.read(path).map_err(|e| CompileError::Read {
        path: path.to_string(),
        message: e.to_string(),
    })
}
