//! Mason - incremental asset build orchestrator
//!
//! Mason turns a tree of source assets into compiled target assets. It keeps
//! a dependency graph between assets, tracks shader permutations requested
//! by materials, and recompiles only what changed, either once or while
//! watching the source tree.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    BatchReport, BuildServer, BuildServerHandle, BuildState, BuildStores, BuilderParams,
    CompilerSystem,
};
pub use config::{BuilderConfig, CompilerConfig};
pub use domain::ports::{BuildEvent, BuildEventSink, CompileError, Compiler, FileSource};
pub use error::{MasonError, MasonResult};
pub use infrastructure::{JsonEventSink, LocalFileSource, LogEventSink, MemoryFileSource};
