//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod compiler;
pub mod file_source;
pub mod store_repository;

pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink};
pub use compiler::{
    is_target_stale, read_asset, write_asset, CompileError, CompileResult, Compiler,
    CompilerContext,
};
pub use file_source::{wildcard_match, FileSource, FsError, FsResult};
pub use store_repository::{StoreError, StoreRepository, StoreResult};
