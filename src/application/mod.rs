//! Application Layer
//!
//! Use cases that orchestrate the build.
//! This layer:
//! - Depends on the Domain layer (entities, ports)
//! - Coordinates compilers, stores and file sources from Infrastructure
//!
//! ## Use Cases
//!
//! - `CompilerSystem` - Compiler registry and batch compile decisions
//! - `BuildServer` - Initial rebuild, change watching and queued actions

pub mod build_server;
pub mod compiler_system;

pub use build_server::{
    BuildServer, BuildServerHandle, BuildState, BuilderParams, ChangeFilter, PendingAction,
    SETTLE_DELAY,
};
pub use compiler_system::{BatchReport, BuildStores, CompilerSystem};
