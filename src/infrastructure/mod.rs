//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File sources (local directory, in-memory)
//! - `repositories/` - JSON persistence of the metadata stores
//! - `compilers/` - Reference compilers selected by configuration
//! - `events/` - Build event sinks (log, NDJSON)
//! - `watch` - Directory watcher
//! - `console` - Command console server

pub mod compilers;
pub mod console;
pub mod events;
pub mod fs;
pub mod repositories;
pub mod watch;

// Re-export for convenience
pub use compilers::create_compiler;
pub use console::{ConsoleCommand, ConsoleServer, ReplyLevel};
pub use events::{JsonEventSink, LogEventSink};
pub use fs::{LocalFileSource, MemoryFileSource};
pub use repositories::{
    is_metadata_path, JsonDependencyRepository, JsonShaderRepository, JsonStringIdRepository,
    METADATA_DIR,
};
pub use watch::DirectoryWatcher;
