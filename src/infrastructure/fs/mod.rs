//! File Source Implementations
//!
//! Concrete implementations of the FileSource port.

mod local;
mod memory;

pub use local::LocalFileSource;
pub use memory::MemoryFileSource;
