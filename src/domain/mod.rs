//! Domain Layer
//!
//! The data model of an incremental build, without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Dependency graph, shader permutations, settings profiles, string ids
//! - `value_objects/` - Asset sources, file times, change events, string ids
//! - `ports/` - Interfaces for file sources, compilers, stores and build events
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Everything on disk is reached through the `FileSource` port
//! 2. **Single owner** - Stores are plain data mutated by one build thread

pub mod entities;
pub mod ports;
pub mod value_objects;
