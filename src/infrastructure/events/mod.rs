//! Event Sink Implementations
//!
//! Provides concrete implementations of BuildEventSink:
//! - LogEventSink: tracing output (default)
//! - JsonEventSink: NDJSON output for tooling

mod json;
mod log;

pub use json::JsonEventSink;
pub use log::LogEventSink;
