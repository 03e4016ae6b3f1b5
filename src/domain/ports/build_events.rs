//! Build Event Port
//!
//! Observable interface for compile batches. Receives one event per
//! decision the compiler system makes, so front ends can show progress,
//! stream NDJSON or stay silent.

use crate::domain::ports::CompileError;

/// Event emitted while compiling
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A batch of more than one source is about to be processed
    CompileBatch { sources: Vec<String> },

    /// Compilation of a source started
    Compile { source: String, target: String },

    /// Source was up to date, or is a dependency-only file (empty target)
    CompileSkip { source: String, target: String },

    /// Source compiled
    CompileSuccessful { source: String, target: String },

    /// Source failed to compile
    CompileFailed {
        source: String,
        target: String,
        error: CompileError,
    },
}

impl BuildEvent {
    /// Event name used in event streams
    pub fn kind(&self) -> &'static str {
        match self {
            BuildEvent::CompileBatch { .. } => "compile_batch",
            BuildEvent::Compile { .. } => "compile",
            BuildEvent::CompileSkip { .. } => "compile_skip",
            BuildEvent::CompileSuccessful { .. } => "compile_successful",
            BuildEvent::CompileFailed { .. } => "compile_failed",
        }
    }
}

/// Trait for receiving build events
///
/// Implementations:
/// - LogEventSink: tracing output
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: silent
pub trait BuildEventSink: Send + Sync {
    fn on_event(&self, event: BuildEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}
}
