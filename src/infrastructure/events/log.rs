//! Logging Event Sink
//!
//! Default front end: reports build progress through `tracing`.

use crate::domain::ports::{BuildEvent, BuildEventSink};

pub struct LogEventSink;

impl BuildEventSink for LogEventSink {
    fn on_event(&self, event: BuildEvent) {
        match event {
            BuildEvent::CompileBatch { sources } => {
                tracing::info!(count = sources.len(), "Compiling batch");
            }
            BuildEvent::Compile { source, .. } => {
                tracing::info!(source = %source, "Compiling");
            }
            BuildEvent::CompileSkip { source, .. } => {
                tracing::debug!(source = %source, "Skipped");
            }
            BuildEvent::CompileSuccessful { source, target } => {
                tracing::info!(source = %source, target = %target, "Compiled");
            }
            BuildEvent::CompileFailed { source, error, .. } => {
                tracing::error!(source = %source, "Compilation failed: {error}");
            }
        }
    }
}
