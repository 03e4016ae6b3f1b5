//! JSON Event Sink
//!
//! Outputs build events as NDJSON for tooling and automation.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        let kind = event.kind();
        let json = match event {
            BuildEvent::CompileBatch { sources } => serde_json::json!({
                "event": kind,
                "count": sources.len(),
                "sources": sources,
            }),

            BuildEvent::Compile { source, target }
            | BuildEvent::CompileSkip { source, target }
            | BuildEvent::CompileSuccessful { source, target } => serde_json::json!({
                "event": kind,
                "source": source,
                "target": target,
            }),

            BuildEvent::CompileFailed {
                source,
                target,
                error,
            } => serde_json::json!({
                "event": kind,
                "source": source,
                "target": target,
                "error": error.to_string(),
            }),
        };

        self.write_event(json);
    }
}
