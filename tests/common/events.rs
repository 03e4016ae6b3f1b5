use std::sync::Mutex;

use mason::{BuildEvent, BuildEventSink};

/// Keeps every build event for later inspection
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<BuildEvent>>);

impl BuildEventSink for RecordingSink {
    fn on_event(&self, event: BuildEvent) {
        self.0.lock().unwrap().push(event);
    }
}

#[allow(dead_code)]
impl RecordingSink {
    /// Sources handed to a compiler, draining the recorded events
    pub fn take_compiled(&self) -> Vec<String> {
        self.take()
            .into_iter()
            .filter_map(|event| match event {
                BuildEvent::Compile { source, .. } => Some(source),
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<BuildEvent> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}
