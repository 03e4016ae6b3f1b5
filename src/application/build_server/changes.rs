//! Raw change event filtering
//!
//! The OS reports a single save as two back-to-back `Modified` events. The
//! first one for a path is withheld; the second one emits the change.

use std::sync::mpsc::Receiver;

use crate::domain::value_objects::{AssetSource, ChangeAction, ChangeEvent};
use crate::infrastructure::is_metadata_path;

#[derive(Debug, Default)]
pub struct ChangeFilter {
    pending: Vec<String>,
}

impl ChangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event; returns the path if it should be compiled
    pub fn filter(&mut self, event: ChangeEvent) -> Option<String> {
        if is_metadata_path(&event.path) {
            return None;
        }
        if event.action != ChangeAction::Modified {
            return Some(event.path);
        }

        match self.pending.iter().position(|p| *p == event.path) {
            Some(index) => {
                self.pending.swap_remove(index);
                Some(event.path)
            }
            None => {
                self.pending.push(event.path);
                None
            }
        }
    }

    /// Drain every queued event into a batch without duplicates
    pub fn collect(&mut self, events: &Receiver<ChangeEvent>) -> Vec<AssetSource> {
        let mut batch: Vec<AssetSource> = Vec::new();
        for event in events.try_iter() {
            let Some(path) = self.filter(event) else {
                continue;
            };
            if !batch.iter().any(|source| source.path() == path) {
                batch.push(AssetSource::new(path));
            }
        }
        batch
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }
}
