//! Directory Watcher
//!
//! Turns `notify` events for the source tree into source-relative
//! [`ChangeEvent`]s on a channel.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::value_objects::{normalize_path, ChangeAction, ChangeEvent};
use crate::error::{MasonError, MasonResult};

/// Keeps the OS watch alive for as long as it is held
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl DirectoryWatcher {
    /// Watch `root` recursively; change events arrive on the returned receiver.
    pub fn start(root: &Path) -> MasonResult<(Self, Receiver<ChangeEvent>)> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let watch_error = |e: notify::Error| MasonError::Watch {
            path: root.clone(),
            message: e.to_string(),
        };

        let (tx, rx) = channel();
        let event_root = root.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for change in map_event(&event_root, &event) {
                        let _ = tx.send(change);
                    }
                }
                Err(e) => tracing::warn!("Directory watcher error: {e}"),
            },
            Config::default(),
        )
        .map_err(watch_error)?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(watch_error)?;
        tracing::debug!(root = %root.display(), "Watching source directory");

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Map a raw `notify` event to change actions on root-relative paths
pub fn map_event(root: &Path, event: &Event) -> Vec<ChangeEvent> {
    let action = match event.kind {
        EventKind::Create(_) => ChangeAction::Created,
        EventKind::Remove(_) => ChangeAction::Deleted,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeAction::Renamed,
        EventKind::Modify(_) => ChangeAction::Modified,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => ChangeAction::Modified,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter_map(|path| relative_path(root, path))
        .map(|path| ChangeEvent::new(path, action))
        .collect()
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let relative = normalize_path(&relative.to_string_lossy());
    (!relative.is_empty()).then_some(relative)
}
