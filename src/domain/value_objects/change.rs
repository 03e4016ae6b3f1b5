//! Raw directory change events

/// What happened to a watched path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Created,
    Deleted,
    Modified,
    Renamed,
}

/// One raw change notification for a path relative to the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: String,
    pub action: ChangeAction,
}

impl ChangeEvent {
    pub fn new(path: impl Into<String>, action: ChangeAction) -> Self {
        Self {
            path: super::normalize_path(&path.into()),
            action,
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(path, ChangeAction::Modified)
    }
}
