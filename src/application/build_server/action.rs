//! Cross-thread control of a running build server

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Work requested from outside the build loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Clear the stores and recompile everything
    FullRebuild,
    /// Recompile whatever is stale
    Scan,
    /// Activate another settings profile, then rebuild everything
    ChangeProfile(String),
}

/// Build loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BuildState {
    Idle = 0,
    Scanning = 1,
    Compiling = 2,
    Stopping = 3,
}

impl BuildState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => BuildState::Scanning,
            2 => BuildState::Compiling,
            3 => BuildState::Stopping,
            _ => BuildState::Idle,
        }
    }
}

/// Thread-safe handle to a build server, cheap to clone
#[derive(Debug, Clone)]
pub struct BuildServerHandle {
    actions: Sender<PendingAction>,
    stop: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl BuildServerHandle {
    pub(super) fn new(actions: Sender<PendingAction>) -> Self {
        Self {
            actions,
            stop: Arc::new(AtomicBool::new(false)),
            state: Arc::new(AtomicU8::new(BuildState::Idle as u8)),
        }
    }

    fn queue(&self, action: PendingAction) {
        if self.actions.send(action).is_err() {
            tracing::debug!("Build server is gone, dropping queued action");
        }
    }

    pub fn queue_full_rebuild(&self) {
        self.queue(PendingAction::FullRebuild);
    }

    pub fn queue_scan(&self) {
        self.queue(PendingAction::Scan);
    }

    /// Queue a profile change; the server rebuilds everything afterwards
    pub fn set_active_profile(&self, name: &str) {
        self.queue(PendingAction::ChangeProfile(name.to_string()));
    }

    /// Ask the loop to exit after the current asset
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> BuildState {
        BuildState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub(super) fn set_state(&self, state: BuildState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub(super) fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }
}
