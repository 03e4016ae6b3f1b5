//! Build Server
//!
//! The orchestrator loop: watches for changed files, compiles them, keeps
//! shader permutations up to date and executes queued actions.

mod action;
mod changes;
mod server;

pub use action::{BuildServerHandle, BuildState, PendingAction};
pub use changes::ChangeFilter;
pub use server::{BuildServer, BuilderParams, SETTLE_DELAY};
