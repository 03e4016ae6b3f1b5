//! Common test utilities for Mason scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated source and target trees in a temp directory
//! - Fixtures: reusable `builder.settings` and asset content
//! - `RecordingSink`: captures build events

pub mod env;
pub mod events;
pub mod fixtures;

pub use env::*;
pub use events::*;
pub use fixtures::*;
