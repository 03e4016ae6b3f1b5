//! Build configuration
//!
//! `builder.settings` at the source root declares:
//! 1. `compilers` - which compiler handles which source type
//! 2. `ignore_list` - literal paths that are never compiled
//! 3. `setting_profiles` - named build settings, first one active
//! 4. `console_server_port` - optional command port (server mode)

mod loader;
mod types;

pub use loader::{load, parse, CONFIG_FILE};
pub use types::{parse_build_settings, BuilderConfig, CompilerConfig};
