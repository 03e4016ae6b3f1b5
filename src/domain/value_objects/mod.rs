//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod asset_source;
mod change;
mod file_time;
mod string_id;

pub use asset_source::{extension_of, normalize_path, trim_extension, AssetSource};
pub use change::{ChangeAction, ChangeEvent};
pub use file_time::FileTime;
pub use string_id::StringId64;
