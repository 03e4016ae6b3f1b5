//! Repository Implementations
//!
//! Concrete implementations of the StoreRepository port. Every store lives
//! as pretty JSON inside the private `.builder/` directory of the source
//! tree.

mod dependency;
mod shader;
mod string_id;

pub use dependency::JsonDependencyRepository;
pub use shader::JsonShaderRepository;
pub use string_id::JsonStringIdRepository;

/// Private metadata directory, relative to the source root
pub const METADATA_DIR: &str = ".builder";

/// True if `path` (source-relative) lies inside the metadata directory
pub fn is_metadata_path(path: &str) -> bool {
    path == METADATA_DIR
        || path
            .strip_prefix(METADATA_DIR)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn write_pretty<T: serde::Serialize>(
    fs: &dyn crate::domain::ports::FileSource,
    path: &str,
    value: &T,
) -> crate::domain::ports::StoreResult<()> {
    let mut content = serde_json::to_vec_pretty(value)?;
    content.push(b'\n');
    fs.write(path, &content)?;
    Ok(())
}
