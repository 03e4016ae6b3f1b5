//! Asset source value object
//!
//! Every asset is addressed by a path relative to the source root that always
//! uses `/` as separator, plus a type tag derived from its extension.

use std::fmt;

/// Normalize a path for storage and comparison (always use forward slashes).
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Extension of the last path segment, or `""` if there is none.
///
/// Leading dots do not start an extension (`.gitignore` has no type).
pub fn extension_of(path: &str) -> &str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &file_name[idx + 1..],
    }
}

/// Path with the extension of its last segment removed.
pub fn trim_extension(path: &str) -> &str {
    let ext = extension_of(path);
    if ext.is_empty() {
        path
    } else {
        &path[..path.len() - ext.len() - 1]
    }
}

/// A source asset: normalized path plus type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetSource {
    path: String,
    source_type: String,
}

impl AssetSource {
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = normalize_path(path.as_ref());
        let source_type = extension_of(&path).to_string();
        Self { path, source_type }
    }

    /// Normalized source path, relative to the source root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Type tag (file extension), empty for files without one
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Source path without its extension
    pub fn name(&self) -> &str {
        trim_extension(&self.path)
    }

    /// Target path for a compiler producing `output_type`
    pub fn target_path(&self, output_type: &str) -> String {
        format!("{}.{}", self.name(), output_type)
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for AssetSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetSource {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_source_normalizes_separators() {
        let asset = AssetSource::new("textures\\stone\\wall.png");
        assert_eq!(asset.path(), "textures/stone/wall.png");
        assert_eq!(asset.source_type(), "png");
    }

    #[test]
    fn asset_source_without_extension_has_empty_type() {
        assert_eq!(AssetSource::new("docs/README").source_type(), "");
        assert_eq!(AssetSource::new("scripts/.gitignore").source_type(), "");
    }

    #[test]
    fn extension_only_looks_at_last_segment() {
        assert_eq!(extension_of("dir.v2/file"), "");
        assert_eq!(extension_of("dir.v2/file.material"), "material");
    }

    #[test]
    fn target_path_replaces_extension() {
        let asset = AssetSource::new("shaders/deferred.shader_src");
        assert_eq!(asset.name(), "shaders/deferred");
        assert_eq!(asset.target_path("shader"), "shaders/deferred.shader");
    }

    #[test]
    fn trim_extension_keeps_extensionless_paths() {
        assert_eq!(trim_extension("a/b"), "a/b");
        assert_eq!(trim_extension("a/b.c.d"), "a/b.c");
    }
}
