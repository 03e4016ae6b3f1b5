//! Configuration loading

use crate::domain::ports::FileSource;
use crate::error::{MasonError, MasonResult};

use super::types::{BuilderConfig, RawBuilderConfig};

/// Name of the build configuration file at the source root
pub const CONFIG_FILE: &str = "builder.settings";

/// Load `builder.settings` from the source root.
///
/// A missing file is fatal. Unknown top-level keys are reported as
/// warnings.
pub fn load(source: &dyn FileSource) -> MasonResult<BuilderConfig> {
    let path = source.full_path(CONFIG_FILE);
    let content = match source.read_to_string(CONFIG_FILE) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return Err(MasonError::ConfigNotFound { path }),
        Err(e) => return Err(e.into()),
    };

    let (config, unknown_keys) = parse(&content).map_err(|e| MasonError::InvalidConfig {
        path: path.clone(),
        message: e.to_string(),
    })?;
    for key in unknown_keys {
        tracing::warn!(file = %path.display(), "Unknown configuration key '{key}'");
    }
    Ok(config)
}

/// Parse configuration text, returning it along with unknown key paths.
pub fn parse(content: &str) -> Result<(BuilderConfig, Vec<String>), serde_json::Error> {
    let mut unknown_keys = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(content);
    let raw: RawBuilderConfig = serde_ignored::deserialize(&mut deserializer, |path| {
        unknown_keys.push(path.to_string());
    })?;
    deserializer.end()?;
    Ok((raw.into(), unknown_keys))
}

