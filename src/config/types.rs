//! Configuration type definitions

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::entities::{BuildSettings, SettingProfiles, MAX_OPTIMIZATION_LEVEL};

/// One `compilers` entry: which implementation handles which source type
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    /// Selects the compiler implementation
    pub action: String,
    /// Source extension the compiler is registered for
    pub source_type: String,
    /// Output extension, defaults per action when absent
    pub output_type: Option<String>,
    /// The full entry, for compiler-specific options
    pub options: Value,
}

impl CompilerConfig {
    /// Parse one entry; `action` and `source_type` are required strings.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let Some(object) = value.as_object() else {
            return Err("compiler entry is not an object".to_string());
        };
        let action = required_str(object, "action")?;
        let source_type = required_str(object, "source_type")?;
        let output_type = object
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            action,
            source_type,
            output_type,
            options: value.clone(),
        })
    }

    pub fn new(action: &str, source_type: &str) -> Self {
        Self {
            action: action.to_string(),
            source_type: source_type.to_string(),
            output_type: None,
            options: Value::Object(Map::new()),
        }
    }

    pub fn with_output_type(mut self, output_type: &str) -> Self {
        self.output_type = Some(output_type.to_string());
        self
    }
}

fn required_str(object: &Map<String, Value>, key: &str) -> Result<String, String> {
    match object.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(format!("compiler entry is missing '{key}'")),
    }
}

/// Parsed `builder.settings`
#[derive(Debug, Clone, Default)]
pub struct BuilderConfig {
    pub compilers: Vec<CompilerConfig>,
    pub ignore_list: Vec<String>,
    pub setting_profiles: SettingProfiles,
    pub console_server_port: Option<u16>,
}

/// On-disk shape; entries needing per-item validation stay as raw values
#[derive(Debug, Deserialize)]
pub(crate) struct RawBuilderConfig {
    #[serde(default)]
    pub compilers: Vec<Value>,
    #[serde(default)]
    pub ignore_list: Vec<String>,
    #[serde(default)]
    pub setting_profiles: Map<String, Value>,
    #[serde(default)]
    pub console_server_port: Option<u16>,
}

impl From<RawBuilderConfig> for BuilderConfig {
    fn from(raw: RawBuilderConfig) -> Self {
        let compilers = raw
            .compilers
            .iter()
            .filter_map(|entry| match CompilerConfig::from_value(entry) {
                Ok(config) => Some(config),
                Err(message) => {
                    tracing::warn!("Skipping compiler: {message}");
                    None
                }
            })
            .collect();

        let profiles = raw
            .setting_profiles
            .iter()
            .map(|(name, value)| (name.clone(), parse_build_settings(name, value)))
            .collect();

        Self {
            compilers,
            ignore_list: raw.ignore_list,
            setting_profiles: SettingProfiles::new(profiles),
            console_server_port: raw.console_server_port,
        }
    }
}

/// Read one profile. Missing or mistyped fields keep their defaults.
pub fn parse_build_settings(profile: &str, value: &Value) -> BuildSettings {
    let mut settings = BuildSettings::default();

    let level = value
        .get("optimization_level")
        .or_else(|| value.get("hlsl_optimization_level"));
    if let Some(level) = level {
        match level.as_u64() {
            Some(level) if level <= u64::from(MAX_OPTIMIZATION_LEVEL) => {
                settings.optimization_level = level as u32;
            }
            _ => {
                tracing::warn!(
                    profile = %profile,
                    "Invalid optimization level {level}, expected 0 to {MAX_OPTIMIZATION_LEVEL}, using 0"
                );
            }
        }
    }

    if let Some(debug) = value
        .get("debug")
        .or_else(|| value.get("hlsl_debug"))
        .and_then(Value::as_bool)
    {
        settings.debug = debug;
    }

    settings
}
