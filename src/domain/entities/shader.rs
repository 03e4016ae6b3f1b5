//! Shader permutation store
//!
//! Shader-like assets declare a list of options; every combination that is
//! actually requested (typically by a material) becomes a permutation that the
//! shader compiler has to emit. Requests arriving after a shader was compiled
//! mark it dirty so the build server can schedule it again without a rescan.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::ports::FileSource;
use crate::domain::value_objects::{normalize_path, trim_extension, AssetSource};

/// Extension of shader source files
pub const SHADER_SOURCE_EXTENSION: &str = "shader_src";

/// A requested permutation; options are stored in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permutation {
    options: Vec<String>,
}

impl Permutation {
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Permutations keyed by canonical name
pub type PermutationSet = BTreeMap<String, Permutation>;

/// One shader and the permutations requested for it
#[derive(Debug, Clone)]
pub struct Shader {
    name: String,
    source: AssetSource,
    config: Value,
    permutations: PermutationSet,
    dirty: bool,
}

impl Shader {
    /// Create a shader from its source path and parsed configuration.
    ///
    /// The zero-option permutation always exists.
    pub fn new(source_path: &str, config: Value) -> Self {
        let source = AssetSource::new(source_path);
        let name = source.name().to_string();
        let mut permutations = PermutationSet::new();
        permutations.insert(name.clone(), Permutation::default());

        let shader = Self {
            name,
            source,
            config,
            permutations,
            dirty: false,
        };
        shader.warn_invalid_declarations();
        shader
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn permutations(&self) -> &PermutationSet {
        &self.permutations
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Option names declared by the shader configuration, in declaration order
    pub fn declared_options(&self) -> Vec<&str> {
        self.config
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| option.get("define").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True if every requested option is declared by this shader
    pub fn is_valid_options<S: AsRef<str>>(&self, options: &[S]) -> bool {
        let declared = self.declared_options();
        options
            .iter()
            .all(|option| declared.contains(&option.as_ref()))
    }

    /// Canonical permutation name: shader name followed by `:OPTION` for each
    /// declared option present in `options`, in declaration order.
    pub fn build_name<S: AsRef<str>>(&self, options: &[S]) -> String {
        let mut name = self.name.clone();
        for option in self.canonical_options(options) {
            name.push(':');
            name.push_str(&option);
        }
        name
    }

    /// Request a permutation.
    ///
    /// Returns `false` only when an option is not declared, in which case
    /// nothing is changed. Newly inserted permutations mark the shader dirty.
    pub fn preload_permutation<S: AsRef<str>>(&mut self, options: &[S]) -> bool {
        if options.is_empty() {
            return true;
        }
        if !self.is_valid_options(options) {
            return false;
        }

        let name = self.build_name(options);
        if !self.permutations.contains_key(&name) {
            let options = self.canonical_options(options);
            self.permutations.insert(name, Permutation { options });
            self.dirty = true;
        }
        true
    }

    /// Replace the configuration and drop permutations it no longer allows.
    pub fn update(&mut self, config: Value) {
        self.config = config;
        self.warn_invalid_declarations();

        let previous = std::mem::take(&mut self.permutations);
        for (name, permutation) in previous {
            if !self.is_valid_options(&permutation.options) {
                tracing::warn!(shader = %self.name, permutation = %name, "Invalid permutation in shader, dropping it");
                continue;
            }
            let name = self.build_name(&permutation.options);
            let options = self.canonical_options(&permutation.options);
            self.permutations.insert(name, Permutation { options });
        }
    }

    fn canonical_options<S: AsRef<str>>(&self, options: &[S]) -> Vec<String> {
        self.declared_options()
            .into_iter()
            .filter(|declared| options.iter().any(|o| o.as_ref() == *declared))
            .map(str::to_string)
            .collect()
    }

    fn warn_invalid_declarations(&self) {
        let Some(options) = self.config.get("options").and_then(Value::as_array) else {
            return;
        };
        for option in options {
            if option.get("define").and_then(Value::as_str).is_none() {
                tracing::warn!(shader = %self.name, "Invalid option declaration in shader, expected {{\"define\": \"NAME\"}}");
            }
        }
    }
}

/// All shaders known to the build, keyed by shader name (source path
/// without extension).
#[derive(Debug, Clone, Default)]
pub struct ShaderDatabase {
    shaders: BTreeMap<String, Shader>,
}

impl ShaderDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<shader_name>.shader_src` unless the shader is already known.
    ///
    /// Returns `true` if the shader is available afterwards.
    pub fn preload_shader(&mut self, source: &dyn FileSource, shader_name: &str) -> bool {
        let shader_name = normalize_path(shader_name);
        if self.shaders.contains_key(&shader_name) {
            return true;
        }

        let shader_path = format!("{shader_name}.{SHADER_SOURCE_EXTENSION}");
        let config = match read_shader_config(source, &shader_path) {
            Ok(config) => config,
            Err(message) => {
                tracing::warn!(shader = %shader_path, "Failed to preload shader: {message}");
                return false;
            }
        };

        self.insert_shader(&shader_path, config);
        tracing::info!(shader = %shader_name, "Shader successfully preloaded");
        true
    }

    /// Request a permutation of a shader, loading the shader first if needed.
    pub fn preload_permutation<S: AsRef<str>>(
        &mut self,
        source: &dyn FileSource,
        shader_name: &str,
        options: &[S],
    ) -> bool {
        if !self.preload_shader(source, shader_name) {
            return false;
        }
        let Some(shader) = self.shaders.get_mut(&normalize_path(shader_name)) else {
            return false;
        };
        if !shader.preload_permutation(options) {
            tracing::warn!(shader = %shader_name, "Failed to preload shader permutation: invalid shader options");
            return false;
        }
        tracing::debug!(permutation = %shader.build_name(options), "Shader permutation preloaded");
        true
    }

    /// Insert a shader, or update the configuration of a known one
    pub fn insert_shader(&mut self, source_path: &str, config: Value) {
        let name = normalize_path(trim_extension(source_path));
        match self.shaders.get_mut(&name) {
            Some(shader) => shader.update(config),
            None => {
                self.shaders.insert(name, Shader::new(source_path, config));
            }
        }
    }

    pub fn has_shader(&self, shader_name: &str) -> bool {
        self.shaders.contains_key(&normalize_path(shader_name))
    }

    pub fn shader(&self, shader_name: &str) -> Option<&Shader> {
        self.shaders.get(&normalize_path(shader_name))
    }

    pub fn shader_mut(&mut self, shader_name: &str) -> Option<&mut Shader> {
        self.shaders.get_mut(&normalize_path(shader_name))
    }

    pub fn shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.values()
    }

    /// True if any shader has permutations that were not compiled yet
    pub fn is_dirty(&self) -> bool {
        self.shaders.values().any(Shader::is_dirty)
    }

    /// Sources of every dirty shader
    pub fn dirty_shaders(&self) -> Vec<AssetSource> {
        self.shaders
            .values()
            .filter(|shader| shader.is_dirty())
            .map(|shader| shader.source().clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.shaders.clear();
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

/// Read and parse a shader source file; it must hold a JSON object.
pub fn read_shader_config(source: &dyn FileSource, path: &str) -> Result<Value, String> {
    let data = source.read(path).map_err(|e| e.to_string())?;
    let config: Value = serde_json::from_slice(&data).map_err(|e| e.to_string())?;
    if !config.is_object() {
        return Err(format!("'{path}' is not a JSON object"));
    }
    Ok(config)
}
