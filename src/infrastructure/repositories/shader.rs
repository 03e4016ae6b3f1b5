//! JSON Shader Repository
//!
//! Persists the requested permutations of every shader as
//! `{ "<shader>": { "permutations": [["A", "B"], []] } }`. Shader
//! configuration is not stored; it is re-read from the shader source on
//! load.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{write_pretty, METADATA_DIR};
use crate::domain::entities::{read_shader_config, ShaderDatabase, SHADER_SOURCE_EXTENSION};
use crate::domain::ports::{FileSource, StoreRepository, StoreResult};

#[derive(Debug, Serialize, Deserialize)]
struct JsonShaderEntry {
    #[serde(default)]
    permutations: Vec<Vec<String>>,
}

/// Shader database stored at `.builder/shader_database`
pub struct JsonShaderRepository {
    fs: Arc<dyn FileSource>,
    path: String,
}

impl JsonShaderRepository {
    pub fn new(fs: Arc<dyn FileSource>) -> Self {
        Self {
            fs,
            path: format!("{METADATA_DIR}/shader_database"),
        }
    }
}

impl StoreRepository for JsonShaderRepository {
    type Store = ShaderDatabase;

    fn load(&self) -> StoreResult<ShaderDatabase> {
        let content = self.fs.read(&self.path)?;
        let entries: BTreeMap<String, JsonShaderEntry> = serde_json::from_slice(&content)?;

        let mut database = ShaderDatabase::new();
        for (name, entry) in entries {
            let source_path = format!("{name}.{SHADER_SOURCE_EXTENSION}");
            let config = match read_shader_config(self.fs.as_ref(), &source_path) {
                Ok(config) => config,
                Err(message) => {
                    tracing::warn!(shader = %name, "Failed to load shader: {message}");
                    continue;
                }
            };
            database.insert_shader(&source_path, config);

            let Some(shader) = database.shader_mut(&name) else {
                continue;
            };
            for options in &entry.permutations {
                if !shader.preload_permutation(options) {
                    tracing::warn!(shader = %name, options = ?options, "Dropping stored permutation with undeclared options");
                }
            }
            shader.set_dirty(false);
        }
        Ok(database)
    }

    fn save(&self, database: &ShaderDatabase) -> StoreResult<()> {
        let entries: BTreeMap<&str, JsonShaderEntry> = database
            .shaders()
            .map(|shader| {
                let permutations = shader
                    .permutations()
                    .values()
                    .map(|permutation| permutation.options().to_vec())
                    .collect();
                (shader.name(), JsonShaderEntry { permutations })
            })
            .collect();
        write_pretty(self.fs.as_ref(), &self.path, &entries)
    }
}
