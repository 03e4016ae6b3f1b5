//! Material compiler
//!
//! A material references one shader permutation and a set of textures:
//!
//! ```json
//! {
//!     "shader": { "name": "shaders/lit", "options": ["SKINNED"], "variables": [...] },
//!     "textures": { "diffuse_map": "textures/stone.png" }
//! }
//! ```
//!
//! Compiling requests the permutation from the shader database and records
//! the shader source and every texture as dependencies of the material.

use serde_json::{json, Map, Value};

use super::{read_json_object, to_compact_json};
use crate::domain::entities::SHADER_SOURCE_EXTENSION;
use crate::domain::ports::{write_asset, CompileError, CompileResult, Compiler, CompilerContext};
use crate::domain::value_objects::{normalize_path, trim_extension};

/// Shader variable types a material may bind, with their component count
const VARIABLE_TYPES: &[(&str, usize)] = &[
    ("scalar", 1),
    ("vector2", 2),
    ("vector3", 3),
    ("vector4", 4),
    ("matrix4x4", 16),
];

pub struct MaterialCompiler {
    source_type: String,
    output_type: String,
}

impl MaterialCompiler {
    pub fn new(source_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            output_type: output_type.into(),
        }
    }

    fn compile_textures(
        source: &str,
        textures: Option<&Value>,
        context: &mut CompilerContext<'_>,
    ) -> Vec<Value> {
        let Some(textures) = textures.and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut compiled = Vec::new();
        for (slot, texture) in textures {
            let Some(texture) = texture.as_str() else {
                tracing::warn!(material = %source, slot = %slot, "Texture path is not a string, skipping");
                continue;
            };
            let texture = normalize_path(texture);
            context.dependencies.add_dependent(&texture, source);

            let slot_id = context.string_ids.record(slot);
            let texture_id = context.string_ids.record(trim_extension(&texture));
            compiled.push(json!({
                "slot": format!("0x{:08x}", slot_id.to_u32()),
                "texture": texture_id.to_string(),
            }));
        }
        compiled
    }

    fn compile_shader(
        source: &str,
        shader: &Map<String, Value>,
        context: &mut CompilerContext<'_>,
    ) -> Result<Option<String>, CompileError> {
        let Some(name) = shader.get("name").and_then(Value::as_str) else {
            return Ok(None);
        };
        let options: Vec<&str> = shader
            .get("options")
            .and_then(Value::as_array)
            .map(|options| options.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if !context
            .shaders
            .preload_permutation(context.source, name, &options)
        {
            return Err(CompileError::failed("Failed to preload shader."));
        }

        let shader_path = format!("{}.{SHADER_SOURCE_EXTENSION}", normalize_path(name));
        context.dependencies.add_dependent(&shader_path, source);

        let permutation = context
            .shaders
            .shader(name)
            .map(|shader| shader.build_name(&options))
            .ok_or_else(|| CompileError::failed(format!("shader '{name}' not loaded")))?;
        context.string_ids.record(&permutation);
        Ok(Some(permutation))
    }

    fn compile_variables(source: &str, variables: Option<&Value>) -> Vec<Value> {
        let Some(variables) = variables.and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut compiled = Vec::new();
        for variable in variables {
            let (Some(name), Some(var_type)) = (
                variable.get("name").and_then(Value::as_str),
                variable.get("type").and_then(Value::as_str),
            ) else {
                continue;
            };
            let Some((_, components)) = VARIABLE_TYPES.iter().find(|(t, _)| *t == var_type) else {
                tracing::warn!(material = %source, "Variable type '{var_type}' not recognized");
                continue;
            };
            let value = flatten_numbers(variable.get("value"))
                .filter(|values| values.len() == *components)
                .unwrap_or_else(|| default_value(var_type, *components));
            compiled.push(json!({ "name": name, "type": var_type, "value": value }));
        }
        compiled
    }
}

/// Numbers of a scalar, array or array of arrays, in row order
fn flatten_numbers(value: Option<&Value>) -> Option<Vec<f64>> {
    match value? {
        Value::Number(n) => n.as_f64().map(|n| vec![n]),
        Value::Array(items) => {
            let mut numbers = Vec::new();
            for item in items {
                numbers.extend(flatten_numbers(Some(item))?);
            }
            Some(numbers)
        }
        _ => None,
    }
}

fn default_value(var_type: &str, components: usize) -> Vec<f64> {
    if var_type == "matrix4x4" {
        (0..16).map(|i| if i % 5 == 0 { 1.0 } else { 0.0 }).collect()
    } else {
        vec![0.0; components]
    }
}

impl Compiler for MaterialCompiler {
    fn compile(&self, source: &str, target: &str, context: &mut CompilerContext<'_>) -> CompileResult {
        let material = read_json_object(context.source, source)?;

        let textures = Self::compile_textures(source, material.get("textures"), context);

        let (shader, variables) = match material.get("shader").and_then(Value::as_object) {
            Some(shader) => (
                Self::compile_shader(source, shader, context)?,
                Self::compile_variables(source, shader.get("variables")),
            ),
            None => {
                tracing::warn!(material = %source, "Material has not specified any shader");
                (None, Vec::new())
            }
        };

        let name = normalize_path(trim_extension(source));
        let compiled = json!({
            "name": context.string_ids.record(&name).to_string(),
            "shader": shader,
            "textures": textures,
            "variables": variables,
        });
        write_asset(context.target, target, &to_compact_json(&compiled)?)
    }

    fn output_type(&self) -> &str {
        &self.output_type
    }

    fn source_type(&self) -> &str {
        &self.source_type
    }
}
