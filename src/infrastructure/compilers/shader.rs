//! Shader compiler
//!
//! Expands every requested permutation of a shader into one shader library.
//! A shader source looks like:
//!
//! ```json
//! {
//!     "options": [{ "define": "SKINNED" }],
//!     "includes": ["common.hlsl"],
//!     "code": "float4 main() { ... }"
//! }
//! ```
//!
//! Includes are resolved relative to the shader's directory and recorded as
//! dependencies, so editing one recompiles every shader that includes it.

use serde_json::{json, Value};

use super::to_compact_json;
use crate::domain::entities::{read_shader_config, Shader};
use crate::domain::ports::{
    read_asset, write_asset, CompileError, CompileResult, Compiler, CompilerContext,
};
use crate::domain::value_objects::{normalize_path, trim_extension};

pub struct ShaderCompiler {
    source_type: String,
    output_type: String,
}

impl ShaderCompiler {
    pub fn new(source_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            output_type: output_type.into(),
        }
    }

    /// Read every include and record it as a dependency of `source`
    fn read_includes(
        source: &str,
        config: &Value,
        context: &mut CompilerContext<'_>,
    ) -> Result<String, CompileError> {
        let directory = match source.rfind('/') {
            Some(index) => &source[..=index],
            None => "",
        };

        let mut text = String::new();
        let includes = config.get("includes").and_then(Value::as_array);
        for include in includes.into_iter().flatten().filter_map(Value::as_str) {
            let path = normalize_path(&format!("{directory}{include}"));
            let data = read_asset(context.source, &path)?;
            context.dependencies.add_dependent(&path, source);

            text.push_str(&String::from_utf8_lossy(&data));
            if !text.ends_with('\n') {
                text.push('\n');
            }
        }
        Ok(text)
    }

    fn compile_permutation(
        shader: &Shader,
        options: &[String],
        body: &str,
        context: &mut CompilerContext<'_>,
    ) -> Value {
        let name = shader.build_name(options);
        let mut code = String::new();
        for option in options {
            code.push_str(&format!("#define {option} 1\n"));
        }
        if context.settings.debug {
            code.push_str("#define DEBUG 1\n");
        }
        code.push_str(body);

        tracing::info!(permutation = %name, "Shader permutation compiled");
        json!({
            "name": name,
            "id": context.string_ids.record(&name).to_string(),
            "defines": options,
            "code": code,
        })
    }
}

impl Compiler for ShaderCompiler {
    fn compile(&self, source: &str, target: &str, context: &mut CompilerContext<'_>) -> CompileResult {
        let config = read_shader_config(context.source, source).map_err(CompileError::Failed)?;
        let name = normalize_path(trim_extension(source));

        context.shaders.insert_shader(source, config.clone());
        let shader = context
            .shaders
            .shader_mut(&name)
            .ok_or_else(|| CompileError::failed(format!("shader '{name}' not registered")))?;
        shader.set_dirty(false);
        let shader = shader.clone();

        let mut body = Self::read_includes(source, &config, context)?;
        if let Some(code) = config.get("code").and_then(Value::as_str) {
            body.push_str(code);
        }

        let mut permutations = Vec::with_capacity(shader.permutations().len());
        for permutation in shader.permutations().values() {
            permutations.push(Self::compile_permutation(
                &shader,
                permutation.options(),
                &body,
                context,
            ));
        }

        let library = json!({
            "name": name,
            "optimization_level": context.settings.optimization_level,
            "debug": context.settings.debug,
            "permutations": permutations,
        });
        write_asset(context.target, target, &to_compact_json(&library)?)
    }

    fn output_type(&self) -> &str {
        &self.output_type
    }

    fn source_type(&self) -> &str {
        &self.source_type
    }
}
