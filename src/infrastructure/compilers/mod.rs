//! Reference Compilers
//!
//! Concrete implementations of the Compiler port, selected by the `action`
//! of a `compilers` configuration entry.

mod copy;
mod material;
mod package;
mod shader;

pub use copy::CopyCompiler;
pub use material::MaterialCompiler;
pub use package::PackageCompiler;
pub use shader::ShaderCompiler;

use serde_json::Value;

use crate::config::CompilerConfig;
use crate::domain::ports::{read_asset, CompileError, Compiler};

/// Create the compiler for a configuration entry; `None` for unknown actions.
pub fn create_compiler(config: &CompilerConfig) -> Option<Box<dyn Compiler>> {
    let source_type = config.source_type.clone();
    let output_type = |default: &str| {
        config
            .output_type
            .clone()
            .unwrap_or_else(|| default.to_string())
    };

    let compiler: Box<dyn Compiler> = match config.action.as_str() {
        "copy" => Box::new(CopyCompiler::new(
            source_type.clone(),
            output_type(&source_type),
        )),
        "package_compiler" => Box::new(PackageCompiler::new(source_type, output_type("package"))),
        "material_compiler" => {
            Box::new(MaterialCompiler::new(source_type, output_type("material")))
        }
        "shader_compiler" => Box::new(ShaderCompiler::new(source_type, output_type("shader"))),
        _ => return None,
    };
    Some(compiler)
}

/// Read a source asset as a JSON object
fn read_json_object(
    source_fs: &dyn crate::domain::ports::FileSource,
    path: &str,
) -> Result<serde_json::Map<String, Value>, CompileError> {
    let data = read_asset(source_fs, path)?;
    match serde_json::from_slice(&data) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(CompileError::failed(format!(
            "'{path}': expected a JSON object"
        ))),
        Err(e) => Err(CompileError::failed(format!("'{path}': {e}"))),
    }
}

fn to_compact_json(value: &Value) -> Result<Vec<u8>, CompileError> {
    serde_json::to_vec(value).map_err(|e| CompileError::failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_actions_are_created() {
        let copy = create_compiler(&CompilerConfig::new("copy", "png")).unwrap();
        assert_eq!(copy.source_type(), "png");
        assert_eq!(copy.output_type(), "png");

        let material = create_compiler(&CompilerConfig::new("material_compiler", "material")).unwrap();
        assert_eq!(material.output_type(), "material");

        let shader = create_compiler(&CompilerConfig::new("shader_compiler", "shader_src")).unwrap();
        assert_eq!(shader.output_type(), "shader");

        let package = create_compiler(
            &CompilerConfig::new("package_compiler", "package_src").with_output_type("pkg"),
        )
        .unwrap();
        assert_eq!(package.output_type(), "pkg");
    }

    #[test]
    fn unknown_action_is_none() {
        assert!(create_compiler(&CompilerConfig::new("texture_compiler", "dds")).is_none());
    }
}
