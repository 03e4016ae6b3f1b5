//! Package compiler
//!
//! A package lists the resources that are loaded together. The source is
//! validated and written back compact.

use serde_json::Value;

use super::{read_json_object, to_compact_json};
use crate::domain::ports::{write_asset, CompileError, CompileResult, Compiler, CompilerContext};

pub struct PackageCompiler {
    source_type: String,
    output_type: String,
}

impl PackageCompiler {
    pub fn new(source_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            output_type: output_type.into(),
        }
    }
}

impl Compiler for PackageCompiler {
    fn compile(&self, source: &str, target: &str, context: &mut CompilerContext<'_>) -> CompileResult {
        let package = read_json_object(context.source, source)?;

        // Every resource group maps a type to a list of resource names
        for (resource_type, resources) in &package {
            let Some(resources) = resources.as_array() else {
                return Err(CompileError::failed(format!(
                    "package entry '{resource_type}' is not an array"
                )));
            };
            context.string_ids.record(resource_type);
            for resource in resources.iter().filter_map(Value::as_str) {
                context.string_ids.record(resource);
            }
        }

        let data = to_compact_json(&Value::Object(package))?;
        write_asset(context.target, target, &data)
    }

    fn output_type(&self) -> &str {
        &self.output_type
    }

    fn source_type(&self) -> &str {
        &self.source_type
    }
}
