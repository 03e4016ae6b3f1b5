//! Byte-for-byte copy compiler

use crate::domain::ports::{read_asset, write_asset, CompileResult, Compiler, CompilerContext};

pub struct CopyCompiler {
    source_type: String,
    output_type: String,
}

impl CopyCompiler {
    pub fn new(source_type: impl Into<String>, output_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            output_type: output_type.into(),
        }
    }
}

impl Compiler for CopyCompiler {
    fn compile(&self, source: &str, target: &str, context: &mut CompilerContext<'_>) -> CompileResult {
        let data = read_asset(context.source, source)?;
        write_asset(context.target, target, &data)
    }

    fn output_type(&self) -> &str {
        &self.output_type
    }

    fn source_type(&self) -> &str {
        &self.source_type
    }
}
