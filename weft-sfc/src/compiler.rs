//! Pipeline entry points: markup in, one exported function out.

use crate::declare::declare;
use crate::error::Result;
use crate::sfc::segregate;
use crate::template_ast::Document;
use crate::template_codegen::generate;
use crate::template_parse::parse_template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name of the exported function.
    pub function_name: String,
    /// Indentation applied to every line of the function body.
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            function_name: "compile".to_string(),
            indent: "  ".to_string(),
        }
    }
}

/// Compile a template with default options.
pub fn compile(source: &str) -> Result<String> {
    compile_with(source, &CompileOptions::default())
}

pub fn compile_with(source: &str, options: &CompileOptions) -> Result<String> {
    let doc = parse_template(source)?;
    compile_document(&doc, options)
}

/// Compile an already parsed document.
pub fn compile_document(doc: &Document, options: &CompileOptions) -> Result<String> {
    let tree = declare(doc)?;
    let sfc = segregate(&tree);
    generate(&tree, &sfc, options)
}
