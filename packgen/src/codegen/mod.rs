pub mod cpp;
pub mod cpp_gen;
pub mod shared;

use crate::error::CodegenResult;
use crate::layout::compile_document;
use packgen_types::SchemaDocument;

/// Compiles a document and emits it as one C++ header with default options.
pub fn generate_all(document: &SchemaDocument) -> CodegenResult<String> {
    let compiled = compile_document(document)?;
    let generator = cpp::CppCodeGenerator::new(cpp::CppCodeGeneratorOptions::default());
    Ok(generator.emit_code(&compiled))
}
