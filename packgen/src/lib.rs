//! Layout-optimizing compiler from record/tagged-union schemas to C++ classes.
//!
//! A schema type is flattened into layout parts, the parts are bin-packed
//! into bit-field containers and aligned blocks, and the optimized tree is
//! emitted as member declarations plus discriminant-gated accessors.

pub mod codegen;
pub mod error;
pub mod layout;
pub mod loader;

pub use error::{CodegenError, CodegenResult};
pub use layout::{CompiledType, compile_document};

use packgen_types::SchemaDocument;

/// Generates C++ source for a JSON schema document.
pub fn generate_code(json: &str) -> CodegenResult<String> {
    let document: SchemaDocument = serde_json::from_str(json)?;
    codegen::generate_all(&document)
}

/// Generates C++ source for a YAML schema document.
pub fn generate_code_from_yaml(yaml: &str) -> CodegenResult<String> {
    let document: SchemaDocument = serde_yml::from_str(yaml)?;
    codegen::generate_all(&document)
}
