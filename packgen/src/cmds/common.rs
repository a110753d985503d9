/* Common utilities shared between analyze and codegen commands */

use packgen::CompiledType;
use packgen::layout::compile_document;
use packgen::loader::load_document;
use std::path::Path;

/* Load one schema file and compile all of its types */
pub fn load_and_compile(file: &Path, verbose: bool) -> anyhow::Result<Vec<CompiledType>> {
    if verbose {
        println!("[~] Loading {}", file.display());
    }
    let document = load_document(file)?;

    if verbose {
        println!("[~] Loaded {} type definitions", document.types.len());
        for typedef in &document.types {
            let kind = if typedef.is_union() { "union" } else { "record" };
            println!("  - {} ({})", typedef.name(), kind);
        }
    }

    let compiled = compile_document(&document)
        .map_err(|e| anyhow::anyhow!("Layout failed for {}: {}", file.display(), e))?;

    if verbose {
        println!("[✓] Layout successful");
        for ty in &compiled {
            println!(
                "    {}: {} bytes, alignment {}",
                ty.name,
                ty.type_info.bits / 8,
                ty.type_info.alignment
            );
        }
    }

    Ok(compiled)
}
