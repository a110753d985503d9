/* Codegen command - generate C++ headers from schema documents */

use super::common::load_and_compile;
use packgen::codegen::cpp::{CppCodeGenerator, CppCodeGeneratorOptions};
use std::path::{Path, PathBuf};

pub struct CodegenOptions {
    pub namespace: Option<String>,
    pub emit_accessors: bool,
    pub emit_layout_comments: bool,
}

/* Execute the codegen command */
pub fn run(
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    options: CodegenOptions,
    verbose: bool,
) -> anyhow::Result<()> {
    if verbose {
        println!("packgen - C++ Layout Generator");
        println!("==============================\n");
        println!("[~] Configuration:");
        println!("  Output directory: {}", output_dir.display());
        if let Some(namespace) = &options.namespace {
            println!("  Namespace: {}", namespace);
        }
        println!("  Accessors: {}", options.emit_accessors);
        println!("  Input files: {}", files.len());
        for file in &files {
            println!("    - {}", file.display());
        }
        println!();
    }

    std::fs::create_dir_all(&output_dir)?;

    let generator = CppCodeGenerator::new(CppCodeGeneratorOptions {
        emit_accessors: options.emit_accessors,
        emit_layout_comments: options.emit_layout_comments,
        namespace: options.namespace,
        ..Default::default()
    });

    for file in &files {
        /* Nothing is written for a document that fails to compile */
        let compiled = load_and_compile(file, verbose)?;
        let header = generator.emit_code(&compiled);

        let header_path = header_path_for(file, &output_dir);
        std::fs::write(&header_path, header)?;
        if verbose {
            println!("[✓] Generated {}", header_path.display());
        }
    }

    if verbose {
        println!("\n[✓] Code generation complete!");
    }
    Ok(())
}

/* `schemas/entity.types.json` -> `<output>/entity.types.h` */
fn header_path_for(file: &Path, output_dir: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "types".to_string());
    output_dir.join(format!("{}.h", stem))
}
