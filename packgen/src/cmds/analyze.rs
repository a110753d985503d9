/* Analyze command - report the optimized layout of every type */

use super::common::load_and_compile;
use packgen::CompiledType;
use packgen::codegen::cpp_gen::{DEFAULT_STORAGE_PREFIX, render_condition, storage_name};
use packgen::codegen::shared::{FieldAvailability, collect_field_availability};
use packgen::layout::{BitFieldMember, Layout, PackedItem};
use serde_derive::Serialize;
use std::path::PathBuf;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct TypeReport<'a> {
    #[serde(flatten)]
    compiled: &'a CompiledType,
    fields: Vec<FieldAvailability>,
}

/* Execute the analyze command */
pub fn run(files: Vec<PathBuf>, format: ReportFormat) -> anyhow::Result<()> {
    let verbose = format == ReportFormat::Text;
    if verbose {
        println!("packgen - Layout Analysis Tool");
        println!("==============================\n");
    }

    for file in &files {
        let compiled = load_and_compile(file, verbose)?;

        match format {
            ReportFormat::Json => {
                let reports: Vec<TypeReport> = compiled
                    .iter()
                    .map(|ty| TypeReport {
                        compiled: ty,
                        fields: collect_field_availability(&ty.parts),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
            ReportFormat::Text => {
                for ty in &compiled {
                    println!();
                    print_type(ty);
                }
            }
        }
    }

    Ok(())
}

fn print_type(ty: &CompiledType) {
    println!("[~] {}", ty.name);
    println!(
        "    size: {} bits ({} packed), alignment: {} bytes",
        ty.layout.bits, ty.layout.packed_bits, ty.layout.alignment
    );
    print_layout(&ty.layout, 1);

    let fields = collect_field_availability(&ty.parts);
    if fields.iter().any(FieldAvailability::is_gated) {
        println!("    gated fields:");
        for field in fields.iter().filter(|field| field.is_gated()) {
            let condition =
                render_condition(&field.conditions, DEFAULT_STORAGE_PREFIX).unwrap_or_default();
            println!("      {} when {}", field.field.name, condition);
        }
    }
}

fn print_layout(layout: &Layout, depth: usize) {
    let indent = "    ".repeat(depth);
    for (index, block) in layout.blocks.iter().enumerate() {
        println!(
            "{}block {}: {} bits, alignment {}",
            indent, index, block.bits, block.alignment
        );
        for item in &block.items {
            print_item(item, depth + 1);
        }
    }
}

fn print_item(item: &PackedItem, depth: usize) {
    let indent = "    ".repeat(depth);
    match item {
        PackedItem::BitField(container) => {
            println!(
                "{}bit-field u{} ({} bits used)",
                indent, container.width, container.used_bits
            );
            for member in &container.members {
                let name = match member {
                    BitFieldMember::Field(field) => {
                        storage_name(DEFAULT_STORAGE_PREFIX, &field.name)
                    }
                    BitFieldMember::UnionHeader(header) => {
                        storage_name(DEFAULT_STORAGE_PREFIX, &header.name())
                    }
                };
                println!("{}    {} : {}", indent, name, member.bits());
            }
        }
        PackedItem::Field(field) => {
            println!(
                "{}{} {} ({} bits, alignment {})",
                indent,
                field.ty.name,
                storage_name(DEFAULT_STORAGE_PREFIX, &field.name),
                field.ty.bits,
                field.ty.alignment
            );
        }
        PackedItem::Union(union) => {
            println!(
                "{}union {} ({} bits, alignment {})",
                indent, union.union_id, union.bits, union.alignment
            );
            for (index, case) in union.cases.iter().enumerate() {
                println!("{}    case {}: {} bits", indent, index, case.layout.bits);
                print_layout(&case.layout, depth + 2);
            }
        }
    }
}
