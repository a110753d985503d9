/* Per-type compilation, folded over a schema document */

use super::bits::align_up;
use super::optimize::{Layout, MIN_UNION_BODY_BITS, optimize};
use super::parts::{Part, generate_parts};
use super::type_table::{TypeInfo, TypeTable};
use crate::error::CodegenResult;
use packgen_types::{SchemaDocument, TypeDef};
use serde_derive::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompiledKind {
    Record,
    /* Top-level union; its discriminant is union 0 */
    Union { case_names: Vec<String> },
}

/// One declared type after part generation and layout optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompiledType {
    pub name: String,
    pub kind: CompiledKind,
    pub parts: Vec<Part>,
    pub layout: Layout,
    /* Entry added to the type table for later types to embed */
    pub type_info: TypeInfo,
}

impl CompiledType {
    pub fn case_names(&self) -> Option<&[String]> {
        match &self.kind {
            CompiledKind::Record => None,
            CompiledKind::Union { case_names } => Some(case_names),
        }
    }
}

/// Table entry for a compiled type: at least byte-aligned and one byte long,
/// size padded to the alignment so embedded instances keep their stride.
pub fn embedded_type_info(name: &str, layout: &Layout) -> TypeInfo {
    let alignment = layout.alignment.max(1);
    let bits = align_up(layout.bits.max(MIN_UNION_BODY_BITS), alignment * 8);
    TypeInfo::new(name, alignment, bits)
}

/// Compiles one type against the types declared before it and returns the
/// table grown by that type.
#[tracing::instrument(level = "debug", skip_all, fields(type_name = typedef.name()))]
pub fn compile_type(
    table: TypeTable,
    typedef: &TypeDef,
) -> CodegenResult<(TypeTable, CompiledType)> {
    let parts = generate_parts(typedef, &table)?;
    let layout = optimize(&parts)?;
    let type_info = embedded_type_info(typedef.name(), &layout);

    let kind = match typedef {
        TypeDef::Record(_) => CompiledKind::Record,
        TypeDef::Union(union) => CompiledKind::Union {
            case_names: union.cases.iter().map(|case| case.name.clone()).collect(),
        },
    };

    tracing::debug!(bits = type_info.bits, alignment = type_info.alignment, "compiled type");
    let compiled = CompiledType {
        name: typedef.name().to_string(),
        kind,
        parts,
        layout,
        type_info: type_info.clone(),
    };
    Ok((table.with_type(type_info), compiled))
}

/// Compiles every type of a document in declaration order.
///
/// The first error aborts the whole document.
pub fn compile_document(document: &SchemaDocument) -> CodegenResult<Vec<CompiledType>> {
    let (_, compiled) = document.types.iter().try_fold(
        (TypeTable::with_primitives(), Vec::with_capacity(document.types.len())),
        |(table, mut compiled), typedef| {
            let (table, compiled_type) = compile_type(table, typedef)?;
            compiled.push(compiled_type);
            CodegenResult::Ok((table, compiled))
        },
    )?;
    Ok(compiled)
}
