/* Part generation: flatten a schema type into layout parts */

use super::bits::min_discriminant_bits;
use super::type_table::{TypeInfo, TypeTable};
use crate::error::CodegenResult;
use packgen_types::{Property, TypeDef};
use serde_derive::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldPart {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
}

/// Discriminant of one union. Always bit-packed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnionHeaderPart {
    pub union_id: u32,
    pub bits: u64,
}

impl UnionHeaderPart {
    /* Logical name of the discriminant, before storage-name derivation */
    pub fn name(&self) -> String {
        format!("Union{}State", self.union_id)
    }
}

/// Overlapping storage of one union: each case holds its own flattened parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnionBodyPart {
    pub union_id: u32,
    pub cases: Vec<Vec<Part>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Part {
    Field(FieldPart),
    UnionHeader(UnionHeaderPart),
    UnionBody(UnionBodyPart),
}

impl Part {
    pub fn field(name: impl Into<String>, ty: TypeInfo) -> Self {
        Part::Field(FieldPart {
            name: name.into(),
            ty,
        })
    }
}

/// Flattens one declared type. Union ids start at 0 for every type.
///
/// A top-level union is laid out like a record holding exactly one inline
/// union, so its discriminant is always union 0.
#[tracing::instrument(level = "debug", skip_all, fields(type_name = typedef.name()))]
pub fn generate_parts(typedef: &TypeDef, table: &TypeTable) -> CodegenResult<Vec<Part>> {
    let (parts, union_count) = match typedef {
        TypeDef::Record(record) => generate_property_parts(&record.properties, table, 0)?,
        TypeDef::Union(union) => {
            let cases: Vec<&[Property]> =
                union.cases.iter().map(|case| case.properties.as_slice()).collect();
            generate_union_parts(&cases, table, 0)?
        }
    };
    tracing::debug!(parts = parts.len(), unions = union_count, "generated parts");
    Ok(parts)
}

/* Flatten properties in declaration order. Returns the parts and the next free union id. */
fn generate_property_parts(
    properties: &[Property],
    table: &TypeTable,
    next_union_id: u32,
) -> CodegenResult<(Vec<Part>, u32)> {
    let mut parts = Vec::with_capacity(properties.len());
    let mut next_union_id = next_union_id;

    for property in properties {
        match property {
            Property::Leaf(leaf) => {
                let ty = table.resolve(&leaf.type_name, &leaf.name)?;
                parts.push(Part::field(leaf.name.clone(), ty));
            }
            Property::Union(union) => {
                let cases: Vec<&[Property]> =
                    union.cases.iter().map(|case| case.properties.as_slice()).collect();
                let (union_parts, after) = generate_union_parts(&cases, table, next_union_id)?;
                parts.extend(union_parts);
                next_union_id = after;
            }
        }
    }

    Ok((parts, next_union_id))
}

/// Emits a header part followed by a body part for one union.
///
/// The union takes `next_union_id`; unions nested in its cases are numbered
/// after it in pre-order. Returns the parts and the next free union id.
pub fn generate_union_parts(
    cases: &[&[Property]],
    table: &TypeTable,
    next_union_id: u32,
) -> CodegenResult<(Vec<Part>, u32)> {
    let union_id = next_union_id;
    let header = UnionHeaderPart {
        union_id,
        bits: min_discriminant_bits(cases.len()),
    };

    let mut next_union_id = union_id + 1;
    let mut body_cases = Vec::with_capacity(cases.len());
    for case in cases {
        let (case_parts, after) = generate_property_parts(case, table, next_union_id)?;
        body_cases.push(case_parts);
        next_union_id = after;
    }

    let body = UnionBodyPart {
        union_id,
        cases: body_cases,
    };

    Ok((vec![Part::UnionHeader(header), Part::UnionBody(body)], next_union_id))
}
