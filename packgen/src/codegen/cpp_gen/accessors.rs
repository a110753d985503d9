use super::helpers::{
    INDENT, cpp_type_name, discriminant_storage_name, passed_by_value, storage_name,
};
use crate::codegen::shared::{CaseSelection, FieldAvailability};
use std::fmt::{self, Write};

/// Read gate of a field: one discriminant test per ancestor case, joined
/// with `&&`. `None` for fields outside every union.
pub fn render_condition(conditions: &[CaseSelection], prefix: &str) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }
    Some(
        conditions
            .iter()
            .map(|selection| {
                format!(
                    "{} == {}",
                    discriminant_storage_name(prefix, selection.union_id),
                    selection.case_index
                )
            })
            .collect::<Vec<_>>()
            .join(" && "),
    )
}

/// Discriminant writes a setter performs, outermost union first, so that the
/// field becomes the active value of every enclosing union.
pub fn render_discriminant_writes(conditions: &[CaseSelection], prefix: &str) -> Vec<String> {
    conditions
        .iter()
        .map(|selection| {
            format!(
                "{} = {};",
                discriminant_storage_name(prefix, selection.union_id),
                selection.case_index
            )
        })
        .collect()
}

/* Emit Has/Get/Set (and Mut for by-reference types) for every field */
pub fn emit_accessors(
    fields: &[FieldAvailability],
    prefix: &str,
    output: &mut String,
) -> fmt::Result {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        emit_field_accessors(field, prefix, output)?;
    }
    Ok(())
}

fn emit_field_accessors(
    availability: &FieldAvailability,
    prefix: &str,
    output: &mut String,
) -> fmt::Result {
    let field = &availability.field;
    let name = &field.name;
    let storage = storage_name(prefix, name);
    let cpp_type = cpp_type_name(&field.ty);
    let condition = render_condition(&availability.conditions, prefix);
    let writes = render_discriminant_writes(&availability.conditions, prefix);
    let by_value = passed_by_value(&field.ty);

    let body = INDENT.repeat(2);

    if let Some(condition) = &condition {
        writeln!(output, "{INDENT}bool Has{name}() const {{ return {condition}; }}")?;
    }

    /* Getter */
    if by_value {
        writeln!(output, "{INDENT}{cpp_type} Get{name}() const")?;
    } else {
        writeln!(output, "{INDENT}const {cpp_type}& Get{name}() const")?;
    }
    writeln!(output, "{INDENT}{{")?;
    if condition.is_some() {
        writeln!(output, "{body}assert(Has{name}());")?;
    }
    if field.ty.is_bit_field() {
        writeln!(output, "{body}return static_cast<{cpp_type}>({storage});")?;
    } else {
        writeln!(output, "{body}return {storage};")?;
    }
    writeln!(output, "{INDENT}}}")?;

    /* Mutable reference for types too large to pass by value */
    if !by_value {
        writeln!(output, "{INDENT}{cpp_type}& Mut{name}()")?;
        writeln!(output, "{INDENT}{{")?;
        for write in &writes {
            writeln!(output, "{body}{write}")?;
        }
        writeln!(output, "{body}return {storage};")?;
        writeln!(output, "{INDENT}}}")?;
    }

    /* Setter */
    if by_value {
        writeln!(output, "{INDENT}void Set{name}({cpp_type} value)")?;
    } else {
        writeln!(output, "{INDENT}void Set{name}(const {cpp_type}& value)")?;
    }
    writeln!(output, "{INDENT}{{")?;
    for write in &writes {
        writeln!(output, "{body}{write}")?;
    }
    writeln!(output, "{body}{storage} = value;")?;
    writeln!(output, "{INDENT}}}")
}
