use super::helpers::{INDENT, backing_type, cpp_type_name, discriminant_storage_name, storage_name};
use crate::layout::optimize::{BitFieldContainer, BitFieldMember, Layout, PackedItem, UnionLayout};
use std::fmt::{self, Write};

/* Emit the member declarations of a layout, in physical order */
pub fn emit_fields(
    layout: &Layout,
    prefix: &str,
    depth: usize,
    output: &mut String,
) -> fmt::Result {
    for item in layout.items() {
        emit_packed_item(item, prefix, depth, output)?;
    }
    Ok(())
}

fn emit_packed_item(
    item: &PackedItem,
    prefix: &str,
    depth: usize,
    output: &mut String,
) -> fmt::Result {
    match item {
        PackedItem::BitField(container) => {
            emit_bit_field_container(container, prefix, depth, output)
        }
        PackedItem::Field(field) => writeln!(
            output,
            "{}{} {};",
            INDENT.repeat(depth),
            cpp_type_name(&field.ty),
            storage_name(prefix, &field.name)
        ),
        PackedItem::Union(union) => emit_union(union, prefix, depth, output),
    }
}

/* Every member shares the container's backing type so they land in one allocation unit */
fn emit_bit_field_container(
    container: &BitFieldContainer,
    prefix: &str,
    depth: usize,
    output: &mut String,
) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    let backing = backing_type(container.width);

    for member in &container.members {
        let name = match member {
            BitFieldMember::Field(field) => storage_name(prefix, &field.name),
            BitFieldMember::UnionHeader(header) => {
                discriminant_storage_name(prefix, header.union_id)
            }
        };
        writeln!(output, "{}{} {} : {};", indent, backing, name, member.bits())?;
    }
    Ok(())
}

/// Overlapping storage for the cases of one union. A case made of several
/// parts gets an anonymous struct so its own members stay sequential.
fn emit_union(union: &UnionLayout, prefix: &str, depth: usize, output: &mut String) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    writeln!(output, "{}union", indent)?;
    writeln!(output, "{}{{", indent)?;

    for case in &union.cases {
        match case.part_count {
            0 => {}
            1 => emit_fields(&case.layout, prefix, depth + 1, output)?,
            _ => {
                let case_indent = INDENT.repeat(depth + 1);
                writeln!(output, "{}struct", case_indent)?;
                writeln!(output, "{}{{", case_indent)?;
                emit_fields(&case.layout, prefix, depth + 2, output)?;
                writeln!(output, "{}}};", case_indent)?;
            }
        }
    }

    writeln!(output, "{}}};", indent)
}
