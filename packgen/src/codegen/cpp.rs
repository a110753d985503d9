use crate::codegen::cpp_gen::helpers::{INDENT, backing_type, discriminant_storage_name};
use crate::codegen::cpp_gen::{DEFAULT_STORAGE_PREFIX, emit_accessors, emit_fields};
use crate::codegen::shared::collect_field_availability;
use crate::layout::bits::bit_field_width;
use crate::layout::compile::CompiledType;
use crate::layout::parts::Part;
use std::fmt::{self, Write};

pub struct CppCodeGenerator {
    options: CppCodeGeneratorOptions,
}

pub struct CppCodeGeneratorOptions {
    pub emit_accessors: bool,
    pub emit_layout_comments: bool,
    pub storage_prefix: String,
    pub namespace: Option<String>,
}

impl Default for CppCodeGeneratorOptions {
    fn default() -> Self {
        Self {
            emit_accessors: true,
            emit_layout_comments: true,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            namespace: None,
        }
    }
}

impl CppCodeGenerator {
    pub fn new(options: CppCodeGeneratorOptions) -> Self {
        Self { options }
    }

    /// Emits a header declaring every compiled type, in declaration order.
    pub fn emit_code(&self, compiled_types: &[CompiledType]) -> String {
        let mut output = String::new();
        self.write_code(compiled_types, &mut output)
            .expect("formatting into a String cannot fail");
        output
    }

    /// Emits the declaration of a single type, without the file preamble.
    pub fn emit_type(&self, compiled: &CompiledType) -> String {
        let mut output = String::new();
        self.write_type(compiled, &mut output)
            .expect("formatting into a String cannot fail");
        output
    }

    fn write_code(&self, compiled_types: &[CompiledType], output: &mut String) -> fmt::Result {
        writeln!(output, "#pragma once")?;
        writeln!(output)?;
        writeln!(output, "#include <cassert>")?;
        writeln!(output, "#include <cstdint>")?;
        writeln!(output)?;

        if let Some(namespace) = &self.options.namespace {
            writeln!(output, "namespace {}", namespace)?;
            writeln!(output, "{{")?;
            writeln!(output)?;
        }

        for compiled in compiled_types {
            self.write_type(compiled, output)?;
            writeln!(output)?;
        }

        if let Some(namespace) = &self.options.namespace {
            writeln!(output, "}} // namespace {}", namespace)?;
        }
        Ok(())
    }

    fn write_type(&self, compiled: &CompiledType, output: &mut String) -> fmt::Result {
        let prefix = self.options.storage_prefix.as_str();
        let name = &compiled.name;

        if let Some(case_names) = compiled.case_names() {
            write_case_enum(compiled, case_names, output)?;
        }

        if self.options.emit_layout_comments {
            writeln!(
                output,
                "// size: {} bytes, alignment: {} bytes",
                compiled.type_info.bits / 8,
                compiled.type_info.alignment
            )?;
        }

        writeln!(output, "class {}", name)?;
        writeln!(output, "{{")?;

        if self.options.emit_accessors {
            writeln!(output, "public:")?;
            if compiled.case_names().is_some() {
                write_case_accessors(compiled, prefix, output)?;
                writeln!(output)?;
            }
            emit_accessors(&collect_field_availability(&compiled.parts), prefix, output)?;
            writeln!(output)?;
        }

        writeln!(output, "private:")?;
        emit_fields(&compiled.layout, prefix, 1, output)?;
        writeln!(output, "}};")
    }
}

/* Underlying integer of a top-level union's case enum */
fn case_enum_backing_type(compiled: &CompiledType) -> &'static str {
    let header_bits = compiled
        .parts
        .iter()
        .find_map(|part| match part {
            Part::UnionHeader(header) => Some(header.bits),
            _ => None,
        })
        .unwrap_or(1);
    backing_type(bit_field_width(header_bits))
}

fn write_case_enum(
    compiled: &CompiledType,
    case_names: &[String],
    output: &mut String,
) -> fmt::Result {
    writeln!(output, "enum class {}Case : {}", compiled.name, case_enum_backing_type(compiled))?;
    writeln!(output, "{{")?;
    for (index, case_name) in case_names.iter().enumerate() {
        writeln!(output, "{INDENT}{} = {},", case_name, index)?;
    }
    writeln!(output, "}};")?;
    writeln!(output)
}

/* A top-level union owns union 0, so its case is the value of that discriminant */
fn write_case_accessors(compiled: &CompiledType, prefix: &str, output: &mut String) -> fmt::Result {
    let name = &compiled.name;
    let discriminant = discriminant_storage_name(prefix, 0);
    let backing = case_enum_backing_type(compiled);

    writeln!(
        output,
        "{INDENT}{name}Case GetCase() const {{ return static_cast<{name}Case>({discriminant}); }}"
    )?;
    writeln!(
        output,
        "{INDENT}void SetCase({name}Case value) \
         {{ {discriminant} = static_cast<{backing}>(value); }}"
    )
}
