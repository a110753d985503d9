pub mod binpack;
pub mod bits;
pub mod compile;
pub mod optimize;
pub mod parts;
pub mod type_table;

pub use compile::{CompiledKind, CompiledType, compile_document, compile_type};
pub use optimize::{
    BitFieldContainer, BitFieldMember, Block, CaseLayout, Layout, PackedItem, UnionLayout, optimize,
};
pub use parts::{FieldPart, Part, UnionBodyPart, UnionHeaderPart, generate_parts};
pub use type_table::{TypeInfo, TypeTable};
