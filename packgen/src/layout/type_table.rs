use crate::error::{CodegenError, CodegenResult};
use indexmap::IndexMap;
use serde_derive::Serialize;

/// Name, byte alignment and bit size of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeInfo {
    // Empty for the internal discriminant type of a union header.
    pub name: String,

    // Byte alignment. 0 means the value has no byte address and is packed into a bit-field.
    pub alignment: u64,

    pub bits: u64,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, alignment: u64, bits: u64) -> Self {
        Self {
            name: name.into(),
            alignment,
            bits,
        }
    }

    pub fn is_bit_field(&self) -> bool {
        self.alignment == 0
    }
}

/* (name, alignment, bits) for every primitive a schema may reference */
pub const PRIMITIVE_TYPES: [(&str, u64, u64); 11] = [
    ("bool", 0, 1),
    ("s8", 1, 8),
    ("u8", 1, 8),
    ("s16", 2, 16),
    ("u16", 2, 16),
    ("s32", 4, 32),
    ("u32", 4, 32),
    ("s64", 8, 64),
    ("u64", 8, 64),
    ("f32", 4, 32),
    ("f64", 8, 64),
];

/// Types visible to the part generator: the primitives followed by every
/// type compiled so far, in declaration order.
///
/// Compiling a type consumes the table and hands back a grown one, so type
/// N can only ever see types 1..N-1.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: IndexMap<String, TypeInfo>,
}

impl TypeTable {
    pub fn with_primitives() -> Self {
        let types = PRIMITIVE_TYPES
            .iter()
            .map(|(name, alignment, bits)| {
                (name.to_string(), TypeInfo::new(*name, *alignment, *bits))
            })
            .collect();
        Self { types }
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    /* Resolve the type of `property`, failing with the unresolved name */
    pub fn resolve(&self, type_name: &str, property: &str) -> CodegenResult<TypeInfo> {
        self.get(type_name)
            .cloned()
            .ok_or_else(|| CodegenError::UnknownType {
                type_name: type_name.to_string(),
                property: property.to_string(),
            })
    }

    pub fn with_type(mut self, info: TypeInfo) -> Self {
        self.types.insert(info.name.clone(), info);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::with_primitives()
    }
}
