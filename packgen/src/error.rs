use thiserror::Error;

/// Result alias used across the layout compiler.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that abort generation of a whole schema document.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A property references a type that is neither primitive nor declared earlier.
    #[error("unknown type '{type_name}' referenced by property '{property}'")]
    UnknownType { type_name: String, property: String },

    /// A bit-field-eligible value does not fit in the widest bit-field container.
    #[error(
        "{property}: {bits} bits exceeds the {max} bit bit-field container limit",
        max = crate::layout::bits::MAX_BIT_FIELD_BITS
    )]
    BitFieldOverflow { property: String, bits: u64 },

    #[error("failed to parse JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML schema: {0}")]
    Yaml(#[from] serde_yml::Error),
}
