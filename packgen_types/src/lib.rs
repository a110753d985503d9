//! Schema Type Definitions
//!
//! This crate contains the schema model consumed by the layout compiler.
//! It provides pure data structures for representing record and tagged-union
//! declarations without any layout or code generation logic.

pub mod types;

// Re-export commonly used types at the crate root
pub use types::*;
