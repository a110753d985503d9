pub mod accessors;
pub mod fields;
pub mod helpers;

// Re-export main public functions
pub use accessors::{emit_accessors, render_condition, render_discriminant_writes};
pub use fields::emit_fields;
pub use helpers::{DEFAULT_STORAGE_PREFIX, cpp_type_name, storage_name};
