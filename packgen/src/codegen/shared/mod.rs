pub mod availability;

pub use availability::{CaseSelection, FieldAvailability, collect_field_availability};
