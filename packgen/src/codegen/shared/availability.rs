/* Availability conditions: which union cases must be selected for a field to hold valid storage */

use crate::layout::parts::{FieldPart, Part};
use serde_derive::Serialize;

/// "Union `union_id` currently holds case `case_index`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CaseSelection {
    pub union_id: u32,
    pub case_index: usize,
}

/// A leaf field and the ancestor case selections gating it, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldAvailability {
    pub field: FieldPart,
    pub conditions: Vec<CaseSelection>,
}

impl FieldAvailability {
    pub fn is_gated(&self) -> bool {
        !self.conditions.is_empty()
    }
}

/// Walks the part tree in declaration order and records, for every field
/// part, the chain of union cases it lives in.
pub fn collect_field_availability(parts: &[Part]) -> Vec<FieldAvailability> {
    let mut fields = Vec::new();
    let mut path = Vec::new();
    collect_into(parts, &mut path, &mut fields);
    fields
}

fn collect_into(
    parts: &[Part],
    path: &mut Vec<CaseSelection>,
    fields: &mut Vec<FieldAvailability>,
) {
    for part in parts {
        match part {
            Part::Field(field) => fields.push(FieldAvailability {
                field: field.clone(),
                conditions: path.clone(),
            }),
            Part::UnionHeader(_) => {}
            Part::UnionBody(body) => {
                for (case_index, case_parts) in body.cases.iter().enumerate() {
                    path.push(CaseSelection {
                        union_id: body.union_id,
                        case_index,
                    });
                    collect_into(case_parts, path, fields);
                    path.pop();
                }
            }
        }
    }
}
