use crate::layout::type_table::TypeInfo;

/// Prefix marking private storage members.
pub const DEFAULT_STORAGE_PREFIX: &str = "m_";

pub const INDENT: &str = "    ";

/// Derives the storage member name of a property: the leading run of
/// upper-case letters is lower-cased and the rest is kept as written.
///
/// `Health` becomes `m_health`, `HP` becomes `m_hp`, `HPMax` becomes `m_hpmax`.
pub fn storage_name(prefix: &str, property: &str) -> String {
    let upper_len = property
        .chars()
        .take_while(|c| c.is_ascii_uppercase())
        .count();
    let (head, rest) = property.split_at(upper_len);
    format!("{}{}{}", prefix, head.to_ascii_lowercase(), rest)
}

/* Storage member of a union's discriminant, e.g. m_union0State */
pub fn discriminant_storage_name(prefix: &str, union_id: u32) -> String {
    storage_name(prefix, &format!("Union{}State", union_id))
}

/* Map a resolved type to its C++ spelling */
pub fn cpp_type_name(ty: &TypeInfo) -> String {
    match ty.name.as_str() {
        "bool" => "bool".to_string(),
        "s8" => "int8_t".to_string(),
        "u8" => "uint8_t".to_string(),
        "s16" => "int16_t".to_string(),
        "u16" => "uint16_t".to_string(),
        "s32" => "int32_t".to_string(),
        "u32" => "uint32_t".to_string(),
        "s64" => "int64_t".to_string(),
        "u64" => "uint64_t".to_string(),
        "f32" => "float".to_string(),
        "f64" => "double".to_string(),
        other => other.to_string(),
    }
}

/* Unsigned integer backing a bit-field container of `width` bits */
pub fn backing_type(width: u64) -> &'static str {
    match width {
        0..=8 => "uint8_t",
        9..=16 => "uint16_t",
        17..=32 => "uint32_t",
        _ => "uint64_t",
    }
}

/// Values up to 64 bits cross accessor boundaries by value, larger ones by
/// reference.
pub fn passed_by_value(ty: &TypeInfo) -> bool {
    ty.bits <= 64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_names_lower_case_the_leading_capitals() {
        assert_eq!(storage_name("m_", "Health"), "m_health");
        assert_eq!(storage_name("m_", "HP"), "m_hp");
        assert_eq!(storage_name("m_", "HPMax"), "m_hpmax");
        assert_eq!(storage_name("m_", "MaxHP"), "m_maxHP");
        assert_eq!(storage_name("m_", "speed"), "m_speed");
        assert_eq!(storage_name("_", "X"), "_x");
    }

    #[test]
    fn discriminants_use_the_union_id() {
        assert_eq!(discriminant_storage_name("m_", 0), "m_union0State");
        assert_eq!(discriminant_storage_name("m_", 12), "m_union12State");
    }

    #[test]
    fn primitive_and_declared_type_names() {
        assert_eq!(cpp_type_name(&TypeInfo::new("s16", 2, 16)), "int16_t");
        assert_eq!(cpp_type_name(&TypeInfo::new("f64", 8, 64)), "double");
        assert_eq!(cpp_type_name(&TypeInfo::new("Vec3", 4, 96)), "Vec3");
    }

    #[test]
    fn backing_types_by_width() {
        assert_eq!(backing_type(8), "uint8_t");
        assert_eq!(backing_type(16), "uint16_t");
        assert_eq!(backing_type(32), "uint32_t");
        assert_eq!(backing_type(64), "uint64_t");
    }
}
