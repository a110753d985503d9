/* Bit arithmetic shared by the part generator and the optimizer */

/// Widest bit-field container, and the capacity of every packing bin.
pub const MAX_BIT_FIELD_BITS: u64 = 64;

/// Backing integer widths available for bit-field containers, narrowest first.
pub const BIT_FIELD_WIDTHS: [u64; 4] = [8, 16, 32, 64];

/// Number of discriminant bits needed to tell `case_count` cases apart.
///
/// Always at least one bit, so a union with zero or one case still owns a tag.
pub fn min_discriminant_bits(case_count: usize) -> u64 {
    if case_count <= 2 {
        return 1;
    }

    let highest_tag = (case_count - 1) as u64;
    u64::from(u64::BITS - highest_tag.leading_zeros())
}

/* Round `bits` up to the next multiple of `boundary` (a no-op for boundary 0) */
pub fn align_up(bits: u64, boundary: u64) -> u64 {
    if boundary == 0 {
        return bits;
    }
    bits.div_ceil(boundary) * boundary
}

/// Appends an item to a running block total, padding the total up to the
/// item's alignment first. An empty block is never padded.
pub fn add_with_alignment(total_bits: u64, item_bits: u64, item_alignment: u64) -> u64 {
    if total_bits == 0 {
        return item_bits;
    }
    align_up(total_bits, item_alignment * 8) + item_bits
}

/// Smallest backing integer width able to hold `used_bits`.
///
/// Packing bins never exceed [`MAX_BIT_FIELD_BITS`], so the widest container
/// is the fallback.
pub fn bit_field_width(used_bits: u64) -> u64 {
    BIT_FIELD_WIDTHS
        .iter()
        .copied()
        .find(|width| *width >= used_bits)
        .unwrap_or(MAX_BIT_FIELD_BITS)
}
