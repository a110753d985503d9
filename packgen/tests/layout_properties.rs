//! Property-based tests for the layout optimizer.
//!
//! Random records built from primitive fields are optimized and checked for:
//! 1. Order independence: shuffling the declarations never changes the size
//! 2. Completeness: every field lands in exactly one slot
//! 3. Tight blocks: naturally aligned primitives pack without inner padding

use packgen::layout::bits::{MAX_BIT_FIELD_BITS, min_discriminant_bits};
use packgen::layout::type_table::PRIMITIVE_TYPES;
use packgen::layout::{BitFieldMember, Layout, PackedItem, Part, TypeInfo, optimize};
use proptest::prelude::*;

// -- Strategies --

fn primitive_strategy() -> impl Strategy<Value = TypeInfo> {
    prop::sample::select(PRIMITIVE_TYPES.to_vec())
        .prop_map(|(name, alignment, bits)| TypeInfo::new(name, alignment, bits))
}

fn field_types_strategy() -> impl Strategy<Value = Vec<TypeInfo>> {
    prop::collection::vec(primitive_strategy(), 0..48)
}

/// Declared field types paired with a shuffled copy of the same declarations.
fn shuffled_fields_strategy() -> impl Strategy<Value = (Vec<TypeInfo>, Vec<TypeInfo>)> {
    field_types_strategy()
        .prop_flat_map(|types| (Just(types.clone()), Just(types).prop_shuffle()))
}

fn fields(types: &[TypeInfo]) -> Vec<Part> {
    types
        .iter()
        .enumerate()
        .map(|(index, ty)| Part::field(format!("Field{}", index), ty.clone()))
        .collect()
}

fn field_count(layout: &Layout) -> usize {
    layout
        .items()
        .map(|item| match item {
            PackedItem::BitField(container) => container
                .members
                .iter()
                .filter(|member| matches!(member, BitFieldMember::Field(_)))
                .count(),
            PackedItem::Field(_) => 1,
            PackedItem::Union(_) => 0,
        })
        .sum()
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_declaration_order_does_not_change_size(
        (declared, shuffled) in shuffled_fields_strategy()
    ) {
        let in_order = optimize(&fields(&declared)).unwrap();
        let reordered = optimize(&fields(&shuffled)).unwrap();

        prop_assert_eq!(in_order.bits, reordered.bits);
        prop_assert_eq!(in_order.packed_bits, reordered.packed_bits);
        prop_assert_eq!(in_order.alignment, reordered.alignment);
    }

    #[test]
    fn prop_every_field_is_placed_once(types in field_types_strategy()) {
        let layout = optimize(&fields(&types)).unwrap();
        prop_assert_eq!(field_count(&layout), types.len());
    }

    #[test]
    fn prop_size_bounds(types in field_types_strategy()) {
        let layout = optimize(&fields(&types)).unwrap();

        let payload: u64 = types.iter().map(|ty| ty.bits).sum();
        let alignment = types.iter().map(|ty| ty.alignment.max(1)).max().unwrap_or(0);

        prop_assert!(layout.packed_bits >= payload);
        prop_assert!(layout.bits >= layout.packed_bits);
        prop_assert_eq!(layout.alignment, alignment);
        if layout.alignment > 0 {
            prop_assert_eq!(layout.bits % (layout.alignment * 8), 0);
        }

        /* unpacked, a bool takes a whole byte */
        let unpacked: u64 = types.iter().map(|ty| ty.bits.max(8)).sum();
        let large_padding: u64 = types
            .iter()
            .filter(|ty| ty.bits >= MAX_BIT_FIELD_BITS)
            .map(|ty| ty.alignment * 8)
            .sum();
        prop_assert!(layout.packed_bits <= unpacked + large_padding);
    }

    #[test]
    fn prop_blocks_of_primitives_have_no_inner_padding(types in field_types_strategy()) {
        let layout = optimize(&fields(&types)).unwrap();

        for block in &layout.blocks {
            let content: u64 = block.items.iter().map(PackedItem::bits).sum();
            prop_assert!(block.bits <= MAX_BIT_FIELD_BITS);
            prop_assert_eq!(block.bits, content);
        }
    }

    #[test]
    fn prop_discriminant_distinguishes_every_case(case_count in 2usize..5000) {
        let bits = min_discriminant_bits(case_count);
        prop_assert!(1u64 << bits >= case_count as u64);
        prop_assert!(1u64 << (bits - 1) < case_count as u64);
    }
}
