/* Layout optimizer: assign physical storage to flattened parts */

use super::binpack::bin_pack;
use super::bits::{MAX_BIT_FIELD_BITS, add_with_alignment, align_up, bit_field_width};
use super::parts::{FieldPart, Part, UnionBodyPart, UnionHeaderPart};
use crate::error::{CodegenError, CodegenResult};
use serde_derive::Serialize;

/// Smallest storage a union body occupies, even when a case has no parts.
pub const MIN_UNION_BODY_BITS: u64 = 8;

/// A value stored inside a bit-field container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BitFieldMember {
    Field(FieldPart),
    UnionHeader(UnionHeaderPart),
}

impl BitFieldMember {
    pub fn name(&self) -> String {
        match self {
            BitFieldMember::Field(field) => field.name.clone(),
            BitFieldMember::UnionHeader(header) => header.name(),
        }
    }

    pub fn bits(&self) -> u64 {
        match self {
            BitFieldMember::Field(field) => field.ty.bits,
            BitFieldMember::UnionHeader(header) => header.bits,
        }
    }
}

/// One integer of `width` bits shared by several bit-field members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BitFieldContainer {
    pub width: u64,
    pub used_bits: u64,
    pub members: Vec<BitFieldMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CaseLayout {
    /* Parts the case was flattened into; decides whether the case needs its own struct */
    pub part_count: usize,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnionLayout {
    pub union_id: u32,
    pub cases: Vec<CaseLayout>,
    pub bits: u64,
    pub alignment: u64,
}

/// Physical storage unit of an optimized layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackedItem {
    BitField(BitFieldContainer),
    Field(FieldPart),
    Union(UnionLayout),
}

impl PackedItem {
    pub fn bits(&self) -> u64 {
        match self {
            PackedItem::BitField(container) => container.width,
            PackedItem::Field(field) => field.ty.bits,
            PackedItem::Union(union) => union.bits,
        }
    }

    pub fn alignment(&self) -> u64 {
        match self {
            PackedItem::BitField(container) => container.width / 8,
            PackedItem::Field(field) => field.ty.alignment,
            PackedItem::Union(union) => union.alignment,
        }
    }
}

/// Items laid out contiguously: either one packing bin of small items or a
/// single large item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Block {
    pub items: Vec<PackedItem>,
    pub bits: u64,
    pub alignment: u64,
}

impl Block {
    fn from_items(items: Vec<PackedItem>, bits: u64) -> Self {
        let alignment = items.iter().map(PackedItem::alignment).max().unwrap_or(0);
        Self { items, bits, alignment }
    }
}

/// Result of optimizing one part sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Layout {
    pub blocks: Vec<Block>,
    /* Packed size before tail padding */
    pub packed_bits: u64,
    /* Size including tail padding up to the alignment */
    pub bits: u64,
    pub alignment: u64,
}

impl Layout {
    pub fn items(&self) -> impl Iterator<Item = &PackedItem> {
        self.blocks.iter().flat_map(|block| block.items.iter())
    }

    pub fn bit_field_containers(&self) -> impl Iterator<Item = &BitFieldContainer> {
        self.items().filter_map(|item| match item {
            PackedItem::BitField(container) => Some(container),
            _ => None,
        })
    }
}

/* Where a part goes before packing */
enum Candidate {
    BitField(BitFieldMember),
    Aligned(PackedItem),
}

fn classify(part: &Part) -> CodegenResult<Candidate> {
    Ok(match part {
        Part::Field(field) if field.ty.is_bit_field() => {
            Candidate::BitField(BitFieldMember::Field(field.clone()))
        }
        Part::Field(field) => Candidate::Aligned(PackedItem::Field(field.clone())),
        Part::UnionHeader(header) => {
            Candidate::BitField(BitFieldMember::UnionHeader(header.clone()))
        }
        Part::UnionBody(body) => Candidate::Aligned(PackedItem::Union(optimize_union_body(body)?)),
    })
}

/// Assigns physical storage to a part sequence.
///
/// Bit-field-eligible parts are packed into integer containers first, the
/// containers and other small parts are then packed into 64-bit blocks, and
/// large parts follow in ascending alignment.
#[tracing::instrument(level = "debug", skip_all, fields(parts = parts.len()))]
pub fn optimize(parts: &[Part]) -> CodegenResult<Layout> {
    let mut bit_fields = Vec::new();
    let mut small = Vec::new();
    let mut large = Vec::new();

    for part in parts {
        match classify(part)? {
            Candidate::BitField(member) => bit_fields.push(member),
            Candidate::Aligned(item) if item.bits() < MAX_BIT_FIELD_BITS => small.push(item),
            Candidate::Aligned(item) => large.push(item),
        }
    }

    /* Stage A: bit-fields into containers */
    let containers = pack_bit_fields(bit_fields)?;
    tracing::trace!(containers = containers.len(), "packed bit-fields");

    /* Stage B: containers and small parts into blocks */
    small.extend(containers.into_iter().map(PackedItem::BitField));
    let bins = bin_pack(small, MAX_BIT_FIELD_BITS, PackedItem::bits, |total, item| {
        add_with_alignment(total, item.bits(), item.alignment())
    });
    let mut blocks: Vec<Block> = bins
        .into_iter()
        .map(|bin| Block::from_items(bin.items, bin.size))
        .collect();
    tracing::trace!(blocks = blocks.len(), "packed small parts");

    /* Stage C: large parts last, least aligned first */
    large.sort_by_key(PackedItem::alignment);
    blocks.extend(large.into_iter().map(|item| {
        let bits = item.bits();
        Block::from_items(vec![item], bits)
    }));

    /* Every item pads to its own alignment, which may be below its block's */
    let packed_bits = blocks
        .iter()
        .flat_map(|block| block.items.iter())
        .fold(0, |total, item| add_with_alignment(total, item.bits(), item.alignment()));
    let alignment = blocks.iter().map(|block| block.alignment).max().unwrap_or(0);
    let bits = align_up(packed_bits, alignment * 8);

    tracing::debug!(packed_bits, bits, alignment, "optimized layout");
    Ok(Layout {
        blocks,
        packed_bits,
        bits,
        alignment,
    })
}

/* Stage A: first-fit-decreasing into 64-bit bins, each shrunk to the narrowest integer */
fn pack_bit_fields(members: Vec<BitFieldMember>) -> CodegenResult<Vec<BitFieldContainer>> {
    if let Some(oversized) = members.iter().find(|member| member.bits() >= MAX_BIT_FIELD_BITS) {
        return Err(CodegenError::BitFieldOverflow {
            property: oversized.name(),
            bits: oversized.bits(),
        });
    }

    let bins = bin_pack(members, MAX_BIT_FIELD_BITS, BitFieldMember::bits, |total, member| {
        total + member.bits()
    });

    Ok(bins
        .into_iter()
        .map(|bin| BitFieldContainer {
            width: bit_field_width(bin.size),
            used_bits: bin.size,
            members: bin.items,
        })
        .collect())
}

/* Each case is laid out on its own; the body is as large and as aligned as its largest case,
 * padded to that alignment like any other union */
fn optimize_union_body(body: &UnionBodyPart) -> CodegenResult<UnionLayout> {
    let cases = body
        .cases
        .iter()
        .map(|case_parts| {
            Ok(CaseLayout {
                part_count: case_parts.len(),
                layout: optimize(case_parts)?,
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;

    let alignment = cases
        .iter()
        .map(|case| case.layout.alignment)
        .max()
        .unwrap_or(0)
        .max(1);
    let largest_case = cases
        .iter()
        .map(|case| case.layout.bits)
        .max()
        .unwrap_or(0)
        .max(MIN_UNION_BODY_BITS);
    let bits = align_up(largest_case, alignment * 8);

    Ok(UnionLayout {
        union_id: body.union_id,
        cases,
        bits,
        alignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::type_table::TypeInfo;

    fn s32(name: &str) -> Part {
        Part::field(name, TypeInfo::new("s32", 4, 32))
    }

    fn flag(name: &str) -> Part {
        Part::field(name, TypeInfo::new("bool", 0, 1))
    }

    fn header(union_id: u32, bits: u64) -> Part {
        Part::UnionHeader(UnionHeaderPart { union_id, bits })
    }

    fn body(union_id: u32, cases: Vec<Vec<Part>>) -> Part {
        Part::UnionBody(UnionBodyPart { union_id, cases })
    }

    #[test]
    fn two_ints_share_one_block() {
        let layout = optimize(&[s32("A"), s32("B")]).unwrap();
        assert_eq!(layout.blocks.len(), 1);
        assert_eq!(layout.bits, 64);
        assert_eq!(layout.alignment, 4);
        assert_eq!(layout.bit_field_containers().count(), 0);
    }

    #[test]
    fn three_bools_share_one_byte() {
        let layout = optimize(&[flag("A"), flag("B"), flag("C")]).unwrap();
        let containers: Vec<_> = layout.bit_field_containers().collect();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].width, 8);
        assert_eq!(containers[0].used_bits, 3);
        assert_eq!(containers[0].members.len(), 3);
        assert_eq!(layout.items().count(), 1);
        assert_eq!(layout.bits, 8);
        assert_eq!(layout.alignment, 1);
    }

    #[test]
    fn inline_union_with_two_int_cases() {
        let parts = [header(0, 1), body(0, vec![vec![s32("A")], vec![s32("B")]])];
        let layout = optimize(&parts).unwrap();
        assert_eq!(layout.bits, 64);
        assert_eq!(layout.alignment, 4);

        let containers: Vec<_> = layout.bit_field_containers().collect();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].width, 8);
        assert_eq!(containers[0].used_bits, 1);

        let union = layout
            .items()
            .find_map(|item| match item {
                PackedItem::Union(union) => Some(union),
                _ => None,
            })
            .unwrap();
        assert_eq!(union.bits, 32);
        assert_eq!(union.alignment, 4);
        assert_eq!(union.cases.len(), 2);
    }

    #[test]
    fn many_bools_spill_into_a_second_container() {
        let parts: Vec<Part> = (0..70).map(|i| flag(&format!("F{i}"))).collect();
        let layout = optimize(&parts).unwrap();
        let widths: Vec<u64> = layout.bit_field_containers().map(|c| c.width).collect();
        assert_eq!(widths, vec![64, 8]);
        assert!(layout.bit_field_containers().all(|c| c.used_bits <= MAX_BIT_FIELD_BITS));
    }

    #[test]
    fn oversized_bit_field_overflows() {
        let wide = Part::field("Wide", TypeInfo::new("", 0, 64));
        let err = optimize(&[flag("A"), wide]).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::BitFieldOverflow { ref property, bits: 64 } if property == "Wide"
        ));
    }

    #[test]
    fn empty_case_still_occupies_a_byte() {
        let layout = optimize(&[header(0, 1), body(0, vec![vec![], vec![]])]).unwrap();
        let union = layout
            .items()
            .find_map(|item| match item {
                PackedItem::Union(union) => Some(union),
                _ => None,
            })
            .unwrap();
        assert_eq!(union.bits, MIN_UNION_BODY_BITS);
        assert_eq!(union.alignment, 1);
    }

    #[test]
    fn union_body_takes_the_largest_case() {
        let f64_part = Part::field("Mass", TypeInfo::new("f64", 8, 64));
        let layout = optimize(&[
            header(0, 2),
            body(0, vec![vec![flag("A")], vec![f64_part], vec![s32("C"), s32("D"), flag("E")]]),
        ])
        .unwrap();

        let union = layout
            .items()
            .find_map(|item| match item {
                PackedItem::Union(union) => Some(union),
                _ => None,
            })
            .unwrap();
        /* third case packs to 72 bits at alignment 4, padded to 96 */
        assert_eq!(union.cases[2].layout.packed_bits, 72);
        assert_eq!(union.cases[2].layout.bits, 96);
        /* the f64 case raises the body alignment, so 96 rounds up to 128 */
        assert_eq!(union.alignment, 8);
        assert_eq!(union.bits, 128);
        assert_eq!(union.cases[2].part_count, 3);
    }

    #[test]
    fn large_parts_follow_small_blocks_in_ascending_alignment() {
        let vec3 = Part::field("Position", TypeInfo::new("Vec3", 4, 96));
        let mass = Part::field("Mass", TypeInfo::new("f64", 8, 64));
        let tiny = Part::field("Tag", TypeInfo::new("u8", 1, 8));
        let layout = optimize(&[mass, vec3, tiny]).unwrap();

        assert_eq!(layout.blocks.len(), 3);
        assert_eq!(layout.blocks[0].alignment, 1);
        assert_eq!(layout.blocks[1].alignment, 4);
        assert_eq!(layout.blocks[2].alignment, 8);
        /* 8 + pad 24 + 96 = 128, already 64-bit aligned, + 64 */
        assert_eq!(layout.packed_bits, 192);
        assert_eq!(layout.bits, 192);
        assert_eq!(layout.alignment, 8);
    }

    #[test]
    fn less_aligned_block_start_is_not_padded() {
        let seven = Part::field("S", TypeInfo::new("Seven", 1, 56));
        let three = Part::field("T", TypeInfo::new("Three", 1, 24));
        let wide = Part::field("W", TypeInfo::new("u16", 2, 16));
        let layout = optimize(&[seven, three, wide]).unwrap();

        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.blocks[1].alignment, 2);
        /* Three starts at bit 56 and the u16 at bit 80 */
        assert_eq!(layout.packed_bits, 96);
        assert_eq!(layout.bits, 96);
        assert_eq!(layout.alignment, 2);
    }

    #[test]
    fn empty_part_list_has_no_storage() {
        let layout = optimize(&[]).unwrap();
        assert!(layout.blocks.is_empty());
        assert_eq!(layout.bits, 0);
        assert_eq!(layout.alignment, 0);
    }
}
