use std::cmp::Reverse;

/// One bin produced by [`bin_pack`]: its items in insertion order and the
/// running total reported by the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin<T> {
    pub items: Vec<T>,
    pub size: u64,
}

/// First-fit-decreasing bin packing.
///
/// Items are visited largest first (ties keep their input order) and placed
/// in the first bin whose accumulated total stays within `capacity`; a new bin
/// is opened otherwise. `accumulate(total, item)` gives the bin total after
/// appending `item`, which lets callers account for alignment padding.
pub fn bin_pack<T>(
    mut items: Vec<T>,
    capacity: u64,
    size_of: impl Fn(&T) -> u64,
    accumulate: impl Fn(u64, &T) -> u64,
) -> Vec<Bin<T>> {
    items.sort_by_key(|item| Reverse(size_of(item)));

    let mut bins: Vec<Bin<T>> = Vec::new();
    for item in items {
        let fit = bins.iter().enumerate().find_map(|(index, bin)| {
            let grown = accumulate(bin.size, &item);
            (grown <= capacity).then_some((index, grown))
        });

        match fit {
            Some((index, grown)) => {
                let bin = &mut bins[index];
                bin.items.push(item);
                bin.size = grown;
            }
            None => {
                let size = accumulate(0, &item);
                bins.push(Bin {
                    items: vec![item],
                    size,
                });
            }
        }
    }

    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(sizes: Vec<u64>, capacity: u64) -> Vec<Bin<u64>> {
        bin_pack(sizes, capacity, |size| *size, |total, size| total + size)
    }

    #[test]
    fn packs_largest_first() {
        let bins = plain(vec![10, 40, 30, 20], 64);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].items, vec![40, 20]);
        assert_eq!(bins[0].size, 60);
        assert_eq!(bins[1].items, vec![30, 10]);
        assert_eq!(bins[1].size, 40);
    }

    #[test]
    fn first_fit_reuses_earlier_bins() {
        let bins = plain(vec![50, 50, 10, 4], 64);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].items, vec![50, 10, 4]);
        assert_eq!(bins[1].items, vec![50]);
    }

    #[test]
    fn accumulator_controls_fit() {
        /* every item costs double its nominal size */
        let bins = bin_pack(vec![16, 16], 64, |size| *size, |total, size| total + size * 2);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].size, 64);
    }

    #[test]
    fn empty_input_yields_no_bins() {
        assert!(plain(Vec::new(), 64).is_empty());
    }
}
