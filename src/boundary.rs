use std::collections::BTreeMap;
use std::ops::RangeBounds;

/// Reference-counted set of every coordinate used as a `begin` or `end` bound by the
/// intervals of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoundaryTable<K> {
    counts: BTreeMap<K, usize>,
}

impl<K> BoundaryTable<K> {
    pub fn new() -> Self {
        BoundaryTable {
            counts: BTreeMap::new(),
        }
    }

    pub fn min(&self) -> Option<&K> {
        self.counts.keys().next()
    }

    pub fn max(&self) -> Option<&K> {
        self.counts.keys().next_back()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

impl<K: Ord + Clone> BoundaryTable<K> {
    pub fn increment(&mut self, coord: &K) {
        *self.counts.entry(coord.clone()).or_insert(0) += 1;
    }

    /// Drops one use of `coord`. The entry disappears with its last use.
    pub fn decrement(&mut self, coord: &K) {
        if let Some(count) = self.counts.get_mut(coord) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(coord);
            }
        }
    }

    /// Boundaries falling within `range`, in increasing order.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> impl Iterator<Item = &K> {
        self.counts.range(range).map(|(coord, _)| coord)
    }

    #[cfg(test)]
    pub fn count(&self, coord: &K) -> usize {
        self.counts.get(coord).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Bound::{Excluded, Included};

    #[test]
    fn refcounts() {
        let mut table = BoundaryTable::new();
        table.increment(&1);
        table.increment(&5);
        table.increment(&5);
        table.increment(&9);
        assert_eq!(table.count(&5), 2);
        assert_eq!(table.min(), Some(&1));
        assert_eq!(table.max(), Some(&9));

        table.decrement(&5);
        assert_eq!(table.count(&5), 1);
        table.decrement(&5);
        assert_eq!(table.count(&5), 0);
        assert_eq!(table.len(), 2);

        table.decrement(&9);
        assert_eq!(table.max(), Some(&1));
        table.decrement(&1);
        assert_eq!(table.min(), None);
        assert_eq!(table.max(), None);
    }

    #[test]
    fn decrementing_unknown_coordinate_is_ignored() {
        let mut table = BoundaryTable::new();
        table.increment(&3);
        table.decrement(&4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn range_is_sorted() {
        let mut table = BoundaryTable::new();
        for coord in [7, 1, 4, 9, 2] {
            table.increment(&coord);
        }
        let inner: Vec<_> = table.range((Excluded(&1), Excluded(&9))).collect();
        assert_eq!(inner, vec![&2, &4, &7]);
        let from: Vec<_> = table.range((Included(&4), Excluded(&9))).collect();
        assert_eq!(from, vec![&4, &7]);
    }
}
