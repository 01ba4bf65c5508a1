use crate::boundary::BoundaryTable;
use crate::error::{IntervalTreeError, Result};
use crate::interval::Interval;
use crate::node::Node;
use log::debug;
use rustc_hash::FxHashSet;
use std::cmp;
use std::collections::{hash_set, BTreeSet};
use std::fmt;
use std::hash::Hash;
use std::ops::Bound::Excluded;
use std::ops::Sub;
#[cfg(feature="serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An interval tree, holding half-open intervals `[begin, end)` along with their data.
///
/// Three structures are kept in sync by every mutation: a self-balancing tree of
/// pivot-centered nodes answering the queries, a flat set of all intervals for membership
/// and iteration, and a reference-counted table of every bound in use.
///
/// Null intervals (`begin == end`) can be stored, found with
/// [`contains`](IntervalTree::contains) and removed, but no query ever returns them.
#[derive(Clone)]
pub struct IntervalTree<K, V> {
    all_intervals: FxHashSet<Interval<K, V>>,
    top_node: Option<Box<Node<K, V>>>,
    boundary_table: BoundaryTable<K>,
}

impl<K, V> Default for IntervalTree<K, V> {
    fn default() -> Self {
        IntervalTree::new()
    }
}

impl<K, V> IntervalTree<K, V> {
    /// Constructs a new empty tree.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let t = IntervalTree::<u64, &str>::new();
    /// assert!(t.is_empty());
    /// assert_eq!(t.begin(), None);
    /// ```
    pub fn new() -> Self {
        IntervalTree {
            all_intervals: FxHashSet::default(),
            top_node: None,
            boundary_table: BoundaryTable::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.all_intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_intervals.is_empty()
    }

    /// Iterates over the stored intervals, in no particular order.
    pub fn iter(&self) -> hash_set::Iter<'_, Interval<K, V>> {
        self.all_intervals.iter()
    }

    /// The lowest bound in use, or `None` if the tree is empty.
    pub fn begin(&self) -> Option<&K> {
        self.boundary_table.min()
    }

    /// The highest bound in use, or `None` if the tree is empty.
    pub fn end(&self) -> Option<&K> {
        self.boundary_table.max()
    }

    /// `(begin(), end())`, or `None` if the tree is empty.
    pub fn range(&self) -> Option<(&K, &K)> {
        self.begin().zip(self.end())
    }

    pub fn clear(&mut self) {
        self.all_intervals.clear();
        self.top_node = None;
        self.boundary_table.clear();
    }
}

impl<K: Ord, V: Ord> IntervalTree<K, V> {
    /// Returns the stored intervals in increasing order.
    pub fn sorted(&self) -> Vec<&Interval<K, V>> {
        let mut intervals: Vec<_> = self.all_intervals.iter().collect();
        intervals.sort_unstable();
        intervals
    }
}

impl<K, V> IntervalTree<K, V>
where
    K: Ord + Clone + Hash,
    V: Ord + Clone + Hash,
{
    /// Builds a balanced tree out of `intervals` at once, which is faster than adding
    /// them one by one. Duplicates are stored once.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{Interval, IntervalTree};
    ///
    /// let t = IntervalTree::from_intervals(vec![
    ///     Interval::new(1, 2, "a").unwrap(),
    ///     Interval::new(4, 7, "b").unwrap(),
    ///     Interval::new(4, 7, "b").unwrap(),
    /// ]);
    /// assert_eq!(t.len(), 2);
    /// assert_eq!(t.range(), Some((&1, &7)));
    /// ```
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval<K, V>>,
    {
        let all_intervals: FxHashSet<_> = intervals.into_iter().collect();
        let mut boundary_table = BoundaryTable::new();
        for iv in &all_intervals {
            boundary_table.increment(iv.begin());
            boundary_table.increment(iv.end());
        }
        let top_node = Node::from_intervals(all_intervals.iter().cloned().collect());
        IntervalTree {
            all_intervals,
            top_node,
            boundary_table,
        }
    }

    /// Same as [`from_intervals`](Self::from_intervals), from `(begin, end, data)` triples.
    /// Fails on the first triple with `begin > end`.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{IntervalTree, IntervalTreeError};
    ///
    /// let t = IntervalTree::from_tuples(vec![(1, 2, 'a'), (4, 7, 'b')]).unwrap();
    /// assert!(t.containsi(4, 7, 'b'));
    ///
    /// let err = IntervalTree::from_tuples(vec![(1, 2, 'a'), (7, 4, 'b')]).unwrap_err();
    /// assert_eq!(err, IntervalTreeError::InvalidInterval);
    /// ```
    pub fn from_tuples<I>(tuples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, K, V)>,
    {
        tuples
            .into_iter()
            .map(|(begin, end, data)| Interval::new(begin, end, data))
            .collect::<Result<Vec<_>>>()
            .map(IntervalTree::from_intervals)
    }

    /// Adds `interval` to the tree. Returns false, leaving the tree unchanged, if it was
    /// already stored.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut t = IntervalTree::new();
    /// assert!(t.add(Interval::new(2, 5, "x").unwrap()));
    /// assert!(!t.add(Interval::new(2, 5, "x").unwrap()));
    /// assert!(t.add(Interval::new(2, 5, "y").unwrap()));
    /// assert_eq!(t.len(), 2);
    /// ```
    pub fn add(&mut self, interval: Interval<K, V>) -> bool {
        if self.all_intervals.contains(&interval) {
            return false;
        }
        if !interval.is_null() {
            self.top_node = Some(match self.top_node.take() {
                Some(node) => node.add(interval.clone()),
                None => Node::from_interval(interval.clone()),
            });
        }
        self.boundary_table.increment(interval.begin());
        self.boundary_table.increment(interval.end());
        self.all_intervals.insert(interval);
        true
    }

    /// Shortcut for `add(Interval::new(begin, end, data)?)`.
    pub fn addi(&mut self, begin: K, end: K, data: V) -> Result<bool> {
        Ok(self.add(Interval::new(begin, end, data)?))
    }

    /// Removes `interval` from the tree. Fails with [`IntervalTreeError::NotFound`],
    /// leaving the tree untouched, if no interval with the same bounds and data is stored.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{Interval, IntervalTree, IntervalTreeError};
    ///
    /// let iv = Interval::new(2, 5, "x").unwrap();
    /// let mut t = IntervalTree::from_intervals(vec![iv.clone()]);
    /// assert_eq!(t.remove(&iv), Ok(()));
    /// assert_eq!(t.remove(&iv), Err(IntervalTreeError::NotFound));
    /// ```
    pub fn remove(&mut self, interval: &Interval<K, V>) -> Result<()> {
        if !self.all_intervals.contains(interval) {
            return Err(IntervalTreeError::NotFound);
        }
        self.remove_stored(interval);
        Ok(())
    }

    /// Shortcut for `remove(&Interval::new(begin, end, data)?)`.
    pub fn removei(&mut self, begin: K, end: K, data: V) -> Result<()> {
        self.remove(&Interval::new(begin, end, data)?)
    }

    /// Removes `interval` if it is stored. Returns whether it was.
    pub fn discard(&mut self, interval: &Interval<K, V>) -> bool {
        if !self.all_intervals.contains(interval) {
            return false;
        }
        self.remove_stored(interval);
        true
    }

    pub fn discardi(&mut self, begin: K, end: K, data: V) -> bool {
        Interval::new(begin, end, data).map_or(false, |iv| self.discard(&iv))
    }

    fn remove_stored(&mut self, interval: &Interval<K, V>) {
        if !interval.is_null() {
            if let Some(node) = self.top_node.take() {
                self.top_node = node.remove(interval);
            }
        }
        self.boundary_table.decrement(interval.begin());
        self.boundary_table.decrement(interval.end());
        self.all_intervals.remove(interval);
    }

    fn remove_all(&mut self, intervals: &[Interval<K, V>]) {
        for iv in intervals {
            self.remove_stored(iv);
        }
    }

    pub fn contains(&self, interval: &Interval<K, V>) -> bool {
        self.all_intervals.contains(interval)
    }

    /// Whether the interval `[begin, end)` holding `data` is stored. Always false if
    /// `begin > end`.
    pub fn containsi(&self, begin: K, end: K, data: V) -> bool {
        Interval::new(begin, end, data).map_or(false, |iv| self.contains(&iv))
    }

    /// Returns the intervals containing `point`.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let t = IntervalTree::from_tuples(vec![(1, 2, "a"), (4, 7, "b"), (5, 9, "c")]).unwrap();
    /// let hits: Vec<_> = t.search_point(&6).into_iter().map(|iv| *iv.data()).collect();
    /// assert_eq!(hits, vec!["b", "c"]);
    /// assert!(t.search_point(&3).is_empty());
    /// ```
    pub fn search_point(&self, point: &K) -> BTreeSet<&Interval<K, V>> {
        let mut result = BTreeSet::new();
        if let Some(ref node) = self.top_node {
            node.search_point(point, &mut result);
        }
        result
    }

    /// Returns the intervals overlapping `[begin, end)` or, if `strict` is set, those
    /// lying entirely within it. An empty range matches nothing.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{Interval, IntervalTree};
    ///
    /// let t = IntervalTree::from_tuples(vec![(1, 2, "a"), (4, 7, "b"), (5, 9, "c")]).unwrap();
    /// let a = Interval::new(1, 2, "a").unwrap();
    /// let b = Interval::new(4, 7, "b").unwrap();
    /// assert_eq!(t.search_range(&1, &5, false).into_iter().collect::<Vec<_>>(), vec![&a, &b]);
    /// assert_eq!(t.search_range(&1, &8, true).into_iter().collect::<Vec<_>>(), vec![&a, &b]);
    /// assert!(t.search_range(&2, &4, false).is_empty());
    /// ```
    pub fn search_range(&self, begin: &K, end: &K, strict: bool) -> BTreeSet<&Interval<K, V>> {
        let mut result = BTreeSet::new();
        if begin >= end {
            return result;
        }
        if let Some(ref node) = self.top_node {
            node.search_range(begin, end, strict, &mut result);
        }
        result
    }

    /// Intervals overlapping `[begin, end)`.
    pub fn overlap(&self, begin: &K, end: &K) -> BTreeSet<&Interval<K, V>> {
        self.search_range(begin, end, false)
    }

    /// Intervals lying entirely within `[begin, end)`.
    pub fn envelop(&self, begin: &K, end: &K) -> BTreeSet<&Interval<K, V>> {
        self.search_range(begin, end, true)
    }

    /// Whether some interval contains `point`.
    pub fn overlaps_point(&self, point: &K) -> bool {
        self.top_node
            .as_ref()
            .map_or(false, |node| node.contains_point(point))
    }

    /// Whether some interval overlaps `[begin, end)`.
    pub fn overlaps_range(&self, begin: &K, end: &K) -> bool {
        if begin >= end {
            return false;
        }
        // Anything overlapping the range either contains `begin` or starts inside it.
        self.overlaps_point(begin)
            || self
                .boundary_table
                .range((Excluded(begin), Excluded(end)))
                .any(|bound| self.overlaps_point(bound))
    }

    /// Removes the intervals containing `point` and returns them.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(1, 3, ()), (2, 6, ()), (5, 9, ())]).unwrap();
    /// assert_eq!(t.remove_overlap(&2).len(), 2);
    /// assert_eq!(t.len(), 1);
    /// ```
    pub fn remove_overlap(&mut self, point: &K) -> Vec<Interval<K, V>> {
        let hits: Vec<_> = self.search_point(point).into_iter().cloned().collect();
        self.remove_all(&hits);
        hits
    }

    /// Removes the intervals overlapping `[begin, end)` and returns them.
    pub fn remove_overlap_range(&mut self, begin: &K, end: &K) -> Vec<Interval<K, V>> {
        let hits: Vec<_> = self.overlap(begin, end).into_iter().cloned().collect();
        self.remove_all(&hits);
        hits
    }

    /// Removes the intervals lying entirely within `[begin, end)` and returns them.
    pub fn remove_envelop(&mut self, begin: &K, end: &K) -> Vec<Interval<K, V>> {
        let hits: Vec<_> = self.envelop(begin, end).into_iter().cloned().collect();
        self.remove_all(&hits);
        hits
    }

    /// Removes `[begin, end)` from every interval. Intervals sticking out of the range are
    /// shortened, and split in two if they stick out on both sides. Remainders keep the data
    /// of the interval they come from.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(0, 10, "x"), (4, 6, "y")]).unwrap();
    /// t.chop(&3, &7);
    /// assert!(t.containsi(0, 3, "x"));
    /// assert!(t.containsi(7, 10, "x"));
    /// assert_eq!(t.len(), 2);
    /// ```
    pub fn chop(&mut self, begin: &K, end: &K) {
        self.chop_with(begin, end, |iv, _| iv.data().clone());
    }

    /// Same as [`chop`](Self::chop), computing the data of each remainder with
    /// `f(original, is_left_remainder)`.
    pub fn chop_with<F>(&mut self, begin: &K, end: &K, mut f: F)
    where
        F: FnMut(&Interval<K, V>, bool) -> V,
    {
        let hits: Vec<_> = self.overlap(begin, end).into_iter().cloned().collect();
        let mut remainders = Vec::new();
        for iv in &hits {
            if iv.begin() < begin {
                remainders.push(Interval::new_unchecked(iv.begin().clone(), begin.clone(), f(iv, true)));
            }
            if iv.end() > end {
                remainders.push(Interval::new_unchecked(end.clone(), iv.end().clone(), f(iv, false)));
            }
        }
        debug!("chop removed {} intervals, added back {} remainders", hits.len(), remainders.len());
        self.remove_all(&hits);
        self.update(remainders);
    }

    /// Splits every interval strictly containing `point` into `[begin, point)` and
    /// `[point, end)`, both keeping the original data.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(0, 10, "x"), (5, 8, "y")]).unwrap();
    /// t.slice(&5);
    /// assert!(t.containsi(0, 5, "x"));
    /// assert!(t.containsi(5, 10, "x"));
    /// assert!(t.containsi(5, 8, "y"));
    /// ```
    pub fn slice(&mut self, point: &K) {
        self.slice_with(point, |iv, _| iv.data().clone());
    }

    /// Same as [`slice`](Self::slice), computing the data of each half with
    /// `f(original, is_lower_half)`.
    pub fn slice_with<F>(&mut self, point: &K, mut f: F)
    where
        F: FnMut(&Interval<K, V>, bool) -> V,
    {
        let hits: Vec<_> = self
            .search_point(point)
            .into_iter()
            .filter(|iv| iv.begin() != point)
            .cloned()
            .collect();
        let mut halves = Vec::with_capacity(hits.len() * 2);
        for iv in &hits {
            halves.push(Interval::new_unchecked(iv.begin().clone(), point.clone(), f(iv, true)));
            halves.push(Interval::new_unchecked(point.clone(), iv.end().clone(), f(iv, false)));
        }
        debug!("slice split {} intervals", hits.len());
        self.remove_all(&hits);
        self.update(halves);
    }

    /// Splits intervals at every bound used in the tree, so that any two stored intervals
    /// either have the same bounds or don't overlap. Each piece keeps the data of the
    /// interval it comes from.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(0, 4, "a"), (2, 6, "b")]).unwrap();
    /// t.split_overlaps();
    /// let bounds: Vec<_> = t.sorted().iter().map(|iv| (*iv.begin(), *iv.end(), *iv.data())).collect();
    /// assert_eq!(bounds, vec![(0, 2, "a"), (2, 4, "a"), (2, 4, "b"), (4, 6, "b")]);
    /// ```
    pub fn split_overlaps(&mut self) {
        let mut pieces = Vec::with_capacity(self.len());
        for iv in &self.all_intervals {
            if iv.is_null() {
                pieces.push(iv.clone());
                continue;
            }
            let mut lower = iv.begin().clone();
            for bound in self.boundary_table.range((Excluded(iv.begin()), Excluded(iv.end()))) {
                pieces.push(Interval::new_unchecked(lower, bound.clone(), iv.data().clone()));
                lower = bound.clone();
            }
            pieces.push(Interval::new_unchecked(lower, iv.end().clone(), iv.data().clone()));
        }
        debug!("split_overlaps turned {} intervals into {} pieces", self.len(), pieces.len());
        *self = IntervalTree::from_intervals(pieces);
    }

    /// Merges overlapping intervals into single intervals spanning them. With `strict` off,
    /// intervals merely touching (one ends where the other begins) are merged too.
    /// Data of merged intervals is folded in increasing interval order with `reducer`.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(0, 4, 1), (2, 6, 2), (6, 8, 4)]).unwrap();
    /// t.merge_overlaps(true, |acc, next| acc + next);
    /// assert!(t.containsi(0, 6, 3));
    /// assert!(t.containsi(6, 8, 4));
    ///
    /// t.merge_overlaps(false, |acc, next| acc + next);
    /// assert!(t.containsi(0, 8, 7));
    /// assert_eq!(t.len(), 1);
    /// ```
    pub fn merge_overlaps<R>(&mut self, strict: bool, reducer: R)
    where
        R: FnMut(V, V) -> V,
    {
        self.merge_sorted(
            |lower, higher| {
                higher.begin() < lower.end() || (!strict && higher.begin() == lower.end())
            },
            reducer,
        );
    }

    /// Merges intervals having the same bounds, folding their data with `reducer`.
    pub fn merge_equals<R>(&mut self, reducer: R)
    where
        R: FnMut(V, V) -> V,
    {
        self.merge_sorted(|lower, higher| lower.range_matches(higher), reducer);
    }

    /// Walks the intervals in increasing order, merging each into the previously kept one
    /// whenever `should_merge(kept, next)` holds.
    fn merge_sorted<M, R>(&mut self, mut should_merge: M, mut reducer: R)
    where
        M: FnMut(&Interval<K, V>, &Interval<K, V>) -> bool,
        R: FnMut(V, V) -> V,
    {
        let count = self.len();
        let mut sorted: Vec<_> = std::mem::take(&mut self.all_intervals).into_iter().collect();
        sorted.sort_unstable();

        let mut merged: Vec<Interval<K, V>> = Vec::with_capacity(sorted.len());
        for higher in sorted {
            if let Some(lower) = merged.pop() {
                if should_merge(&lower, &higher) {
                    let (begin, lower_end, acc) = lower.into_parts();
                    let (_, higher_end, data) = higher.into_parts();
                    let end = cmp::max(lower_end, higher_end);
                    merged.push(Interval::new_unchecked(begin, end, reducer(acc, data)));
                    continue;
                }
                merged.push(lower);
            }
            merged.push(higher);
        }
        debug!("merged {} intervals into {}", count, merged.len());
        *self = IntervalTree::from_intervals(merged);
    }

    /// Adds every interval of `intervals`.
    pub fn update<I>(&mut self, intervals: I)
    where
        I: IntoIterator<Item = Interval<K, V>>,
    {
        for iv in intervals {
            self.add(iv);
        }
    }

    /// Returns a tree holding the intervals of both trees.
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.update(other.iter().cloned());
        result
    }

    /// Returns a tree holding the intervals of `self` not stored in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|iv| !other.contains(iv)).cloned().collect()
    }

    /// Removes the intervals stored in `other`.
    pub fn difference_update(&mut self, other: &Self) {
        for iv in other {
            self.discard(iv);
        }
    }

    /// Returns a tree holding the intervals stored in both trees.
    pub fn intersection(&self, other: &Self) -> Self {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller.iter().filter(|iv| larger.contains(iv)).cloned().collect()
    }

    /// Keeps only the intervals also stored in `other`.
    pub fn intersection_update(&mut self, other: &Self) {
        let missing: Vec<_> = self.iter().filter(|iv| !other.contains(iv)).cloned().collect();
        self.remove_all(&missing);
    }

    /// Returns a tree holding the intervals stored in exactly one of both trees.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.symmetric_difference_update(other);
        result
    }

    /// Keeps the intervals stored in exactly one of both trees.
    pub fn symmetric_difference_update(&mut self, other: &Self) {
        for iv in other {
            if !self.discard(iv) {
                self.add(iv.clone());
            }
        }
    }

    /// Returns a copy of the set of stored intervals.
    pub fn items(&self) -> FxHashSet<Interval<K, V>> {
        self.all_intervals.clone()
    }

    /// Renders the internal node layout, one node per line, for debugging.
    pub fn structure(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Debug,
    {
        self.top_node
            .as_ref()
            .map_or_else(String::new, |node| node.to_string())
    }

    /// Checks the internal invariants: every node is balanced and only holds intervals
    /// covering its pivot and fitting its position, the nodes hold each non-null stored
    /// interval exactly once, and the boundary table counts the bounds of all stored
    /// intervals.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples((0..100).map(|i| (i, i + 10, i))).unwrap();
    /// t.remove_overlap(&50);
    /// assert!(t.verify());
    /// ```
    pub fn verify(&self) -> bool {
        let mut in_nodes = FxHashSet::default();
        let mut node_slots = 0;
        let mut nodes_valid = true;
        if let Some(ref node) = self.top_node {
            nodes_valid = node.verify(None, None);
            node.for_each(&mut |iv| {
                node_slots += 1;
                in_nodes.insert(iv);
            });
        }
        let stored: FxHashSet<_> = self.all_intervals.iter().filter(|iv| !iv.is_null()).collect();

        let mut bounds = BoundaryTable::new();
        for iv in &self.all_intervals {
            bounds.increment(iv.begin());
            bounds.increment(iv.end());
        }

        let valid = nodes_valid
            && node_slots == stored.len()
            && in_nodes == stored
            && bounds == self.boundary_table;
        if !valid {
            debug!("tree failed verification: {} intervals stored, {} held by nodes", stored.len(), node_slots);
        }
        valid
    }
}

impl<K, V> IntervalTree<K, V>
where
    K: Ord + Clone + Hash + Sub<Output = K>,
    V: Ord + Clone + Hash,
{
    /// `end() - begin()`, or `None` if the tree is empty.
    pub fn span(&self) -> Option<K> {
        self.range()
            .map(|(begin, end)| end.clone() - begin.clone())
    }

    /// Merges intervals separated by a gap of at most `distance`, folding their data with
    /// `reducer`. With `strict` on, overlapping intervals aren't merged: the later one
    /// starts a new series instead.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::IntervalTree;
    ///
    /// let mut t = IntervalTree::from_tuples(vec![(0, 2, 1), (3, 5, 2), (9, 10, 4)]).unwrap();
    /// t.merge_neighbors(1, true, |acc, next| acc + next);
    /// assert!(t.containsi(0, 5, 3));
    /// assert!(t.containsi(9, 10, 4));
    /// ```
    pub fn merge_neighbors<R>(&mut self, distance: K, strict: bool, reducer: R)
    where
        R: FnMut(V, V) -> V,
    {
        self.merge_sorted(
            |lower, higher| {
                if higher.begin() < lower.end() {
                    !strict
                } else {
                    higher.begin().clone() - lower.end().clone() <= distance
                }
            },
            reducer,
        );
    }
}

impl<K, V> PartialEq for IntervalTree<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    /// Two trees are equal if they store the same intervals, whatever their layout.
    fn eq(&self, other: &Self) -> bool {
        self.all_intervals == other.all_intervals
    }
}

impl<K: Eq + Hash, V: Eq + Hash> Eq for IntervalTree<K, V> {}

impl<K, V> FromIterator<Interval<K, V>> for IntervalTree<K, V>
where
    K: Ord + Clone + Hash,
    V: Ord + Clone + Hash,
{
    fn from_iter<I: IntoIterator<Item = Interval<K, V>>>(iter: I) -> Self {
        IntervalTree::from_intervals(iter)
    }
}

impl<K, V> Extend<Interval<K, V>> for IntervalTree<K, V>
where
    K: Ord + Clone + Hash,
    V: Ord + Clone + Hash,
{
    fn extend<I: IntoIterator<Item = Interval<K, V>>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a IntervalTree<K, V> {
    type Item = &'a Interval<K, V>;
    type IntoIter = hash_set::Iter<'a, Interval<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.all_intervals.iter()
    }
}

impl<K, V> IntoIterator for IntervalTree<K, V> {
    type Item = Interval<K, V>;
    type IntoIter = hash_set::IntoIter<Interval<K, V>>;

    /// Return an iterator over all intervals, consuming the tree in the process.
    fn into_iter(self) -> Self::IntoIter {
        self.all_intervals.into_iter()
    }
}

impl<K, V> fmt::Debug for IntervalTree<K, V>
where
    K: fmt::Debug + Ord,
    V: fmt::Debug + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("IntervalTree").field(&self.sorted()).finish()
    }
}

impl<K, V> fmt::Display for IntervalTree<K, V>
where
    K: fmt::Display + Ord,
    V: fmt::Debug + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IntervalTree([")?;
        for (i, iv) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", iv)?;
        }
        write!(f, "])")
    }
}

#[cfg(feature="serde")]
impl<K, V> Serialize for IntervalTree<K, V>
where
    K: Serialize + Ord,
    V: Serialize + Ord,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

#[cfg(feature="serde")]
impl<'de, K, V> Deserialize<'de> for IntervalTree<K, V>
where
    K: Deserialize<'de> + Ord + Clone + Hash,
    V: Deserialize<'de> + Ord + Clone + Hash,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Interval<K, V>>::deserialize(deserializer).map(IntervalTree::from_intervals)
    }
}
