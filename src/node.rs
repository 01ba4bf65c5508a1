use crate::interval::Interval;
use log::trace;
use std::cmp;
use std::collections::BTreeSet;
use std::fmt;

/// A pivot-centered node of the tree.
///
/// `center` holds the intervals covering `pivot`. Everything in the `left` subtree ends
/// at or before `pivot`, everything in the `right` subtree begins after it. `center` is
/// never empty, and null intervals are never stored in nodes since they cover nothing.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub pivot: K,
    pub center: BTreeSet<Interval<K, V>>,
    pub left: Option<Box<Node<K, V>>>,
    pub right: Option<Box<Node<K, V>>>,
    height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    Left,
    Right,
}

impl<K, V> fmt::Display for Node<K, V>
where
    K: fmt::Display,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_structure(f, 0)
    }
}

impl<K, V> Node<K, V> {
    fn write_structure(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result
    where
        K: fmt::Display,
        V: fmt::Debug,
    {
        let pad = "    ".repeat(indent);
        writeln!(f, "Node<{}, height={}>", self.pivot, self.height)?;
        for iv in &self.center {
            writeln!(f, "{} {}", pad, iv)?;
        }
        if let Some(ref left) = self.left {
            write!(f, "{}<:  ", pad)?;
            left.write_structure(f, indent + 1)?;
        }
        if let Some(ref right) = self.right {
            write!(f, "{}>:  ", pad)?;
            right.write_structure(f, indent + 1)?;
        }
        Ok(())
    }

    fn diff_of_successors_height(&self) -> i32 {
        let l = height(&self.left);
        let r = height(&self.right);
        (l as i32) - (r as i32)
    }

    fn update_height(&mut self) {
        self.height = cmp::max(height(&self.left), height(&self.right)) + 1;
    }
}

impl<K: Ord + Clone, V: Ord + Clone> Node<K, V> {
    /// Creates a leaf holding `interval`, pivoted on its begin bound. `interval` must not
    /// be null.
    pub fn from_interval(interval: Interval<K, V>) -> Box<Self> {
        Box::new(Node {
            pivot: interval.begin().clone(),
            center: BTreeSet::from([interval]),
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Builds a balanced subtree out of an unsorted batch of intervals. Null intervals
    /// are skipped. Returns `None` if nothing is left to store.
    pub fn from_intervals(mut intervals: Vec<Interval<K, V>>) -> Option<Box<Self>> {
        intervals.retain(|iv| !iv.is_null());
        intervals.sort_unstable();
        intervals.dedup();
        Node::from_sorted(intervals)
    }

    fn from_sorted(intervals: Vec<Interval<K, V>>) -> Option<Box<Self>> {
        if intervals.is_empty() {
            return None;
        }
        // Median of the distinct begin bounds. Whichever interval starts there covers it,
        // so the center can't end up empty.
        let mut begins: Vec<&K> = intervals.iter().map(|iv| iv.begin()).collect();
        begins.dedup();
        let pivot = begins[begins.len() / 2].clone();

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut center = BTreeSet::new();
        for iv in intervals {
            if *iv.end() <= pivot {
                left.push(iv);
            } else if *iv.begin() > pivot {
                right.push(iv);
            } else {
                center.insert(iv);
            }
        }

        let node = Box::new(Node {
            pivot,
            center,
            left: Node::from_sorted(left),
            right: Node::from_sorted(right),
            height: 1,
        });
        Some(node.rebalance())
    }

    fn center_hit(&self, interval: &Interval<K, V>) -> bool {
        interval.contains_point(&self.pivot)
    }

    /// Which subtree `interval` belongs to, assuming it doesn't cover the pivot.
    fn hit_branch(&self, interval: &Interval<K, V>) -> Branch {
        if *interval.begin() > self.pivot {
            Branch::Right
        } else {
            Branch::Left
        }
    }

    /// Inserts `interval` in the subtree and returns its new root. `interval` must not be
    /// null.
    pub fn add(mut self: Box<Self>, interval: Interval<K, V>) -> Box<Self> {
        if self.center_hit(&interval) {
            self.center.insert(interval);
            return self;
        }
        match self.hit_branch(&interval) {
            Branch::Left => self.left = Some(Node::add_in_successor(self.left.take(), interval)),
            Branch::Right => self.right = Some(Node::add_in_successor(self.right.take(), interval)),
        }
        self.rebalance()
    }

    fn add_in_successor(succ: Option<Box<Self>>, interval: Interval<K, V>) -> Box<Self> {
        match succ {
            Some(succ) => succ.add(interval),
            None => Node::from_interval(interval),
        }
    }

    /// Removes `interval` from the subtree, if present. Returns the new root, or `None` if
    /// the subtree became empty.
    pub fn remove(mut self: Box<Self>, interval: &Interval<K, V>) -> Option<Box<Self>> {
        if self.center_hit(interval) {
            if self.center.remove(interval) && self.center.is_empty() {
                return self.prune();
            }
            return Some(self);
        }
        let succ = match self.hit_branch(interval) {
            Branch::Left => &mut self.left,
            Branch::Right => &mut self.right,
        };
        match succ.take() {
            Some(node) => {
                *succ = node.remove(interval);
                Some(self.rebalance())
            }
            None => Some(self),
        }
    }

    /// Replaces this node, whose center has been emptied, with the subtree that should
    /// stand in its place.
    fn prune(mut self: Box<Self>) -> Option<Box<Self>> {
        match (self.left.take(), self.right.take()) {
            (None, None) => None,
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (Some(l), Some(r)) => {
                let (mut heir, rest) = l.pop_greatest_child();
                trace!("pruned inner node, promoted predecessor holding {} intervals", heir.center.len());
                heir.left = rest;
                heir.right = Some(r);
                Some(heir.rebalance())
            }
        }
    }

    /// Detaches the node with the greatest pivot in this subtree and returns it childless,
    /// along with the rest of the subtree. Intervals of the remaining nodes that cover the
    /// detached pivot are moved into the detached node, so it can be installed above them.
    fn pop_greatest_child(mut self: Box<Self>) -> (Box<Self>, Option<Box<Self>>) {
        match self.right.take() {
            None => {
                let rest = self.left.take();
                self.height = 1;
                (self, rest)
            }
            Some(right) => {
                let (mut greatest, rest) = right.pop_greatest_child();
                self.right = rest;
                greatest.center.append(&mut self.drain_hits(&greatest.pivot));
                let remaining = if self.center.is_empty() {
                    self.prune()
                } else {
                    Some(self.rebalance())
                };
                (greatest, remaining)
            }
        }
    }

    /// Takes out of `center` every interval covering `point`.
    fn drain_hits(&mut self, point: &K) -> BTreeSet<Interval<K, V>> {
        let (hits, kept) = std::mem::take(&mut self.center)
            .into_iter()
            .partition(|iv| iv.contains_point(point));
        self.center = kept;
        hits
    }

    /// Ends a rotation: `self` has just been moved under `new_root`. Intervals of `self`
    /// covering the pivot of `new_root` have to live there now. Returns what is left of
    /// `self`.
    fn settle_under(mut self: Box<Self>, new_root: &mut Node<K, V>) -> Option<Box<Self>> {
        let mut lifted = self.drain_hits(&new_root.pivot);
        if !lifted.is_empty() {
            trace!("rotation lifted {} intervals into the new root", lifted.len());
            new_root.center.append(&mut lifted);
        }
        if self.center.is_empty() {
            self.prune()
        } else {
            Some(self.rebalance())
        }
    }

    /// Perform a single right rotation on this (sub) tree
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.left.take().expect("Avl broken");
        self.left = new_root.right.take();
        new_root.right = self.settle_under(&mut new_root);
        new_root.rebalance()
    }

    /// Perform a single left rotation on this (sub) tree
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.right.take().expect("Avl broken");
        self.right = new_root.left.take();
        new_root.left = self.settle_under(&mut new_root);
        new_root.rebalance()
    }

    /// Performs a rotation that counteracts the fact that the left successor is too high
    fn rotate_left_successor(mut self: Box<Self>) -> Box<Self> {
        let left = self.left.take().expect("Avl broken");
        if height(&left.left) < height(&left.right) {
            self.left = Some(left.rotate_left());
        } else {
            self.left = Some(left);
        }
        self.rotate_right()
    }

    /// Performs a rotation that counteracts the fact that the right successor is too high
    fn rotate_right_successor(mut self: Box<Self>) -> Box<Self> {
        let right = self.right.take().expect("Avl broken");
        if height(&right.left) > height(&right.right) {
            self.right = Some(right.rotate_right());
        } else {
            self.right = Some(right);
        }
        self.rotate_left()
    }

    /// Updates the cached height and rotates if the successors' heights differ by more
    /// than one. Both successors must already be balanced.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.update_height();
        match self.diff_of_successors_height() {
            d if d > 1 => self.rotate_left_successor(),
            d if d < -1 => self.rotate_right_successor(),
            _ => self,
        }
    }

    /// Collects into `result` the intervals containing `point`.
    pub fn search_point<'a>(&'a self, point: &K, result: &mut BTreeSet<&'a Interval<K, V>>) {
        if *point <= self.pivot {
            // Every interval here ends after the pivot, so only the begin bound matters.
            result.extend(self.center.iter().take_while(|iv| iv.begin() <= point));
        } else {
            result.extend(self.center.iter().filter(|iv| iv.end() > point));
        }
        if *point < self.pivot {
            if let Some(ref left) = self.left {
                left.search_point(point, result);
            }
        } else if *point > self.pivot {
            if let Some(ref right) = self.right {
                right.search_point(point, result);
            }
        }
    }

    /// Collects into `result` the intervals overlapping `[begin, end)`, or, if `strict`,
    /// those lying entirely within it.
    pub fn search_range<'a>(
        &'a self,
        begin: &K,
        end: &K,
        strict: bool,
        result: &mut BTreeSet<&'a Interval<K, V>>,
    ) {
        let hits = self.center.iter().filter(|iv| {
            iv.overlaps_range(begin, end) && (!strict || iv.enveloped_by(begin, end))
        });
        result.extend(hits);
        if *begin < self.pivot {
            if let Some(ref left) = self.left {
                left.search_range(begin, end, strict, result);
            }
        }
        if *end > self.pivot {
            if let Some(ref right) = self.right {
                right.search_range(begin, end, strict, result);
            }
        }
    }

    /// Whether any interval of the subtree contains `point`.
    pub fn contains_point(&self, point: &K) -> bool {
        if self.center.iter().any(|iv| iv.contains_point(point)) {
            return true;
        }
        let succ = if *point > self.pivot { &self.right } else { &self.left };
        succ.as_ref().map_or(false, |node| node.contains_point(point))
    }

    /// Checks every structural invariant of the subtree: cached heights, AVL balance,
    /// non-empty centers, and that each interval sits at the only node where it may live.
    /// `lo` and `hi` are the pivots of the closest ancestors the subtree hangs right and
    /// left of, respectively.
    pub fn verify(&self, lo: Option<&K>, hi: Option<&K>) -> bool {
        let heights = self.height == cmp::max(height(&self.left), height(&self.right)) + 1;
        let balanced = self.diff_of_successors_height().abs() <= 1;
        let centered = !self.center.is_empty()
            && self.center.iter().all(|iv| {
                iv.contains_point(&self.pivot)
                    && lo.map_or(true, |lo| iv.begin() > lo)
                    && hi.map_or(true, |hi| iv.end() <= hi)
            });
        if !(heights && balanced && centered) {
            trace!("invalid node: heights={}, balanced={}, centered={}", heights, balanced, centered);
            return false;
        }
        let left = self
            .left
            .as_ref()
            .map_or(true, |l| l.verify(lo, Some(&self.pivot)));
        let right = self
            .right
            .as_ref()
            .map_or(true, |r| r.verify(Some(&self.pivot), hi));
        left && right
    }

    /// Visits every interval of the subtree.
    pub fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a Interval<K, V>)) {
        self.center.iter().for_each(&mut *f);
        if let Some(ref left) = self.left {
            left.for_each(f);
        }
        if let Some(ref right) = self.right {
            right.for_each(f);
        }
    }
}

pub(crate) fn height<K, V>(node: &Option<Box<Node<K, V>>>) -> u32 {
    node.as_ref().map_or(0, |succ| succ.height)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::Rng;

    type Node = super::Node<i64, u32>;

    fn iv(begin: i64, end: i64, data: u32) -> Interval<i64, u32> {
        Interval::new(begin, end, data).unwrap()
    }

    pub fn is_interval_tree<V: Ord + Clone>(root: &Option<Box<super::Node<i64, V>>>) -> bool {
        root.as_ref().map_or(true, |node| node.verify(None, None))
    }

    fn collect(root: &Option<Box<Node>>) -> BTreeSet<Interval<i64, u32>> {
        let mut all = BTreeSet::new();
        if let Some(ref node) = root {
            node.for_each(&mut |iv| {
                all.insert(iv.clone());
            });
        }
        all
    }

    fn insert(root: Option<Box<Node>>, interval: Interval<i64, u32>) -> Option<Box<Node>> {
        Some(Node::add_in_successor(root, interval))
    }

    #[test]
    fn simple_tree_operations() {
        let mut t = Some(Node::from_interval(iv(4, 7, 0)));
        t = insert(t, iv(1, 2, 1));
        t = insert(t, iv(5, 9, 2));
        assert!(is_interval_tree(&t));
        let root = t.as_ref().unwrap();
        assert_eq!(root.pivot, 4);
        assert_eq!(root.center.len(), 1);

        let mut hits = BTreeSet::new();
        root.search_point(&6, &mut hits);
        assert_eq!(hits, BTreeSet::from([&iv(4, 7, 0), &iv(5, 9, 2)]));
        assert!(root.contains_point(&1));
        assert!(!root.contains_point(&3));
        assert!(!root.contains_point(&9));
    }

    #[test]
    fn rotations_on_tree() {
        // Disjoint unit intervals inserted in order form a degenerate chain without
        // rebalancing.
        let mut t = None;
        for i in 0..255 {
            t = insert(t, iv(i, i + 1, 0));
            assert!(is_interval_tree(&t));
        }
        assert!(height(&t) <= 8);
        assert_eq!(collect(&t).len(), 255);
    }

    #[test]
    fn rotation_lifts_covering_intervals() {
        // The wide interval is stored at the root pivot 0. Adding intervals to the right
        // forces a left rotation, after which the wide interval covers the new pivot.
        let mut t = Some(Node::from_interval(iv(0, 100, 0)));
        t = insert(t, iv(10, 11, 1));
        t = insert(t, iv(20, 21, 2));
        assert!(is_interval_tree(&t));
        let root = t.as_ref().unwrap();
        assert_eq!(root.pivot, 10);
        assert!(root.center.contains(&iv(0, 100, 0)));
        assert!(root.left.is_none());
        assert_eq!(collect(&t).len(), 3);
    }

    #[test]
    fn rotation_can_empty_the_demoted_node() {
        // Nested intervals all covering the later pivots keep getting lifted, leaving
        // demoted nodes empty.
        let mut t = None;
        for i in 0..64 {
            t = insert(t, iv(i, 200 - i, i as u32));
            t = insert(t, iv(100 + i, 101 + i, 100 + i as u32));
            assert!(is_interval_tree(&t));
        }
        assert_eq!(collect(&t).len(), 128);
    }

    #[test]
    fn bulk_load_is_balanced() {
        let intervals: Vec<_> = (0..1000).map(|i| iv(i, i + (i % 17) + 1, 0)).collect();
        let t = Node::from_intervals(intervals.clone());
        assert!(is_interval_tree(&t));
        assert_eq!(collect(&t), intervals.into_iter().collect());
    }

    #[test]
    fn bulk_load_skips_null_and_duplicates() {
        let t = Node::from_intervals(vec![iv(3, 3, 0), iv(1, 4, 0), iv(1, 4, 0)]);
        assert_eq!(collect(&t), BTreeSet::from([iv(1, 4, 0)]));
        assert!(Node::from_intervals(vec![iv(3, 3, 0)]).is_none());
        assert!(Node::from_intervals(vec![]).is_none());
    }

    #[test]
    fn remove_leaf_and_inner_nodes() {
        let intervals: Vec<_> = (0..32).map(|i| iv(i * 10, i * 10 + 5, 0)).collect();
        let mut t = Node::from_intervals(intervals.clone());
        for (n, interval) in intervals.iter().enumerate() {
            t = t.and_then(|node| node.remove(interval));
            assert!(is_interval_tree(&t));
            assert_eq!(collect(&t).len(), intervals.len() - n - 1);
        }
        assert!(t.is_none());
    }

    #[test]
    fn removing_absent_interval_keeps_tree() {
        let t = Node::from_intervals(vec![iv(1, 5, 0), iv(6, 9, 0)]);
        let t = t.and_then(|node| node.remove(&iv(1, 5, 1)));
        let t = t.and_then(|node| node.remove(&iv(20, 25, 0)));
        assert_eq!(collect(&t), BTreeSet::from([iv(1, 5, 0), iv(6, 9, 0)]));
    }

    #[test]
    fn prune_moves_overlaps_into_heir() {
        //        10
        //      2    12
        //        5
        // [2, 8) is stored at pivot 2 but covers 5, the pivot promoted when 10 goes away.
        let mut t = Some(Node::from_interval(iv(10, 11, 0)));
        t = insert(t, iv(2, 8, 1));
        t = insert(t, iv(12, 13, 2));
        t = insert(t, iv(5, 6, 3));
        assert!(is_interval_tree(&t));

        t = t.and_then(|node| node.remove(&iv(10, 11, 0)));
        assert!(is_interval_tree(&t));
        let root = t.as_ref().unwrap();
        assert_eq!(root.pivot, 5);
        assert_eq!(root.center, BTreeSet::from([iv(2, 8, 1), iv(5, 6, 3)]));
        assert!(root.left.is_none());
        assert_eq!(root.right.as_ref().unwrap().pivot, 12);
    }

    #[test]
    fn search_range_prunes_branches() {
        let t = Node::from_intervals(vec![iv(1, 2, 0), iv(4, 7, 1), iv(5, 9, 2)]).unwrap();
        let mut hits = BTreeSet::new();
        t.search_range(&2, &4, false, &mut hits);
        assert!(hits.is_empty());
        t.search_range(&1, &5, false, &mut hits);
        assert_eq!(hits, BTreeSet::from([&iv(1, 2, 0), &iv(4, 7, 1)]));

        let mut enveloped = BTreeSet::new();
        t.search_range(&4, &9, true, &mut enveloped);
        assert_eq!(enveloped, BTreeSet::from([&iv(4, 7, 1), &iv(5, 9, 2)]));
    }

    #[test]
    fn display_structure() {
        let t = Node::from_intervals(vec![iv(1, 2, 0), iv(4, 7, 1)]).unwrap();
        let out = t.to_string();
        assert!(out.starts_with("Node<"));
        assert!(out.contains("Interval(1, 2, 0)"));
        assert!(out.contains("Interval(4, 7, 1)"));
    }

    fn random_interval(rng: &mut impl Rng) -> Interval<i64, u32> {
        let offset = rng.gen_range(0..100);
        let len = rng.gen_range(1..30);
        iv(offset, offset + len, rng.gen_range(0..3))
    }

    #[test]
    fn test_fuzz() {
        let mut rng = rand::thread_rng();
        let mut t: Option<Box<Node>> = None;
        let mut model = BTreeSet::new();
        for _ in 0..5000 {
            let interval = random_interval(&mut rng);
            if rng.gen::<bool>() {
                t = insert(t, interval.clone());
                model.insert(interval);
            } else {
                t = t.and_then(|node| node.remove(&interval));
                model.remove(&interval);
            }
            assert!(is_interval_tree(&t));
        }
        assert_eq!(collect(&t), model);
    }
}
