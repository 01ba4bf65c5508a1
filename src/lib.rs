//! Implementation of a mutable, self-balancing interval tree
//! ([`interval_tree::IntervalTree`]) over half-open intervals `[begin, end)`, each carrying
//! a piece of data. Intervals are dispatched to pivot-centered nodes of an AVL tree: a node
//! stores the intervals covering its pivot, and leaves those ending before it or beginning
//! after it to its subtrees. It provides methods for point queries ("which intervals
//! contain `p`?"), overlap queries and envelopment queries ("which intervals lie within
//! `[a, b)`?"), as well as helpers to remove, chop, slice, split and merge the stored
//! intervals.
//!
//! Any type satisfying [`Ord`], [`Clone`] and [`Hash`](std::hash::Hash) can be used as a
//! bound or as data. Operations measuring lengths additionally need bounds supporting
//! [`Sub`](std::ops::Sub).
//!
//! ```
//! use halfopen_interval_tree::IntervalTree;
//!
//! let mut t = IntervalTree::new();
//! t.addi(1, 2, "a").unwrap();
//! t.addi(4, 7, "b").unwrap();
//! t.addi(5, 9, "c").unwrap();
//!
//! assert_eq!(t.search_point(&6).len(), 2);
//! assert!(t.search_range(&2, &4, false).is_empty());
//! assert_eq!((t.begin(), t.end()), (Some(&1), Some(&9)));
//!
//! t.remove_overlap(&5);
//! t.remove_overlap(&1);
//! assert!(t.is_empty());
//! ```

mod boundary;
mod error;
mod interval;
/// An interval tree implemented with an augmented AVL tree.
pub mod interval_tree;
mod node;

pub use error::{IntervalTreeError, Result};
pub use interval::Interval;
pub use interval_tree::IntervalTree;
