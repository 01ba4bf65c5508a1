use crate::error::{IntervalTreeError, Result};
use std::cmp;
use std::fmt;
use std::ops::Sub;
#[cfg(feature="serde")]
use serde::{de, Deserialize, Deserializer, Serialize};

/// A half-open interval `[begin, end)` carrying a piece of data.
///
/// Intervals are ordered by `begin`, then `end`, then `data`, and two intervals are
/// equal only if all three fields are equal. Fields are read-only once built: an
/// interval stored in an [`IntervalTree`](crate::IntervalTree) must keep its bounds.
///
/// An interval with `begin == end` is called *null*. It is valid, but never overlaps
/// anything, not even a point equal to its bounds.
#[cfg_attr(feature="serde", derive(Serialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<K, V> {
    begin: K,
    end: K,
    data: V,
}

impl<K: Ord, V> Interval<K, V> {
    /// Creates the interval `[begin, end)` holding `data`.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::{Interval, IntervalTreeError};
    ///
    /// let iv = Interval::new(4, 7, "b").unwrap();
    /// assert_eq!((iv.begin(), iv.end(), iv.data()), (&4, &7, &"b"));
    /// assert!(Interval::new(4, 4, "null").unwrap().is_null());
    /// assert_eq!(Interval::new(7, 4, "b"), Err(IntervalTreeError::InvalidInterval));
    /// ```
    pub fn new(begin: K, end: K, data: V) -> Result<Self> {
        if begin > end {
            return Err(IntervalTreeError::InvalidInterval);
        }
        Ok(Interval { begin, end, data })
    }

    /// Whether `begin == end`.
    pub fn is_null(&self) -> bool {
        self.begin == self.end
    }

    /// Whether `begin <= point < end`.
    pub fn contains_point(&self, point: &K) -> bool {
        self.begin <= *point && *point < self.end
    }

    /// Alias of [`contains_point`](Self::contains_point).
    pub fn overlaps_point(&self, point: &K) -> bool {
        self.contains_point(point)
    }

    /// Whether this interval shares at least one point with `[begin, end)`.
    /// Always false when either range is empty.
    pub fn overlaps_range(&self, begin: &K, end: &K) -> bool {
        begin < end && self.begin < self.end && self.begin < *end && *begin < self.end
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_range(&other.begin, &other.end)
    }

    /// Whether both intervals have the same bounds, regardless of their data.
    pub fn range_matches(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Whether this interval lies entirely within `[begin, end)`.
    pub(crate) fn enveloped_by(&self, begin: &K, end: &K) -> bool {
        *begin <= self.begin && self.end <= *end
    }
}

impl<K, V> Interval<K, V> {
    /// Builds an interval whose bounds are already known to be ordered.
    pub(crate) fn new_unchecked(begin: K, end: K, data: V) -> Self {
        Interval { begin, end, data }
    }

    pub fn begin(&self) -> &K {
        &self.begin
    }

    pub fn end(&self) -> &K {
        &self.end
    }

    pub fn data(&self) -> &V {
        &self.data
    }

    /// Consumes the interval and returns `(begin, end, data)`.
    pub fn into_parts(self) -> (K, K, V) {
        (self.begin, self.end, self.data)
    }

    /// Returns an interval with the same bounds and a different piece of data.
    pub fn with_data<W>(&self, data: W) -> Interval<K, W>
    where
        K: Clone,
    {
        Interval {
            begin: self.begin.clone(),
            end: self.end.clone(),
            data,
        }
    }
}

/// Operations needing arithmetic on the bounds. They are only available when the bound
/// type can be subtracted.
impl<K, V> Interval<K, V>
where
    K: Ord + Clone + Sub<Output = K>,
{
    /// `end - begin`.
    pub fn length(&self) -> K {
        self.end.clone() - self.begin.clone()
    }

    /// Size of the overlap between this interval and `[begin, end)`, or `K::default()`
    /// if they don't overlap.
    ///
    /// # Examples
    /// ```
    /// use halfopen_interval_tree::Interval;
    ///
    /// let iv = Interval::new(4, 10, ()).unwrap();
    /// assert_eq!(iv.overlap_size(&8, &20), 2);
    /// assert_eq!(iv.overlap_size(&10, &20), 0);
    /// ```
    pub fn overlap_size(&self, begin: &K, end: &K) -> K
    where
        K: Default,
    {
        if !self.overlaps_range(begin, end) {
            return K::default();
        }
        let lo = cmp::max(&self.begin, begin).clone();
        let hi = cmp::min(&self.end, end).clone();
        hi - lo
    }

    /// Size of the gap between both intervals, or `K::default()` if there is none.
    pub fn distance_to(&self, other: &Self) -> K
    where
        K: Default,
    {
        if self.end <= other.begin {
            other.begin.clone() - self.end.clone()
        } else if other.end <= self.begin {
            self.begin.clone() - other.end.clone()
        } else {
            K::default()
        }
    }
}

/// Same fields as [`Interval`], read before the bounds are checked.
#[cfg(feature="serde")]
#[derive(Deserialize)]
#[serde(rename = "Interval")]
struct RawInterval<K, V> {
    begin: K,
    end: K,
    data: V,
}

#[cfg(feature="serde")]
impl<'de, K, V> Deserialize<'de> for Interval<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let RawInterval { begin, end, data } = RawInterval::deserialize(deserializer)?;
        Interval::new(begin, end, data).map_err(de::Error::custom)
    }
}

impl<K, V> fmt::Display for Interval<K, V>
where
    K: fmt::Display,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Interval({}, {}, {:?})", self.begin, self.end, self.data)
    }
}
