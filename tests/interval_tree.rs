use halfopen_interval_tree::{Interval, IntervalTree, IntervalTreeError};

fn iv(begin: i64, end: i64, data: &'static str) -> Interval<i64, &'static str> {
    Interval::new(begin, end, data).unwrap()
}

#[test]
fn three_intervals_scenario() {
    let mut t = IntervalTree::from_tuples(vec![(1, 2, "a"), (4, 7, "b"), (5, 9, "c")]).unwrap();

    assert_eq!(t.search_point(&6).into_iter().collect::<Vec<_>>(), vec![&iv(4, 7, "b"), &iv(5, 9, "c")]);
    assert!(t.search_range(&2, &4, false).is_empty());
    assert_eq!(
        t.search_range(&1, &5, false).into_iter().collect::<Vec<_>>(),
        vec![&iv(1, 2, "a"), &iv(4, 7, "b")]
    );
    assert_eq!(t.begin(), Some(&1));
    assert_eq!(t.end(), Some(&9));

    let mut removed = t.remove_overlap(&5);
    removed.sort();
    assert_eq!(removed, vec![iv(4, 7, "b"), iv(5, 9, "c")]);
    assert_eq!(t.sorted(), vec![&iv(1, 2, "a")]);
    assert_eq!(t.end(), Some(&2));
}

#[test]
fn invalid_intervals_are_rejected() {
    let mut t = IntervalTree::<i64, ()>::new();
    assert_eq!(t.addi(5, 4, ()), Err(IntervalTreeError::InvalidInterval));
    assert!(t.is_empty());
    assert!(!t.containsi(5, 4, ()));
    assert!(!t.discardi(5, 4, ()));
}

#[test]
fn sorted_ascending_inserts_stay_queryable() {
    let mut t = IntervalTree::new();
    for i in 0..2000i64 {
        t.addi(i, i + 3, ()).unwrap();
    }
    assert_eq!(t.search_point(&1000).len(), 3);
    for i in (0..2000i64).step_by(2) {
        t.removei(i, i + 3, ()).unwrap();
    }
    assert_eq!(t.len(), 1000);
    assert_eq!(t.search_point(&1000).len(), 1);
    assert_eq!(t.begin(), Some(&1));
    assert_eq!(t.end(), Some(&2002));
}

#[test]
fn nested_intervals() {
    let t: IntervalTree<i64, usize> = (0..100).map(|i| Interval::new(i, 200 - i, i as usize).unwrap()).collect();
    assert_eq!(t.search_point(&100).len(), 100);
    assert_eq!(t.search_point(&0).len(), 1);
    assert_eq!(t.envelop(&50, &150).len(), 50);
    assert_eq!(t.span(), Some(200));
}

#[test]
fn extend_and_equality() {
    let mut a = IntervalTree::new();
    a.extend(vec![iv(1, 2, "a"), iv(3, 4, "b")]);
    let b = IntervalTree::from_intervals(vec![iv(3, 4, "b"), iv(1, 2, "a")]);
    assert_eq!(a, b);
    assert_eq!(format!("{:?}", a), format!("{:?}", b));
}

#[test]
fn chop_splits_covering_interval() {
    let mut t = IntervalTree::from_tuples(vec![(0, 10, "x")]).unwrap();
    t.chop(&4, &6);
    assert_eq!(t.sorted(), vec![&iv(0, 4, "x"), &iv(6, 10, "x")]);
    assert!(!t.overlaps_range(&4, &6));
}
