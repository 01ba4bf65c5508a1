#![cfg(feature = "serde")]

use halfopen_interval_tree::{Interval, IntervalTree};

#[test]
fn serialize_interval() {
    let iv = Interval::new(1, 5, "a".to_string()).unwrap();
    let json = serde_json::to_string(&iv).unwrap();
    assert_eq!(json, r#"{"begin":1,"end":5,"data":"a"}"#);
    let back: Interval<i32, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, iv);
}

#[test]
fn serialize_tree_as_sorted_sequence() {
    let t = IntervalTree::from_tuples(vec![(4, 7, 2u8), (1, 2, 1)]).unwrap();
    let json = serde_json::to_string(&t).unwrap();
    assert_eq!(json, r#"[{"begin":1,"end":2,"data":1},{"begin":4,"end":7,"data":2}]"#);

    let back: IntervalTree<i32, u8> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.search_point(&5).len(), 1);
}

#[test]
fn reversed_interval_is_rejected() {
    let err = serde_json::from_str::<Interval<i32, u8>>(r#"{"begin":7,"end":4,"data":0}"#)
        .unwrap_err();
    assert!(err.to_string().contains("begin bound lower than or equal to its end bound"));

    let null: Interval<i32, u8> = serde_json::from_str(r#"{"begin":4,"end":4,"data":0}"#).unwrap();
    assert!(null.is_null());
}

#[test]
fn tree_with_reversed_interval_is_rejected() {
    let json = r#"[{"begin":7,"end":4,"data":0},{"begin":1,"end":10,"data":1}]"#;
    assert!(serde_json::from_str::<IntervalTree<i32, u8>>(json).is_err());

    let back: IntervalTree<i32, u8> =
        serde_json::from_str(r#"[{"begin":4,"end":7,"data":0},{"begin":1,"end":10,"data":1}]"#)
            .unwrap();
    assert!(back.verify());
    assert_eq!(back.search_point(&5).len(), 2);
}
