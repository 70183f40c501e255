use pretty_assertions::assert_eq;

use crate::{
    Seq, Shape, Value,
    test_utils::{ints, render},
};

#[test]
fn test_flip_swaps_entries() {
    let flipped = Seq::keyed([("a", 1), ("b", 2)]).flip();
    assert_eq!(flipped.shape(), Shape::Keyed);
    assert_eq!(render(&flipped), r#"{1: "a", 2: "b"}"#);
}

#[test]
fn test_flip_swaps_has_and_includes() {
    let flipped = Seq::keyed([("a", 1)]).flip();
    assert!(flipped.has(1).unwrap());
    assert!(!flipped.has("a").unwrap());
    assert!(flipped.includes("a").unwrap());
    assert_eq!(flipped.get(1).unwrap(), Some(Value::str("a")));
}

#[test]
fn test_flip_twice_is_source() {
    let source = Seq::keyed([("a", 1)]);
    assert!(source.flip().flip().ptr_eq(&source));
}

#[test]
fn test_flip_of_reversed_flip_is_reverse() {
    let source = Seq::keyed([("a", 1), ("b", 2)]);
    let unflipped = source.flip().reverse().flip();
    assert_eq!(render(&unflipped), r#"{"b": 2, "a": 1}"#);
    // reverse(s) again, not a flip wrapped around a reverse of a flip.
    assert!(unflipped.reverse().ptr_eq(&source));
}

#[test]
fn test_flip_indexed_reverse_pulls_backwards() {
    let flipped = ints(&[10, 20]).flip();
    let entries: Vec<_> = flipped
        .entries(true)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        entries,
        vec![
            (Value::Int(20), Value::Int(1)),
            (Value::Int(10), Value::Int(0)),
        ]
    );
}
