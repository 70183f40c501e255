use core::cell::Cell;
use core::ops::ControlFlow;

use pretty_assertions::assert_eq;

use crate::{
    Kind, Rc, Seq, Value,
    test_utils::{init_test_logging, ints, keys, render, values},
};

fn zero_to_five() -> Seq {
    ints(&[0, 1, 2, 3, 4, 5])
}

/// Indexed seq of unknown size with the same elements as `values`.
fn unsized_ints(elements: &[i64]) -> Seq {
    ints(elements).filter(|_, _, _| true)
}

#[test]
fn test_slice_bounds() {
    let seq = zero_to_five();
    assert_eq!(render(&seq.slice(1, Some(4))), "[1, 2, 3]");
    assert_eq!(render(&seq.slice(-2, None)), "[4, 5]");
    assert_eq!(render(&seq.slice(1, Some(-1))), "[1, 2, 3, 4]");
    assert_eq!(render(&seq.slice(4, Some(2))), "[]");
    assert_eq!(seq.slice(1, Some(4)).size(), Some(3));
    assert_eq!(keys(&seq.slice(2, None)), values(&[0, 1, 2, 3]));
}

#[test]
fn test_whole_slice_returns_source() {
    let seq = zero_to_five();
    assert!(seq.slice(0, None).ptr_eq(&seq));
    assert!(seq.slice(-10, Some(6)).ptr_eq(&seq));
    assert!(!seq.slice(0, Some(5)).ptr_eq(&seq));
}

#[test]
fn test_slice_stops_pulling_once_full() {
    let pulled = Rc::new(Cell::new(0));
    let counter = pulled.clone();
    let source = zero_to_five().map(move |value, _, _| {
        counter.set(counter.get() + 1);
        value.clone()
    });
    let taken = source.slice(1, Some(3));
    assert_eq!(taken.to_vec().unwrap(), values(&[1, 2]));
    // Elements past the end of the window are never mapped.
    assert_eq!(pulled.get(), 3);
}

#[test]
fn test_slice_keyed_keeps_keys() {
    let seq = Seq::keyed([("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(render(&seq.slice(1, None)), r#"{"b": 2, "c": 3}"#);
}

#[test]
fn test_slice_reverse_known_size() {
    let sliced = zero_to_five().slice(1, Some(4));
    let entries: Vec<_> = sliced
        .entries(true)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        entries,
        vec![
            (Value::Int(2), Value::Int(3)),
            (Value::Int(1), Value::Int(2)),
            (Value::Int(0), Value::Int(1)),
        ]
    );

    let mut seen = Vec::new();
    sliced
        .iterate(true, |value, _| {
            seen.push(value);
            ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(seen, values(&[3, 2, 1]));
}

#[test]
fn test_slice_negative_bound_over_unknown_size() {
    init_test_logging();
    let source = unsized_ints(&[0, 1, 2, 3, 4, 5]);
    let tail = source.slice(-2, None);
    assert_eq!(tail.size(), None);
    assert_eq!(tail.to_vec().unwrap(), values(&[4, 5]));
    assert_eq!(tail.size(), Some(2));

    let middle = unsized_ints(&[0, 1, 2, 3, 4, 5]).slice(1, Some(-1));
    assert_eq!(middle.to_vec().unwrap(), values(&[1, 2, 3, 4]));
}

#[test]
fn test_slice_window_resolves_up_front_when_possible() {
    // Known size: the window is fixed at construction.
    let known = zero_to_five().slice(-3, Some(-1));
    assert_eq!(known.size(), Some(2));
    assert_eq!(known.to_vec().unwrap(), values(&[3, 4]));

    // Positive bounds need no size; the window length is known but the
    // source may still run out first.
    let short = unsized_ints(&[0, 1]).slice(1, Some(5));
    assert_eq!(short.size(), None);
    assert_eq!(short.to_vec().unwrap(), values(&[1]));
}

#[test]
fn test_slice_positive_bounds_over_unknown_size_stay_lazy() {
    let sliced = unsized_ints(&[0, 1, 2, 3]).slice(1, Some(3));
    assert_eq!(sliced.size(), None);
    let pulled: Vec<Value> = sliced
        .iterate_pull(Kind::Values, false)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pulled, values(&[1, 2]));
    assert_eq!(render(&sliced.reverse()), "[2, 1]");
}

#[test]
fn test_slice_get() {
    let sliced = zero_to_five().slice(2, Some(5));
    assert_eq!(sliced.get(0).unwrap(), Some(Value::Int(2)));
    assert_eq!(sliced.get(-1).unwrap(), Some(Value::Int(4)));
    assert_eq!(sliced.get(3).unwrap(), None);
}

#[test]
fn test_slice_sugar() {
    let seq = zero_to_five();
    assert_eq!(seq.skip(4).to_vec().unwrap(), values(&[4, 5]));
    assert_eq!(seq.take(2).to_vec().unwrap(), values(&[0, 1]));
    assert_eq!(seq.skip_last(4).to_vec().unwrap(), values(&[0, 1]));
    assert!(seq.skip_last(0).ptr_eq(&seq));
    assert_eq!(seq.take_last(2).to_vec().unwrap(), values(&[4, 5]));
    assert_eq!(seq.take_last(0).to_vec().unwrap(), values(&[]));
    assert_eq!(seq.rest().to_vec().unwrap(), values(&[1, 2, 3, 4, 5]));
    assert_eq!(seq.but_last().to_vec().unwrap(), values(&[0, 1, 2, 3, 4]));
}
