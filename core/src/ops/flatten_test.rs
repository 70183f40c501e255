use core::cell::Cell;
use core::ops::ControlFlow;

use pretty_assertions::assert_eq;

use crate::{
    Kind, Rc, Seq, Shape, Value,
    test_utils::{ints, keys, render, values},
};

/// `[[1, [2, 3]], 4]`
fn nested() -> Seq {
    let inner = Value::Seq(ints(&[2, 3]));
    let middle = Value::Seq(Seq::indexed([Value::Int(1), inner]));
    Seq::indexed([middle, Value::Int(4)])
}

#[test]
fn test_flatten_depth() {
    assert_eq!(render(&nested().flatten(None)), "[1, 2, 3, 4]");
    assert_eq!(render(&nested().flatten(Some(0))), "[1, 2, 3, 4]");
    assert_eq!(render(&nested().flatten(Some(1))), "[1, [2, 3], 4]");
    assert_eq!(keys(&nested().flatten(None)), values(&[0, 1, 2, 3]));
}

#[test]
fn test_flatten_pull_matches_push() {
    let flat = nested().flatten(None);
    let pulled: Vec<_> = flat
        .entries(false)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pulled, flat.to_entries().unwrap());

    let one_level: Vec<Value> = nested()
        .flatten(Some(1))
        .iterate_pull(Kind::Values, false)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(one_level.len(), 3);
    assert!(one_level[1].as_seq().is_some());
}

#[test]
fn test_flatten_early_stop_crosses_levels() {
    let visited = Rc::new(Cell::new(0));
    let counter = visited.clone();
    let tail = ints(&[5, 6]).map(move |value, _, _| {
        counter.set(counter.get() + 1);
        value.clone()
    });
    let source = Seq::indexed([Value::Seq(nested()), Value::Seq(tail)]);
    let flat = source.flatten(None);

    let mut seen = Vec::new();
    let pushed = flat
        .iterate(false, |value, _| {
            seen.push(value.clone());
            if value == Value::Int(2) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert_eq!(pushed, 2);
    assert_eq!(seen, values(&[1, 2]));
    assert_eq!(visited.get(), 0);
}

#[test]
fn test_flatten_keyed_keeps_inner_keys() {
    let source = Seq::keyed([
        ("x", Value::Seq(Seq::keyed([("a", 1), ("b", 2)]))),
        ("y", Value::Seq(Seq::keyed([("c", 3)]))),
    ]);
    let flat = source.flatten(Some(1));
    assert_eq!(render(&flat), r#"{"a": 1, "b": 2, "c": 3}"#);
    assert_eq!(render(&flat.reverse()), r#"{"c": 3, "b": 2, "a": 1}"#);
}

#[test]
fn test_flatten_reverse_unknown_size_realizes() {
    let flat = nested().flatten(None);
    assert_eq!(flat.size(), None);
    let backwards: Vec<_> = flat
        .entries(true)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        backwards,
        vec![
            (Value::Int(3), Value::Int(4)),
            (Value::Int(2), Value::Int(3)),
            (Value::Int(1), Value::Int(2)),
            (Value::Int(0), Value::Int(1)),
        ]
    );
    assert_eq!(flat.size(), Some(4));
}

#[test]
fn test_flatten_surfaces_nested_errors() {
    let broken = Seq::from_entries(&Seq::indexed([Value::Int(1)]));
    let source = Seq::indexed([Value::Int(0), Value::Seq(broken.to_indexed_seq())]);
    let flat = source.flatten(None);
    assert!(flat.to_vec().is_err());
    let mut entries = flat.entries(false).unwrap();
    assert!(entries.next().unwrap().is_ok());
    assert!(entries.next().unwrap().is_err());
}

#[test]
fn test_flatten_stops_at_deeply_nested_error() {
    let broken = Seq::from_entries(&Seq::indexed([Value::Int(1)])).to_indexed_seq();
    let source = Seq::indexed([
        Value::Seq(Seq::indexed([Value::Seq(broken)])),
        Value::Int(99),
        Value::Int(100),
    ]);
    let flat = source.flatten(None);

    let mut seen = Vec::new();
    let pushed = flat.iterate(false, |value, _| {
        seen.push(value);
        ControlFlow::Continue(())
    });
    assert!(pushed.is_err());
    assert!(seen.is_empty());

    let mut entries = flat.entries(false).unwrap();
    assert!(entries.next().unwrap().is_err());
    assert!(entries.next().is_none());
}

#[test]
fn test_flat_map_indexed() {
    let doubled = ints(&[1, 2]).flat_map(|value, _, _| {
        Value::Seq(Seq::indexed([value.clone(), value.clone()]))
    });
    assert_eq!(render(&doubled), "[1, 1, 2, 2]");
    assert_eq!(keys(&doubled), values(&[0, 1, 2, 3]));
}

#[test]
fn test_flat_map_bare_results_become_singletons() {
    let same = ints(&[1, 2]).flat_map(|value, _, _| value.clone());
    assert_eq!(render(&same), "[1, 2]");

    let keyed = Seq::keyed([("a", 1)]).flat_map(|value, _, _| value.clone());
    assert_eq!(render(&keyed), r#"{"a": 1}"#);
}

#[test]
fn test_flat_map_set_keys_values_by_themselves() {
    let expanded = Seq::set([1, 10]).flat_map(|value, _, _| {
        let i = value.as_int().unwrap_or_default();
        Value::Seq(ints(&[i, i + 1]))
    });
    assert_eq!(expanded.shape(), Shape::Set);
    assert_eq!(
        expanded.to_entries().unwrap(),
        vec![
            (Value::Int(1), Value::Int(1)),
            (Value::Int(2), Value::Int(2)),
            (Value::Int(10), Value::Int(10)),
            (Value::Int(11), Value::Int(11)),
        ]
    );
}
