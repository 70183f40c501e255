//! Rules shared across combinators: renumbering, bound resolution, default
//! orderings and shape coercion.

use core::cmp::Ordering;

use crate::{
    collections::List,
    seq::{Seq, Shape},
    value::Value,
};

/// Key for the `i`-th emitted element of a renumbering view: `i` going
/// forward, `size - 1 - i` going backward over a view of known size.
pub(crate) fn emitted_index(reverse: bool, size: Option<usize>, i: usize) -> Value {
    match (reverse, size) {
        (true, Some(size)) => Value::from(size.saturating_sub(i + 1)),
        _ => Value::from(i),
    }
}

/// Whether flatten keeps descending at nesting `level`. No limit means all
/// the way down.
pub(crate) fn descends(depth: Option<usize>, level: usize) -> bool {
    depth.is_none_or(|depth| level < depth)
}

/// `depth` of zero is the "no limit" marker.
pub(crate) fn normalize_depth(depth: Option<usize>) -> Option<usize> {
    depth.filter(|depth| *depth != 0)
}

/// Whether `begin..end` covers every element of a view of `size`.
pub(crate) fn whole_slice(begin: i64, end: Option<i64>, size: Option<usize>) -> bool {
    let from_front = begin == 0 || size.is_some_and(|size| begin <= -(size as i64));
    let to_back = match end {
        None => true,
        Some(end) => size.is_some_and(|size| end >= size as i64),
    };
    from_front && to_back
}

/// Resolve a slice bound. Negative bounds count from the end and need a
/// known size; without one they stay unresolved.
fn resolve_index(index: i64, size: Option<usize>) -> Option<usize> {
    if index < 0 {
        size.map(|size| (size as i64 + index).max(0) as usize)
    } else {
        let index = index as usize;
        Some(size.map_or(index, |size| size.min(index)))
    }
}

pub(crate) fn resolve_begin(begin: i64, size: Option<usize>) -> usize {
    resolve_index(begin, size).unwrap_or(0)
}

/// `None` means "runs to the end of a source of unknown length".
pub(crate) fn resolve_end(end: Option<i64>, size: Option<usize>) -> Option<usize> {
    match end {
        None => size,
        Some(end) => resolve_index(end, size),
    }
}

/// Ordering of values that have one: numbers with numbers, strings with
/// strings, booleans with booleans.
pub(crate) fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

/// Default comparator for `sort` and `max`: `undefined` after everything,
/// otherwise natural ordering, and incomparable values tie.
pub fn natural_order(a: &Value, b: &Value) -> Ordering {
    match (a.is_undefined(), b.is_undefined()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => loose_cmp(a, b).unwrap_or(Ordering::Equal),
    }
}

/// Default comparator for `min`: natural ordering flipped, without the
/// special place for `undefined`.
pub fn reverse_natural_order(a: &Value, b: &Value) -> Ordering {
    loose_cmp(b, a).unwrap_or(Ordering::Equal)
}

/// Identity-style equality: like `==` on values except that `NaN` is never
/// equal to anything, itself included.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    !a.is_nan() && a == b
}

/// Coerce a mapper result into a view of `shape`: views are converted to
/// the shape, bare values become one-element views. A bare value in a keyed
/// context is filed under `key`.
pub(crate) fn coerce(shape: Shape, value: Value, key: &Value) -> Seq {
    match (shape, value) {
        (Shape::Keyed, Value::Seq(seq)) => seq.to_keyed_seq(),
        (Shape::Indexed, Value::Seq(seq)) => seq.to_indexed_seq(),
        (Shape::Set, Value::Seq(seq)) => seq.to_set_seq(),
        (Shape::Keyed, bare) => Seq::keyed([(key.clone(), bare)]),
        (Shape::Indexed, bare) => Seq::new(List::new(crate::vec![bare])),
        (Shape::Set, bare) => Seq::set([bare]),
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;
