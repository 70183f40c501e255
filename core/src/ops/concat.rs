use crate::{
    Vec,
    collections::List,
    seq::{Seq, Shape},
    value::Value,
};

use super::flatten::Flattened;

/// Bring one concatenation argument into the primary's shape family.
fn normalize(shape: Shape, value: Value) -> Seq {
    match (shape, value) {
        (Shape::Keyed, Value::Seq(seq)) => seq.to_keyed_seq(),
        (Shape::Set, Value::Seq(seq)) => seq.to_set_seq(),
        (Shape::Indexed, Value::Seq(seq)) => seq,
        (Shape::Keyed, bare) => Seq::keyed([(bare.clone(), bare)]),
        (Shape::Set, bare) => Seq::set([bare]),
        (Shape::Indexed, bare) => Seq::new(List::new(crate::vec![bare])),
    }
}

/// `primary` followed by every one of `values`, in the primary's shape.
pub(crate) fn concat(primary: &Seq, values: impl IntoIterator<Item = Value>) -> Seq {
    let shape = primary.shape();
    let mut parts: Vec<Seq> = core::iter::once(primary.clone())
        .chain(values.into_iter().map(|value| normalize(shape, value)))
        .filter(|part| part.size() != Some(0))
        .collect();
    match parts.len() {
        0 => return primary.clone(),
        1 => return parts.remove(0),
        _ => {}
    }
    let size = parts
        .iter()
        .try_fold(0usize, |total, part| Some(total + part.size()?));
    let outer = Seq::indexed(parts.into_iter().map(Value::Seq));
    let outer = match shape {
        Shape::Keyed => outer.to_keyed_seq(),
        Shape::Set => outer.to_set_seq(),
        Shape::Indexed => outer,
    };
    Seq::new(Flattened::new(outer, Some(1), shape.keeps_keys(), size))
}

#[cfg(test)]
#[path = "concat_test.rs"]
mod concat_test;
