//! Eager aggregations. Each drives its source once and freezes the result.

use core::ops::ControlFlow;

use crate::{
    Result, Vec,
    collections::{MapBuilder, from_bucket},
    seq::{Entry, Seq},
    value::Value,
};

/// Keyed seq from every `grouper` result to the number of elements that
/// produced it.
pub(crate) fn count_by(
    source: &Seq,
    grouper: impl Fn(&Value, &Value, &Seq) -> Value,
) -> Result<Seq> {
    let mut counts: MapBuilder<usize> = MapBuilder::new(source.is_ordered());
    source.iterate(false, |value, key| {
        let group = grouper(&value, &key, source);
        counts.update(group, 0, |count| count + 1);
        ControlFlow::Continue(())
    })?;
    tracing::debug!(groups = counts.len(), "counted groups");
    Ok(Seq::new(counts.map_values(Value::from).freeze()))
}

/// Keyed seq from every `grouper` result to the elements that produced it,
/// in encounter order and in the source's shape.
pub(crate) fn group_by(
    source: &Seq,
    grouper: impl Fn(&Value, &Value, &Seq) -> Value,
) -> Result<Seq> {
    let mut groups: MapBuilder<Vec<Entry>> = MapBuilder::new(source.is_ordered());
    source.iterate(false, |value, key| {
        let group = grouper(&value, &key, source);
        groups
            .entry_or_insert_with(group, Vec::new)
            .push((key, value));
        ControlFlow::Continue(())
    })?;
    tracing::debug!(groups = groups.len(), "grouped elements");
    let shape = source.shape();
    Ok(Seq::new(
        groups
            .map_values(|bucket| Value::Seq(from_bucket(shape, bucket)))
            .freeze(),
    ))
}

/// Split the source into the elements failing and passing `predicate`, each
/// in the source's shape.
pub(crate) fn partition(
    source: &Seq,
    predicate: impl Fn(&Value, &Value, &Seq) -> bool,
) -> Result<(Seq, Seq)> {
    let mut rejected = Vec::new();
    let mut accepted = Vec::new();
    source.iterate(false, |value, key| {
        if predicate(&value, &key, source) {
            accepted.push((key, value));
        } else {
            rejected.push((key, value));
        }
        ControlFlow::Continue(())
    })?;
    tracing::debug!(
        rejected = rejected.len(),
        accepted = accepted.len(),
        "partitioned elements"
    );
    let shape = source.shape();
    Ok((from_bucket(shape, rejected), from_bucket(shape, accepted)))
}

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;
