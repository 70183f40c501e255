use core::cmp::Ordering;
use core::ops::ControlFlow;

use crate::{
    Rc, Result, Vec,
    seq::{
        Entries, Entry, Iterable, Memo, Seq, Shape, Visitor, pull_entries, push_entries,
        wrap_index,
    },
    value::Value,
};

use super::{
    Comparator, Mapper,
    policy::{natural_order, reverse_natural_order, strict_equals},
};

/// One source element waiting to be sorted.
struct Row {
    key: Value,
    value: Value,
    sort_key: Value,
    index: usize,
}

/// The source ordered by `comparator`, optionally applied to mapped keys.
///
/// Stable: equal elements keep their source order. Sorting happens once, on
/// the first drive, and every later traversal reads the sorted buffer.
pub struct Sorted {
    source: Seq,
    comparator: Option<Comparator>,
    key_mapper: Option<Mapper>,
    memo: Memo,
}

impl Sorted {
    pub fn new(source: Seq, comparator: Option<Comparator>, key_mapper: Option<Mapper>) -> Self {
        Self {
            source,
            comparator,
            key_mapper,
            memo: Memo::new(),
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match &self.comparator {
            Some(comparator) => comparator(a, b),
            None => natural_order(a, b),
        }
    }

    fn sorted(&self) -> Result<Rc<[Entry]>> {
        self.memo.realize(|visitor| {
            let mut rows = Vec::with_capacity(self.source.size().unwrap_or(0));
            self.source.iterate(false, |value, key| {
                let sort_key = match &self.key_mapper {
                    Some(mapper) => mapper(&value, &key, &self.source),
                    None => value.clone(),
                };
                let index = rows.len();
                rows.push(Row {
                    key,
                    value,
                    sort_key,
                    index,
                });
                ControlFlow::Continue(())
            })?;
            rows.sort_unstable_by(|a, b| {
                self.compare(&a.sort_key, &b.sort_key)
                    .then(a.index.cmp(&b.index))
            });
            let shape = self.source.shape();
            let mut emitted: usize = 0;
            for row in rows {
                let key = match shape {
                    Shape::Keyed => row.key,
                    Shape::Indexed => Value::from(emitted),
                    Shape::Set => row.value.clone(),
                };
                emitted += 1;
                if visitor(row.value, key).is_break() {
                    break;
                }
            }
            Ok(emitted)
        })
    }
}

impl Iterable for Sorted {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.source.size().or_else(|| self.memo.len())
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        match (self.source.shape(), key) {
            (Shape::Indexed, Value::Int(index)) => {
                let entries = self.sorted()?;
                Ok(wrap_index(*index, entries.len())
                    .and_then(|position| entries.get(position))
                    .map(|(_, value)| value.clone()))
            }
            (Shape::Indexed, _) => Ok(None),
            _ => self.source.view().get(key),
        }
    }

    fn has(&self, key: &Value) -> Result<bool> {
        match self.source.shape() {
            Shape::Indexed => Ok(self.get(key)?.is_some()),
            _ => self.source.view().has(key),
        }
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        self.source.view().includes(value)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        Ok(push_entries(&self.sorted()?, visitor, reverse))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        Ok(pull_entries(self.sorted()?, reverse))
    }

    fn cache(&self) -> Result<bool> {
        self.sorted()?;
        Ok(true)
    }
}

/// Whether candidate `b` should replace the best-so-far `a`.
///
/// Ties go to `b` only when it is a different nullish or NaN value.
fn max_compare(comparator: &dyn Fn(&Value, &Value) -> Ordering, a: &Value, b: &Value) -> bool {
    match comparator(b, a) {
        Ordering::Greater => true,
        Ordering::Equal => !strict_equals(b, a) && (b.is_nullish() || b.is_nan()),
        Ordering::Less => false,
    }
}

fn extreme(
    source: &Seq,
    comparator: &dyn Fn(&Value, &Value) -> Ordering,
    mapper: Option<&Mapper>,
) -> Result<Option<Value>> {
    let mut best: Option<(Value, Value)> = None;
    source.iterate(false, |value, key| {
        let sort_key = match mapper {
            Some(mapper) => mapper(&value, &key, source),
            None => value.clone(),
        };
        let replace = match &best {
            None => true,
            Some((_, best_key)) => max_compare(comparator, best_key, &sort_key),
        };
        if replace {
            best = Some((value, sort_key));
        }
        ControlFlow::Continue(())
    })?;
    Ok(best.map(|(value, _)| value))
}

/// Greatest element by `comparator` (natural order by default).
pub(crate) fn max_by(
    source: &Seq,
    comparator: Option<Comparator>,
    mapper: Option<Mapper>,
) -> Result<Option<Value>> {
    match comparator {
        Some(comparator) => extreme(source, &*comparator, mapper.as_ref()),
        None => extreme(source, &natural_order, mapper.as_ref()),
    }
}

/// Least element: the maximum under the inverted comparator.
pub(crate) fn min_by(
    source: &Seq,
    comparator: Option<Comparator>,
    mapper: Option<Mapper>,
) -> Result<Option<Value>> {
    match comparator {
        Some(comparator) => extreme(
            source,
            &|a: &Value, b: &Value| comparator(a, b).reverse(),
            mapper.as_ref(),
        ),
        None => extreme(source, &reverse_natural_order, mapper.as_ref()),
    }
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;
