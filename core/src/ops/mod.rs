//! Combinators and consumers on [`Seq`].
//!
//! Every combinator is O(1) at call time: it wraps its source in a new view
//! and returns. Nothing is read from the source until the result is driven,
//! either by push iteration, pull iteration or one of the eager consumers at
//! the bottom of this module (`count`, `fold`, `to_vec`, ...), which return
//! [`Result`] since driving may fail.

mod adapt;
mod concat;
mod filter;
mod flatten;
mod flip;
mod group;
mod interpose;
mod map;
mod policy;
mod reverse;
mod slice;
mod sort;
mod take_while;
mod zip;

pub use adapt::{FromEntries, ToIndexed, ToKeyed, ToSet};
pub use filter::Filtered;
pub use flatten::Flattened;
pub use flip::Flipped;
pub use interpose::Interposed;
pub use map::Mapped;
pub use policy::{natural_order, reverse_natural_order, strict_equals};
pub use reverse::Reversed;
pub use slice::Sliced;
pub use sort::Sorted;
pub use take_while::{SkipWhile, TakeWhile};
pub use zip::Zipped;

use core::cmp::Ordering;
use core::ops::ControlFlow;

use crate::{
    Rc, Result, Vec,
    collections::List,
    seq::{Entry, Realized, Seq, Shape, collect_entries, count},
    value::Value,
};

/// `(value, key, source) -> value` callback.
pub type Mapper = Rc<dyn Fn(&Value, &Value, &Seq) -> Value>;

/// `(value, key, source) -> bool` callback.
pub type Predicate = Rc<dyn Fn(&Value, &Value, &Seq) -> bool>;

pub type Comparator = Rc<dyn Fn(&Value, &Value) -> Ordering>;

/// Combines one value from each zipped source.
pub type Zipper = Rc<dyn Fn(&[Value]) -> Value>;

/// Slice bound for an element count.
fn bound(amount: usize) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

fn negate(
    predicate: impl Fn(&Value, &Value, &Seq) -> bool,
) -> impl Fn(&Value, &Value, &Seq) -> bool {
    move |value: &Value, key: &Value, source: &Seq| !predicate(value, key, source)
}

// Shape conversions.
impl Seq {
    /// Keyed view over `entries`, a seq of `[key, value]` pairs.
    pub fn from_entries(entries: &Seq) -> Seq {
        Seq::new(FromEntries::new(entries.clone()))
    }

    pub fn to_keyed_seq(&self) -> Seq {
        match self.shape() {
            Shape::Keyed => self.clone(),
            Shape::Indexed => Seq::new(ToKeyed::new(self.clone(), false)),
            Shape::Set => Seq::new(ToKeyed::new(self.clone(), true)),
        }
    }

    pub fn to_indexed_seq(&self) -> Seq {
        match self.shape() {
            Shape::Indexed => self.clone(),
            _ => Seq::new(ToIndexed::new(self.clone())),
        }
    }

    pub fn to_set_seq(&self) -> Seq {
        match self.shape() {
            Shape::Set => self.clone(),
            _ => Seq::new(ToSet::new(self.clone())),
        }
    }

    /// Keys as an indexed seq.
    pub fn key_seq(&self) -> Seq {
        self.map(|_, key, _| key.clone()).to_indexed_seq()
    }

    /// Values as an indexed seq.
    pub fn value_seq(&self) -> Seq {
        if let Some(values) = self.view().value_seq() {
            return values;
        }
        self.to_indexed_seq()
    }
}

// Structural combinators.
impl Seq {
    /// Swap keys and values.
    pub fn flip(&self) -> Seq {
        self.view()
            .flipped()
            .unwrap_or_else(|| Seq::new(Flipped::new(self.clone())))
    }

    pub fn map(&self, mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static) -> Seq {
        Seq::new(Mapped::new(self.clone(), Rc::new(mapper)))
    }

    /// Replace keys with `mapper(key, value, source)`.
    pub fn map_keys(&self, mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static) -> Seq {
        let source = self.clone();
        self.flip()
            .map(move |key, value, _| mapper(key, value, &source))
            .flip()
    }

    pub fn reverse(&self) -> Seq {
        self.view()
            .reversed()
            .unwrap_or_else(|| {
                Seq::new(Reversed::new(self.clone(), self.shape().keeps_keys()))
            })
    }

    pub fn filter(&self, predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static) -> Seq {
        Seq::new(Filtered::new(
            self.clone(),
            Rc::new(predicate),
            self.shape().keeps_keys(),
        ))
    }

    pub fn filter_not(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static,
    ) -> Seq {
        self.filter(negate(predicate))
    }

    /// Elements `begin..end`. Negative bounds count from the end; `None` runs
    /// to the end.
    pub fn slice(&self, begin: i64, end: Option<i64>) -> Seq {
        slice::slice(self, begin, end, self.shape().keeps_keys())
    }

    pub fn skip(&self, amount: usize) -> Seq {
        self.slice(bound(amount), None)
    }

    pub fn take(&self, amount: usize) -> Seq {
        self.slice(0, Some(bound(amount)))
    }

    pub fn skip_last(&self, amount: usize) -> Seq {
        if amount == 0 {
            return self.clone();
        }
        self.slice(0, Some(-bound(amount)))
    }

    pub fn take_last(&self, amount: usize) -> Seq {
        if amount == 0 {
            return self.take(0);
        }
        self.slice(-bound(amount), None)
    }

    pub fn rest(&self) -> Seq {
        self.slice(1, None)
    }

    pub fn but_last(&self) -> Seq {
        self.slice(0, Some(-1))
    }

    pub fn take_while(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static,
    ) -> Seq {
        Seq::new(TakeWhile::new(self.clone(), Rc::new(predicate)))
    }

    pub fn take_until(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static,
    ) -> Seq {
        self.take_while(negate(predicate))
    }

    pub fn skip_while(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static,
    ) -> Seq {
        Seq::new(SkipWhile::new(
            self.clone(),
            Rc::new(predicate),
            self.shape().keeps_keys(),
        ))
    }

    pub fn skip_until(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool + 'static,
    ) -> Seq {
        self.skip_while(negate(predicate))
    }

    /// This seq followed by `values`. Seqs are converted to this seq's shape;
    /// anything else is appended as a single element.
    pub fn concat<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Seq {
        concat::concat(self, values.into_iter().map(Into::into))
    }

    /// Splice nested seqs in, `depth` levels down; `None` or `Some(0)`
    /// flattens all the way.
    pub fn flatten(&self, depth: Option<usize>) -> Seq {
        Seq::new(Flattened::new(
            self.clone(),
            depth,
            self.shape().keeps_keys(),
            None,
        ))
    }

    pub fn flat_map(&self, mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static) -> Seq {
        flatten::flat_map(self, Rc::new(mapper))
    }

    /// Indexed seq of the values with `separator` between each pair.
    pub fn interpose(&self, separator: impl Into<Value>) -> Seq {
        Seq::new(Interposed::new(self.clone(), separator.into()))
    }

    /// Stable sort in natural order, `undefined` last.
    pub fn sort(&self) -> Seq {
        Seq::new(Sorted::new(self.clone(), None, None))
    }

    pub fn sort_with(&self, comparator: impl Fn(&Value, &Value) -> Ordering + 'static) -> Seq {
        Seq::new(Sorted::new(self.clone(), Some(Rc::new(comparator)), None))
    }

    /// Stable sort on `key_mapper(value, key, source)` in natural order.
    pub fn sort_by(
        &self,
        key_mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static,
    ) -> Seq {
        Seq::new(Sorted::new(self.clone(), None, Some(Rc::new(key_mapper))))
    }

    pub fn sort_by_with(
        &self,
        key_mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static,
        comparator: impl Fn(&Value, &Value) -> Ordering + 'static,
    ) -> Seq {
        Seq::new(Sorted::new(
            self.clone(),
            Some(Rc::new(comparator)),
            Some(Rc::new(key_mapper)),
        ))
    }

    /// Indexed seq of `[a, b, ...]` tuples, as long as the shortest input.
    pub fn zip(&self, others: impl IntoIterator<Item = Seq>) -> Seq {
        self.zip_with(|values| Value::Seq(Seq::new(List::new(values.to_vec()))), others)
    }

    /// Like [`Seq::zip`], but as long as the longest input, padding with
    /// `undefined`.
    pub fn zip_all(&self, others: impl IntoIterator<Item = Seq>) -> Seq {
        let sources = core::iter::once(self.clone()).chain(others).collect();
        Seq::new(Zipped::new(
            sources,
            Rc::new(|values: &[Value]| Value::Seq(Seq::new(List::new(values.to_vec())))),
            true,
        ))
    }

    pub fn zip_with(
        &self,
        zipper: impl Fn(&[Value]) -> Value + 'static,
        others: impl IntoIterator<Item = Seq>,
    ) -> Seq {
        let sources = core::iter::once(self.clone()).chain(others).collect();
        Seq::new(Zipped::new(sources, Rc::new(zipper), false))
    }

    /// Realize this seq, returning a handle whose size is known. Seqs that
    /// keep a memo cache themselves; others are copied into a snapshot.
    pub fn cache_result(&self) -> Result<Seq> {
        if self.size().is_some() || (self.view().cache()? && self.size().is_some()) {
            return Ok(self.clone());
        }
        Ok(Seq::new(Realized::capture(self)?))
    }
}

// Aggregations and consumers.
impl Seq {
    pub fn count_by(&self, grouper: impl Fn(&Value, &Value, &Seq) -> Value) -> Result<Seq> {
        group::count_by(self, grouper)
    }

    pub fn group_by(&self, grouper: impl Fn(&Value, &Value, &Seq) -> Value) -> Result<Seq> {
        group::group_by(self, grouper)
    }

    /// `(rejected, accepted)` by `predicate`.
    pub fn partition(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool,
    ) -> Result<(Seq, Seq)> {
        group::partition(self, predicate)
    }

    pub fn max(&self) -> Result<Option<Value>> {
        sort::max_by(self, None, None)
    }

    pub fn max_with(
        &self,
        comparator: impl Fn(&Value, &Value) -> Ordering + 'static,
    ) -> Result<Option<Value>> {
        sort::max_by(self, Some(Rc::new(comparator)), None)
    }

    /// Element with the greatest `mapper(value, key, source)`.
    pub fn max_by(
        &self,
        mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static,
    ) -> Result<Option<Value>> {
        sort::max_by(self, None, Some(Rc::new(mapper)))
    }

    pub fn min(&self) -> Result<Option<Value>> {
        sort::min_by(self, None, None)
    }

    pub fn min_with(
        &self,
        comparator: impl Fn(&Value, &Value) -> Ordering + 'static,
    ) -> Result<Option<Value>> {
        sort::min_by(self, Some(Rc::new(comparator)), None)
    }

    /// Element with the least `mapper(value, key, source)`.
    pub fn min_by(
        &self,
        mapper: impl Fn(&Value, &Value, &Seq) -> Value + 'static,
    ) -> Result<Option<Value>> {
        sort::min_by(self, None, Some(Rc::new(mapper)))
    }

    /// Number of elements, iterating only when the size is unknown.
    pub fn count(&self) -> Result<usize> {
        count(self.view())
    }

    pub fn is_empty(&self) -> Result<bool> {
        if let Some(size) = self.size() {
            return Ok(size == 0);
        }
        Ok(self.first()?.is_none())
    }

    pub fn first(&self) -> Result<Option<Value>> {
        self.find_entry(false, |_, _, _| true)
            .map(|found| found.map(|(_, value)| value))
    }

    pub fn last(&self) -> Result<Option<Value>> {
        self.find_entry(true, |_, _, _| true)
            .map(|found| found.map(|(_, value)| value))
    }

    pub fn find(
        &self,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool,
    ) -> Result<Option<Value>> {
        self.find_entry(false, predicate)
            .map(|found| found.map(|(_, value)| value))
    }

    /// First `(key, value)` for which `predicate` holds, walking in the given
    /// direction.
    pub fn find_entry(
        &self,
        reverse: bool,
        predicate: impl Fn(&Value, &Value, &Seq) -> bool,
    ) -> Result<Option<Entry>> {
        let mut found = None;
        self.iterate(reverse, |value, key| {
            if predicate(&value, &key, self) {
                found = Some((key, value));
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;
        Ok(found)
    }

    pub fn every(&self, predicate: impl Fn(&Value, &Value, &Seq) -> bool) -> Result<bool> {
        Ok(self.find_entry(false, negate(predicate))?.is_none())
    }

    pub fn some(&self, predicate: impl Fn(&Value, &Value, &Seq) -> bool) -> Result<bool> {
        Ok(self.find_entry(false, predicate)?.is_some())
    }

    /// Left fold over `(accumulator, value, key)`.
    pub fn fold(
        &self,
        initial: impl Into<Value>,
        mut reducer: impl FnMut(Value, Value, Value) -> Value,
    ) -> Result<Value> {
        let mut accumulator = Some(initial.into());
        self.iterate(false, |value, key| {
            let previous = accumulator.take().unwrap_or_default();
            accumulator = Some(reducer(previous, value, key));
            ControlFlow::Continue(())
        })?;
        Ok(accumulator.unwrap_or_default())
    }

    /// Fold seeded with the first element; `None` for an empty seq.
    pub fn reduce(
        &self,
        mut reducer: impl FnMut(Value, Value, Value) -> Value,
    ) -> Result<Option<Value>> {
        let mut accumulator: Option<Value> = None;
        self.iterate(false, |value, key| {
            accumulator = Some(match accumulator.take() {
                None => value,
                Some(previous) => reducer(previous, value, key),
            });
            ControlFlow::Continue(())
        })?;
        Ok(accumulator)
    }

    pub fn to_vec(&self) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(self.size().unwrap_or(0));
        self.iterate(false, |value, _| {
            values.push(value);
            ControlFlow::Continue(())
        })?;
        Ok(values)
    }

    pub fn to_entries(&self) -> Result<Vec<Entry>> {
        collect_entries(self)
    }
}
