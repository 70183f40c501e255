//! Realization of lazy views.
//!
//! Some traversals cannot be answered lazily: reversing a view whose length is
//! unknown, or resolving a negative slice bound against an unknown size. At
//! those points a view realizes itself once into a [`Memo`] and serves every
//! later iteration, in either direction, from that buffer.

use core::ops::ControlFlow;

use once_cell::unsync::OnceCell;

use crate::{Rc, Result, Vec, value::Value};

use super::{Entries, Entry, Iterable, Seq, Shape, Visitor, collect_entries, lookup, wrap_index};

/// Cache cell of a lazy view: empty while the view is lazy, then holding the
/// realized entries in forward order for the rest of the view's life.
#[derive(Default)]
pub struct Memo {
    cell: OnceCell<Rc<[Entry]>>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Rc<[Entry]>> {
        self.cell.get()
    }

    pub fn is_realized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Entry count once realized.
    pub fn len(&self) -> Option<usize> {
        self.cell.get().map(|entries| entries.len())
    }

    /// Realize by running `forward`, a forward push over the live source.
    /// Idempotent: later calls return the same buffer without re-running.
    pub fn realize(
        &self,
        forward: impl FnOnce(&mut Visitor<'_>) -> Result<usize>,
    ) -> Result<Rc<[Entry]>> {
        self.cell
            .get_or_try_init(|| {
                let mut buffer = Vec::new();
                forward(&mut |value, key| {
                    buffer.push((key, value));
                    ControlFlow::Continue(())
                })?;
                tracing::trace!(len = buffer.len(), "realized lazy view");
                Ok(Rc::from(buffer))
            })
            .cloned()
    }

    /// Push through the realized buffer when there is one or `force` demands
    /// it, otherwise run `uncached` against the live source.
    pub(crate) fn push_or(
        &self,
        force: bool,
        visitor: &mut Visitor<'_>,
        reverse: bool,
        uncached: impl FnOnce(&mut Visitor<'_>, bool) -> Result<usize>,
    ) -> Result<usize> {
        if !force && !self.is_realized() {
            return uncached(visitor, reverse);
        }
        let entries = self.realize(|forward| uncached(forward, false))?;
        Ok(push_entries(&entries, visitor, reverse))
    }

    /// Pull counterpart of [`Memo::push_or`]; realization always goes through
    /// the forward push path.
    pub(crate) fn pull_or(
        &self,
        force: bool,
        reverse: bool,
        push_uncached: impl FnOnce(&mut Visitor<'_>, bool) -> Result<usize>,
        pull_uncached: impl FnOnce(bool) -> Result<Entries>,
    ) -> Result<Entries> {
        if !force && !self.is_realized() {
            return pull_uncached(reverse);
        }
        let entries = self.realize(|forward| push_uncached(forward, false))?;
        Ok(pull_entries(entries, reverse))
    }
}

/// Push a realized buffer into `visitor`.
pub(crate) fn push_entries(entries: &[Entry], visitor: &mut Visitor<'_>, reverse: bool) -> usize {
    let len = entries.len();
    let mut i = 0;
    while i != len {
        let (key, value) = &entries[if reverse { len - 1 - i } else { i }];
        i += 1;
        if visitor(value.clone(), key.clone()).is_break() {
            break;
        }
    }
    i
}

/// Pull iterator over a realized buffer.
pub(crate) fn pull_entries(entries: Rc<[Entry]>, reverse: bool) -> Entries {
    let len = entries.len();
    let mut i = 0;
    Entries::from_fn(move || {
        if i == len {
            return None;
        }
        let at = if reverse { len - 1 - i } else { i };
        i += 1;
        Some(Ok(entries[at].clone()))
    })
}

/// A snapshot of some other view's entries.
///
/// Used when a view without a memo of its own has to be given a known size,
/// e.g. the source of a slice with a negative bound.
pub struct Realized {
    shape: Shape,
    ordered: bool,
    entries: Rc<[Entry]>,
}

impl Realized {
    pub fn capture(source: &Seq) -> Result<Self> {
        let entries = collect_entries(source)?;
        tracing::trace!(len = entries.len(), shape = ?source.shape(), "captured snapshot");
        Ok(Self {
            shape: source.shape(),
            ordered: source.is_ordered(),
            entries: Rc::from(entries),
        })
    }
}

impl Iterable for Realized {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn size(&self) -> Option<usize> {
        Some(self.entries.len())
    }

    fn is_ordered(&self) -> bool {
        self.ordered
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        match (self.shape, key) {
            (Shape::Indexed, Value::Int(index)) => Ok(wrap_index(*index, self.entries.len())
                .and_then(|position| self.entries.get(position))
                .map(|(_, value)| value.clone())),
            _ => lookup(self, key),
        }
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        Ok(push_entries(&self.entries, visitor, reverse))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        Ok(pull_entries(self.entries.clone(), reverse))
    }
}

#[cfg(test)]
#[path = "memo_test.rs"]
mod memo_test;
