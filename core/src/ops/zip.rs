use smallvec::SmallVec;

use crate::{
    Result, Vec,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor},
    value::Value,
};

use super::{Zipper, policy::emitted_index};

/// `zipper` applied to the values at the same position of every source.
///
/// Ends with the shortest source, or with the longest one when `zip_all` is
/// set, in which case missing values are `undefined`.
pub struct Zipped {
    sources: Vec<Seq>,
    zipper: Zipper,
    zip_all: bool,
    memo: Memo,
}

impl Zipped {
    pub fn new(sources: Vec<Seq>, zipper: Zipper, zip_all: bool) -> Self {
        Self {
            sources,
            zipper,
            zip_all,
            memo: Memo::new(),
        }
    }

    /// Size following from the source sizes, when all are known.
    fn arithmetic_size(&self) -> Option<usize> {
        let mut sizes = self.sources.iter().map(Seq::size);
        let first = sizes.next()??;
        sizes.try_fold(first, |size, other| {
            let other = other?;
            Some(if self.zip_all { size.max(other) } else { size.min(other) })
        })
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let mut inner = self
            .sources
            .iter()
            .map(|source| source.entries(reverse))
            .collect::<Result<Vec<_>>>()?;
        let zipper = self.zipper.clone();
        let zip_all = self.zip_all;
        let size = self.arithmetic_size();
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(inner.len());
            let mut exhausted = 0;
            for entries in &mut inner {
                match entries.next() {
                    Some(Ok((_, value))) => values.push(value),
                    Some(Err(err)) => return Some(Err(err)),
                    None => {
                        exhausted += 1;
                        values.push(Value::Undefined);
                    }
                }
            }
            let done = if zip_all {
                exhausted == values.len()
            } else {
                exhausted > 0
            };
            if done {
                return None;
            }
            let key = emitted_index(reverse, size, emitted);
            emitted += 1;
            Some(Ok((key, zipper(values.as_slice()))))
        }))
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let mut emitted = 0;
        for entry in self.pull_uncached(reverse)? {
            let (key, value) = entry?;
            emitted += 1;
            if visitor(value, key).is_break() {
                break;
            }
        }
        Ok(emitted)
    }

    /// Walking every source backwards lines positions up only when all of
    /// them have the same known length.
    fn must_realize(&self, reverse: bool) -> bool {
        if !reverse {
            return false;
        }
        let mut sizes = self.sources.iter().map(Seq::size);
        let Some(Some(first)) = sizes.next() else {
            return true;
        };
        !sizes.all(|size| size == Some(first))
    }
}

impl Iterable for Zipped {
    fn shape(&self) -> Shape {
        Shape::Indexed
    }

    fn size(&self) -> Option<usize> {
        self.arithmetic_size().or_else(|| self.memo.len())
    }

    fn is_ordered(&self) -> bool {
        self.sources.iter().all(Seq::is_ordered)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.memo
            .push_or(self.must_realize(reverse), visitor, reverse, |visitor, reverse| {
                self.push_uncached(visitor, reverse)
            })
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        self.memo.pull_or(
            self.must_realize(reverse),
            reverse,
            |visitor, reverse| self.push_uncached(visitor, reverse),
            |reverse| self.pull_uncached(reverse),
        )
    }

    fn cache(&self) -> Result<bool> {
        self.memo.realize(|visitor| self.push_uncached(visitor, false))?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "zip_test.rs"]
mod zip_test;
