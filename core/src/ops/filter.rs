use core::ops::ControlFlow;

use crate::{
    Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor, lookup},
    value::Value,
};

use super::Predicate;

/// Elements for which `predicate(value, key, source)` holds.
///
/// The size is unknown until the view has been realized.
pub struct Filtered {
    source: Seq,
    predicate: Predicate,
    use_keys: bool,
    memo: Memo,
}

impl Filtered {
    pub fn new(source: Seq, predicate: Predicate, use_keys: bool) -> Self {
        Self {
            source,
            predicate,
            use_keys,
            memo: Memo::new(),
        }
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let mut emitted: usize = 0;
        self.source.iterate(reverse, |value, key| {
            if !(self.predicate)(&value, &key, &self.source) {
                return ControlFlow::Continue(());
            }
            let key = if self.use_keys { key } else { Value::from(emitted) };
            emitted += 1;
            visitor(value, key)
        })?;
        Ok(emitted)
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let mut inner = self.source.entries(reverse)?;
        let source = self.source.clone();
        let predicate = self.predicate.clone();
        let use_keys = self.use_keys;
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            loop {
                let (key, value) = match inner.next()? {
                    Ok(entry) => entry,
                    Err(err) => return Some(Err(err)),
                };
                if predicate(&value, &key, &source) {
                    let key = if use_keys { key } else { Value::from(emitted) };
                    emitted += 1;
                    return Some(Ok((key, value)));
                }
            }
        }))
    }

    fn must_realize(&self, reverse: bool) -> bool {
        reverse && !self.use_keys
    }
}

impl Iterable for Filtered {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.memo.len()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        if !self.use_keys {
            return lookup(self, key);
        }
        Ok(self
            .source
            .view()
            .get(key)?
            .filter(|value| (self.predicate)(value, key, &self.source)))
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
#[path = "filter_test.rs"]
mod filter_test;
