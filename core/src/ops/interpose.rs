use crate::{
    Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor, contains},
    value::Value,
};

use super::policy::emitted_index;

/// The source's values with `separator` between consecutive ones.
pub struct Interposed {
    source: Seq,
    separator: Value,
    memo: Memo,
}

fn interposed_size(size: usize) -> usize {
    (2 * size).saturating_sub(1)
}

impl Interposed {
    pub fn new(source: Seq, separator: Value) -> Self {
        Self {
            source,
            separator,
            memo: Memo::new(),
        }
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let size = self.size();
        let mut emitted: usize = 0;
        self.source.iterate(reverse, |value, _| {
            if emitted > 0 {
                let key = emitted_index(reverse, size, emitted);
                emitted += 1;
                visitor(self.separator.clone(), key)?;
            }
            let key = emitted_index(reverse, size, emitted);
            emitted += 1;
            visitor(value, key)
        })?;
        Ok(emitted)
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let mut inner = self.source.entries(reverse)?;
        let size = self.size();
        let separator = self.separator.clone();
        let mut held: Option<Value> = None;
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            let value = match held.take() {
                Some(value) => value,
                None => {
                    let value = match inner.next()? {
                        Ok((_, value)) => value,
                        Err(err) => return Some(Err(err)),
                    };
                    if emitted > 0 {
                        held = Some(value);
                        separator.clone()
                    } else {
                        value
                    }
                }
            };
            let key = emitted_index(reverse, size, emitted);
            emitted += 1;
            Some(Ok((key, value)))
        }))
    }

    fn must_realize(&self, reverse: bool) -> bool {
        reverse && self.source.size().is_none()
    }
}

impl Iterable for Interposed {
    fn shape(&self) -> Shape {
        Shape::Indexed
    }

    fn size(&self) -> Option<usize> {
        self.source
            .size()
            .map(interposed_size)
            .or_else(|| self.memo.len())
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        // Two or more elements guarantee a separator.
        if *value == self.separator && self.source.size().is_some_and(|size| size > 1) {
            return Ok(true);
        }
        contains(self, value)
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
#[path = "interpose_test.rs"]
mod interpose_test;
