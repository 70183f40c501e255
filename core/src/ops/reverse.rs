use crate::{
    Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor},
    value::Value,
};

use super::policy::emitted_index;

/// The source in the opposite order.
///
/// With `use_keys` the source keys travel along; otherwise positions are
/// renumbered so the first emitted element is `0` again.
pub struct Reversed {
    source: Seq,
    use_keys: bool,
    memo: Memo,
}

impl Reversed {
    pub fn new(source: Seq, use_keys: bool) -> Self {
        Self {
            source,
            use_keys,
            memo: Memo::new(),
        }
    }

    /// Source key for one of our keys.
    fn source_key(&self, key: &Value) -> Option<Value> {
        if self.use_keys {
            return Some(key.clone());
        }
        let index = key.as_int()?;
        Some(Value::Int(-1 - index))
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        if self.use_keys {
            return self.source.iterate_push(visitor, !reverse);
        }
        let size = self.source.size();
        let mut i = 0;
        self.source.iterate(!reverse, |value, _| {
            let key = emitted_index(reverse, size, i);
            i += 1;
            visitor(value, key)
        })
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let inner = self.source.entries(!reverse)?;
        if self.use_keys {
            return Ok(inner);
        }
        let size = self.source.size();
        let mut i = 0;
        Ok(Entries::new(inner.map(move |step| {
            step.map(|(_, value)| {
                let key = emitted_index(reverse, size, i);
                i += 1;
                (key, value)
            })
        })))
    }

    fn must_realize(&self, reverse: bool) -> bool {
        reverse && !self.use_keys && self.source.size().is_none()
    }
}

impl Iterable for Reversed {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.source.size().or_else(|| self.memo.len())
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        match self.source_key(key) {
            Some(key) => self.source.view().get(&key),
            None => Ok(None),
        }
    }

    fn has(&self, key: &Value) -> Result<bool> {
        match self.source_key(key) {
            Some(key) => self.source.view().has(&key),
            None => Ok(false),
        }
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        self.source.view().includes(value)
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
        if self.use_keys {
            return self.source.view().cache();
        }
        self.memo.realize(|visitor| self.push_uncached(visitor, false))?;
        Ok(true)
    }

    fn reversed(&self) -> Option<Seq> {
        Some(self.source.clone())
    }

    fn flipped(&self) -> Option<Seq> {
        // reverse(flip(s)) flipped back is reverse(s), not a third wrapper.
        // Only when reversing s keeps its keys.
        let original = self.source.view().flipped()?;
        original.shape().keeps_keys().then(|| original.reverse())
    }

    fn value_seq(&self) -> Option<Seq> {
        Some(self.source.view().value_seq()?.reverse())
    }
}

#[cfg(test)]
#[path = "reverse_test.rs"]
mod reverse_test;
