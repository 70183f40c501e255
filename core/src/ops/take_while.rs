use core::ops::ControlFlow;

use crate::{
    Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor},
    value::Value,
};

use super::Predicate;

/// Leading run of the source for which the predicate holds.
///
/// Keys pass through. Evaluation is a single forward pass, so reverse
/// iteration always goes through the realized buffer.
pub struct TakeWhile {
    source: Seq,
    predicate: Predicate,
    memo: Memo,
}

impl TakeWhile {
    pub fn new(source: Seq, predicate: Predicate) -> Self {
        Self {
            source,
            predicate,
            memo: Memo::new(),
        }
    }

    fn push_forward(&self, visitor: &mut Visitor<'_>) -> Result<usize> {
        let mut emitted: usize = 0;
        self.source.iterate(false, |value, key| {
            if !(self.predicate)(&value, &key, &self.source) {
                return ControlFlow::Break(());
            }
            emitted += 1;
            visitor(value, key)
        })?;
        Ok(emitted)
    }

    fn pull_forward(&self) -> Result<Entries> {
        let mut inner = self.source.entries(false)?;
        let source = self.source.clone();
        let predicate = self.predicate.clone();
        Ok(Entries::from_fn(move || {
            let (key, value) = match inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };
            // `Entries` is fused, so returning `None` once ends it for good.
            predicate(&value, &key, &source).then_some(Ok((key, value)))
        }))
    }
}

impl Iterable for TakeWhile {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.memo.len()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.memo
            .push_or(reverse, visitor, reverse, |visitor, _| self.push_forward(visitor))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        self.memo.pull_or(
            reverse,
            reverse,
            |visitor, _| self.push_forward(visitor),
            |_| self.pull_forward(),
        )
    }

    fn cache(&self) -> Result<bool> {
        self.memo.realize(|visitor| self.push_forward(visitor))?;
        Ok(true)
    }
}

/// The source from the first element for which the predicate fails.
///
/// Once skipping stops the predicate is never consulted again.
pub struct SkipWhile {
    source: Seq,
    predicate: Predicate,
    use_keys: bool,
    memo: Memo,
}

impl SkipWhile {
    pub fn new(source: Seq, predicate: Predicate, use_keys: bool) -> Self {
        Self {
            source,
            predicate,
            use_keys,
            memo: Memo::new(),
        }
    }

    fn push_forward(&self, visitor: &mut Visitor<'_>) -> Result<usize> {
        let mut skipping = true;
        let mut emitted: usize = 0;
        self.source.iterate(false, |value, key| {
            if skipping && (self.predicate)(&value, &key, &self.source) {
                return ControlFlow::Continue(());
            }
            skipping = false;
            let key = if self.use_keys { key } else { Value::from(emitted) };
            emitted += 1;
            visitor(value, key)
        })?;
        Ok(emitted)
    }

    fn pull_forward(&self) -> Result<Entries> {
        let mut inner = self.source.entries(false)?;
        let source = self.source.clone();
        let predicate = self.predicate.clone();
        let use_keys = self.use_keys;
        let mut skipping = true;
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            loop {
                let (key, value) = match inner.next()? {
                    Ok(entry) => entry,
                    Err(err) => return Some(Err(err)),
                };
                if skipping && predicate(&value, &key, &source) {
                    continue;
                }
                skipping = false;
                let key = if use_keys { key } else { Value::from(emitted) };
                emitted += 1;
                return Some(Ok((key, value)));
            }
        }))
    }
}

impl Iterable for SkipWhile {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.memo.len()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.memo
            .push_or(reverse, visitor, reverse, |visitor, _| self.push_forward(visitor))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        self.memo.pull_or(
            reverse,
            reverse,
            |visitor, _| self.push_forward(visitor),
            |_| self.pull_forward(),
        )
    }

    fn cache(&self) -> Result<bool> {
        self.memo.realize(|visitor| self.push_forward(visitor))?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "take_while_test.rs"]
mod take_while_test;
