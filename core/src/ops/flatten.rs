use core::ops::ControlFlow;

use smallvec::SmallVec;

use crate::{
    Error, Rc, Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor},
    value::Value,
};

use super::{
    Mapper,
    map::Mapped,
    policy::{coerce, descends, emitted_index, normalize_depth},
};

/// Nested views spliced into their parent, down to `depth` levels.
///
/// Set-shaped output keys every element by itself, whatever the nested
/// views' own keys were.
pub struct Flattened {
    source: Seq,
    depth: Option<usize>,
    use_keys: bool,
    /// Exact size when the caller knows it up front (concatenation does).
    size_hint: Option<usize>,
    memo: Memo,
}

/// Bookkeeping shared across the levels of one push traversal.
#[derive(Default)]
struct Walk {
    emitted: usize,
    stopped: bool,
    failure: Option<Error>,
}

impl Flattened {
    pub fn new(
        source: Seq,
        depth: Option<usize>,
        use_keys: bool,
        size_hint: Option<usize>,
    ) -> Self {
        Self {
            source,
            depth: normalize_depth(depth),
            use_keys,
            size_hint,
            memo: Memo::new(),
        }
    }

    fn descend(
        &self,
        seq: &Seq,
        level: usize,
        reverse: bool,
        walk: &mut Walk,
        visitor: &mut Visitor<'_>,
    ) -> Result<()> {
        let (shape, size) = (self.source.shape(), self.size_hint);
        seq.iterate(reverse, |value, key| {
            let nested = descends(self.depth, level)
                .then(|| value.as_seq().cloned())
                .flatten();
            if let Some(nested) = nested {
                let descended =
                    self.descend(&nested, level + 1, reverse, &mut *walk, &mut *visitor);
                if let Err(err) = descended {
                    walk.failure.get_or_insert(err);
                }
                return if walk.stopped || walk.failure.is_some() {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                };
            }
            let key = match (shape, self.use_keys) {
                (Shape::Set, _) => value.clone(),
                (_, true) => key,
                (_, false) => emitted_index(reverse, size, walk.emitted),
            };
            walk.emitted += 1;
            if visitor(value, key).is_break() {
                walk.stopped = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;
        Ok(())
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let mut walk = Walk::default();
        self.descend(&self.source, 0, reverse, &mut walk, visitor)?;
        match walk.failure {
            Some(err) => Err(err),
            None => Ok(walk.emitted),
        }
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let mut stack: SmallVec<[(Entries, usize); 4]> = SmallVec::new();
        stack.push((self.source.entries(reverse)?, 0));
        let (depth, use_keys, size) = (self.depth, self.use_keys, self.size_hint);
        let shape = self.source.shape();
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            loop {
                let (parent, level) = stack.last_mut()?;
                let level = *level;
                let (key, value) = match parent.next() {
                    None => {
                        stack.pop();
                        continue;
                    }
                    Some(Err(err)) => {
                        stack.clear();
                        return Some(Err(err));
                    }
                    Some(Ok(entry)) => entry,
                };
                if descends(depth, level) {
                    if let Some(nested) = value.as_seq() {
                        match nested.entries(reverse) {
                            Ok(children) => stack.push((children, level + 1)),
                            Err(err) => {
                                stack.clear();
                                return Some(Err(err));
                            }
                        }
                        continue;
                    }
                }
                let key = match (shape, use_keys) {
                    (Shape::Set, _) => value.clone(),
                    (_, true) => key,
                    (_, false) => emitted_index(reverse, size, emitted),
                };
                emitted += 1;
                return Some(Ok((key, value)));
            }
        }))
    }

    fn must_realize(&self, reverse: bool) -> bool {
        reverse && !self.use_keys && self.size_hint.is_none()
    }
}

impl Iterable for Flattened {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.size_hint.or_else(|| self.memo.len())
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
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

/// Map every element to a view of the source's shape and splice the results
/// in, one level deep.
pub(crate) fn flat_map(source: &Seq, mapper: Mapper) -> Seq {
    let shape = source.shape();
    let coerced: Mapper = Rc::new(move |value: &Value, key: &Value, source: &Seq| {
        Value::Seq(coerce(shape, mapper(value, key, source), key))
    });
    let mapped = Seq::new(Mapped::new(source.clone(), coerced));
    Seq::new(Flattened::new(mapped, Some(1), shape.keeps_keys(), None))
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod flatten_test;
