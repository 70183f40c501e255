//! Shape adapters: reinterpret a view as another shape without copying.

use core::ops::ControlFlow;

use smallvec::SmallVec;

use crate::{
    Error, Result,
    seq::{Entries, Entry, Iterable, Memo, Seq, Shape, Visitor},
    value::Value,
};

use super::policy::emitted_index;

/// Keyed reading of an indexed or set view. Keys pass through untouched.
pub struct ToKeyed {
    source: Seq,
    use_keys: bool,
}

impl ToKeyed {
    pub fn new(source: Seq, use_keys: bool) -> Self {
        Self { source, use_keys }
    }
}

impl Iterable for ToKeyed {
    fn shape(&self) -> Shape {
        Shape::Keyed
    }

    fn size(&self) -> Option<usize> {
        self.source.size()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        self.source.view().get(key)
    }

    fn has(&self, key: &Value) -> Result<bool> {
        self.source.view().has(key)
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        self.source.view().includes(value)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.source.iterate_push(visitor, reverse)
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        self.source.entries(reverse)
    }

    fn cache(&self) -> Result<bool> {
        self.source.view().cache()
    }

    fn value_seq(&self) -> Option<Seq> {
        // Positions were never real keys: the source already is the value view.
        (!self.use_keys).then(|| self.source.clone())
    }
}

/// Indexed reading of any view: keys are dropped and positions assigned in
/// emission order.
pub struct ToIndexed {
    source: Seq,
    memo: Memo,
}

impl ToIndexed {
    pub fn new(source: Seq) -> Self {
        Self {
            source,
            memo: Memo::new(),
        }
    }

    fn push_uncached(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let size = self.source.size();
        let mut i = 0;
        self.source.iterate(reverse, |value, _| {
            let key = emitted_index(reverse, size, i);
            i += 1;
            visitor(value, key)
        })
    }

    fn pull_uncached(&self, reverse: bool) -> Result<Entries> {
        let size = self.source.size();
        let mut i = 0;
        Ok(Entries::new(self.source.entries(reverse)?.map(move |step| {
            step.map(|(_, value)| {
                let key = emitted_index(reverse, size, i);
                i += 1;
                (key, value)
            })
        })))
    }

    fn must_realize(&self, reverse: bool) -> bool {
        reverse && self.source.size().is_none()
    }
}

impl Iterable for ToIndexed {
    fn shape(&self) -> Shape {
        Shape::Indexed
    }

    fn size(&self) -> Option<usize> {
        self.source.size().or_else(|| self.memo.len())
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
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
        self.memo.realize(|visitor| self.push_uncached(visitor, false))?;
        Ok(true)
    }
}

/// Set reading of any view: every value doubles as its own key.
pub struct ToSet {
    source: Seq,
}

impl ToSet {
    pub fn new(source: Seq) -> Self {
        Self { source }
    }
}

impl Iterable for ToSet {
    fn shape(&self) -> Shape {
        Shape::Set
    }

    fn size(&self) -> Option<usize> {
        self.source.size()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        Ok(self.has(key)?.then(|| key.clone()))
    }

    fn has(&self, key: &Value) -> Result<bool> {
        self.source.view().includes(key)
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        self.source.view().includes(value)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.source
            .iterate(reverse, |value, _| visitor(value.clone(), value))
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        Ok(Entries::new(
            self.source
                .entries(reverse)?
                .map(|step| step.map(|(_, value)| (value.clone(), value))),
        ))
    }

    fn cache(&self) -> Result<bool> {
        self.source.view().cache()
    }
}

/// Keyed reading of a view whose values are `[key, value]` pairs.
///
/// `undefined` and `null` elements are holes and are skipped; anything else
/// that is not a two-element indexed seq fails iteration.
pub struct FromEntries {
    source: Seq,
}

impl FromEntries {
    pub fn new(source: Seq) -> Self {
        Self { source }
    }
}

/// Split a `[key, value]` pair.
fn split_entry(element: &Value) -> Result<Entry> {
    let Some(pair) = element.as_seq().filter(|pair| pair.shape() == Shape::Indexed) else {
        return Err(Error::malformed_entry(element));
    };
    let mut parts: SmallVec<[Value; 2]> = SmallVec::new();
    let mut overflow = false;
    pair.iterate(false, |value, _| {
        if parts.len() == 2 {
            overflow = true;
            return ControlFlow::Break(());
        }
        parts.push(value);
        ControlFlow::Continue(())
    })?;
    let mut parts = parts.into_iter();
    match (parts.next(), parts.next(), overflow) {
        (Some(key), Some(value), false) => Ok((key, value)),
        _ => Err(Error::malformed_entry(element)),
    }
}

impl Iterable for FromEntries {
    fn shape(&self) -> Shape {
        Shape::Keyed
    }

    fn size(&self) -> Option<usize> {
        // Holes only show up while iterating.
        None
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let mut emitted = 0;
        let mut failure = None;
        self.source.iterate(reverse, |element, _| {
            if element.is_nullish() {
                return ControlFlow::Continue(());
            }
            match split_entry(&element) {
                Ok((key, value)) => {
                    emitted += 1;
                    visitor(value, key)
                }
                Err(err) => {
                    failure = Some(err);
                    ControlFlow::Break(())
                }
            }
        })?;
        match failure {
            Some(err) => Err(err),
            None => Ok(emitted),
        }
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        let mut inner = self.source.entries(reverse)?;
        Ok(Entries::from_fn(move || {
            loop {
                let element = match inner.next()? {
                    Ok((_, element)) => element,
                    Err(err) => return Some(Err(err)),
                };
                if !element.is_nullish() {
                    return Some(split_entry(&element));
                }
            }
        }))
    }
}

#[cfg(test)]
#[path = "adapt_test.rs"]
mod adapt_test;
