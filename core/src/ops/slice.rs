use core::ops::ControlFlow;

use once_cell::unsync::OnceCell;

use crate::{
    Result,
    seq::{Entries, Iterable, Memo, Seq, Shape, Visitor, lookup, wrap_index},
    value::Value,
};

use super::policy::{emitted_index, resolve_begin, resolve_end, whole_slice};

/// Bounds resolved against a source of (as far as possible) known size.
struct Window {
    source: Seq,
    begin: usize,
    end: Option<usize>,
    /// Length of the window, when the end is known. The source may still run
    /// out earlier if its size is unknown.
    len: Option<usize>,
}

impl Window {
    fn resolve(source: Seq, begin: i64, end: Option<i64>) -> Self {
        let size = source.size();
        let begin = resolve_begin(begin, size);
        let end = resolve_end(end, size);
        let len = end.map(|end| end.saturating_sub(begin));
        Self {
            source,
            begin,
            end,
            len,
        }
    }

    /// Exact number of elements, when it follows from the source size.
    fn size(&self) -> Option<usize> {
        match self.len {
            Some(0) => Some(0),
            len => self.source.size().and(len),
        }
    }

    /// How many trailing source elements to skip and how many to emit when
    /// walking the source backwards; needs a known source size.
    fn backward(&self) -> Option<(usize, usize)> {
        let total = self.source.size()?;
        let end = self.end?;
        Some((total.saturating_sub(end), self.len?))
    }
}

/// `begin..end` of the source.
///
/// Bounds that cannot be resolved yet (negative, over a source of unknown
/// size) are resolved on first drive, after caching the source.
pub struct Sliced {
    source: Seq,
    begin: i64,
    end: Option<i64>,
    use_keys: bool,
    window: OnceCell<Window>,
    memo: Memo,
}

impl Sliced {
    fn new(source: Seq, begin: i64, end: Option<i64>, use_keys: bool) -> Self {
        let negative = begin < 0 || end.is_some_and(|end| end < 0);
        let window = if source.size().is_some() || !negative {
            OnceCell::with_value(Window::resolve(source.clone(), begin, end))
        } else {
            OnceCell::new()
        };
        Self {
            source,
            begin,
            end,
            use_keys,
            window,
            memo: Memo::new(),
        }
    }

    fn window(&self) -> Result<&Window> {
        self.window.get_or_try_init(|| {
            tracing::trace!(begin = self.begin, end = ?self.end, "caching slice source");
            let source = self.source.cache_result()?;
            Ok(Window::resolve(source, self.begin, self.end))
        })
    }

    fn push_forward(&self, window: &Window, visitor: &mut Visitor<'_>) -> Result<usize> {
        if window.len == Some(0) {
            return Ok(0);
        }
        let mut skipped = 0;
        let mut emitted: usize = 0;
        window.source.iterate(false, |value, key| {
            if skipped < window.begin {
                skipped += 1;
                return ControlFlow::Continue(());
            }
            let key = if self.use_keys { key } else { Value::from(emitted) };
            emitted += 1;
            if visitor(value, key).is_break() || Some(emitted) == window.len {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;
        Ok(emitted)
    }

    fn push_backward(
        &self,
        window: &Window,
        (skip, len): (usize, usize),
        visitor: &mut Visitor<'_>,
    ) -> Result<usize> {
        if len == 0 {
            return Ok(0);
        }
        let mut skipped = 0;
        let mut emitted = 0;
        window.source.iterate(true, |value, key| {
            if skipped < skip {
                skipped += 1;
                return ControlFlow::Continue(());
            }
            let key = if self.use_keys {
                key
            } else {
                emitted_index(true, Some(len), emitted)
            };
            emitted += 1;
            if visitor(value, key).is_break() || emitted == len {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;
        Ok(emitted)
    }

    fn pull_forward(&self, window: &Window) -> Result<Entries> {
        if window.len == Some(0) {
            return Ok(Entries::empty());
        }
        let mut inner = window.source.entries(false)?;
        let (begin, len, use_keys) = (window.begin, window.len, self.use_keys);
        let mut skipped = 0;
        let mut emitted: usize = 0;
        Ok(Entries::from_fn(move || {
            while skipped < begin {
                skipped += 1;
                if let Err(err) = inner.next()? {
                    return Some(Err(err));
                }
            }
            if Some(emitted) == len {
                return None;
            }
            let (key, value) = match inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };
            let key = if use_keys { key } else { Value::from(emitted) };
            emitted += 1;
            Some(Ok((key, value)))
        }))
    }

    fn pull_backward(&self, window: &Window, (skip, len): (usize, usize)) -> Result<Entries> {
        let mut inner = window.source.entries(true)?;
        let use_keys = self.use_keys;
        let mut skipped = 0;
        let mut emitted = 0;
        Ok(Entries::from_fn(move || {
            while skipped < skip {
                skipped += 1;
                if let Err(err) = inner.next()? {
                    return Some(Err(err));
                }
            }
            if emitted == len {
                return None;
            }
            let (key, value) = match inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };
            let key = if use_keys {
                key
            } else {
                emitted_index(true, Some(len), emitted)
            };
            emitted += 1;
            Some(Ok((key, value)))
        }))
    }

    /// The backward plan for a reverse drive, if it can be walked lazily.
    fn plan(&self, window: &Window, reverse: bool) -> Option<(usize, usize)> {
        if reverse { window.backward() } else { None }
    }
}

impl Iterable for Sliced {
    fn shape(&self) -> Shape {
        self.source.shape()
    }

    fn size(&self) -> Option<usize> {
        self.memo
            .len()
            .or_else(|| self.window.get().and_then(Window::size))
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        if let (false, Value::Int(index)) = (self.use_keys, key) {
            let window = self.window()?;
            if let Some(len) = window.size() {
                return match wrap_index(*index, len).filter(|position| *position < len) {
                    Some(position) => window
                        .source
                        .view()
                        .get(&Value::from(position + window.begin)),
                    None => Ok(None),
                };
            }
        }
        lookup(self, key)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        let window = self.window()?;
        let plan = self.plan(window, reverse);
        self.memo.push_or(
            reverse && plan.is_none(),
            visitor,
            reverse,
            |visitor, reverse| match plan.filter(|_| reverse) {
                Some(plan) => self.push_backward(window, plan, visitor),
                None => self.push_forward(window, visitor),
            },
        )
    }

    fn iterate_pull(&self, reverse: bool) -> Result<Entries> {
        let window = self.window()?;
        let plan = self.plan(window, reverse);
        self.memo.pull_or(
            reverse && plan.is_none(),
            reverse,
            |visitor, reverse| match plan.filter(|_| reverse) {
                Some(plan) => self.push_backward(window, plan, visitor),
                None => self.push_forward(window, visitor),
            },
            |reverse| match plan.filter(|_| reverse) {
                Some(plan) => self.pull_backward(window, plan),
                None => self.pull_forward(window),
            },
        )
    }

    fn cache(&self) -> Result<bool> {
        let window = self.window()?;
        self.memo
            .realize(|visitor| self.push_forward(window, visitor))?;
        Ok(true)
    }
}

/// Slice `source`, handing the source back untouched when the window covers
/// all of it.
pub(crate) fn slice(source: &Seq, begin: i64, end: Option<i64>, use_keys: bool) -> Seq {
    if whole_slice(begin, end, source.size()) {
        return source.clone();
    }
    Seq::new(Sliced::new(source.clone(), begin, end, use_keys))
}

#[cfg(test)]
#[path = "slice_test.rs"]
mod slice_test;
