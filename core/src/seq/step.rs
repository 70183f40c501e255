//! The pull-side iteration protocol.
//!
//! Views hand out [`Entries`], a boxed iterator of `(key, value)` results that
//! is usually built from a step-producing closure with [`Entries::from_fn`].
//! Callers get a [`Cursor`], which projects entries to the requested [`Kind`]
//! and reports each advance as a [`Step`].

use core::iter::Fuse;

use crate::{Box, Result, collections::List, value::Value};

use super::Entry;

/// Which part of each entry a cursor yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Keys,
    Values,
    /// `[key, value]` pairs as two-element indexed seqs.
    Entries,
}

/// Result of advancing a cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Done,
    Yield(Value),
}

/// Pull iterator over a view's entries.
///
/// Fused: once it returns `None` it keeps doing so.
pub struct Entries {
    inner: Fuse<Box<dyn Iterator<Item = Result<Entry>>>>,
}

impl Entries {
    pub fn new(iter: impl Iterator<Item = Result<Entry>> + 'static) -> Self {
        let boxed: Box<dyn Iterator<Item = Result<Entry>>> = Box::new(iter);
        Self {
            inner: boxed.fuse(),
        }
    }

    /// Wrap a step-producing closure: `None` ends the iteration.
    pub fn from_fn(step: impl FnMut() -> Option<Result<Entry>> + 'static) -> Self {
        Self::new(core::iter::from_fn(step))
    }

    pub fn empty() -> Self {
        Self::new(core::iter::empty())
    }
}

impl Iterator for Entries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Caller-facing pull iterator.
pub struct Cursor {
    entries: Entries,
    kind: Kind,
    done: bool,
}

impl Cursor {
    pub fn new(entries: Entries, kind: Kind) -> Self {
        Self {
            entries,
            kind,
            done: false,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Advance once. After `Done` or an error every further call is `Done`.
    pub fn step(&mut self) -> Result<Step> {
        if self.done {
            return Ok(Step::Done);
        }
        match self.entries.next() {
            None => {
                self.done = true;
                Ok(Step::Done)
            }
            Some(Err(err)) => {
                self.done = true;
                Err(err)
            }
            Some(Ok((key, value))) => Ok(Step::Yield(match self.kind {
                Kind::Keys => key,
                Kind::Values => value,
                Kind::Entries => Value::Seq(List::pair(key, value)),
            })),
        }
    }
}

impl Iterator for Cursor {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Step::Done) => None,
            Ok(Step::Yield(value)) => Some(Ok(value)),
            Err(err) => Some(Err(err)),
        }
    }
}
