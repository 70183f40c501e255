//! Lazy views and the capability contract every combinator implements.
//!
//! A view is anything implementing [`Iterable`]: it knows its [`Shape`], maybe
//! its size, and how to hand its entries out either by pushing them into a
//! visitor or by returning a pull iterator. [`Seq`] is the cheap, cloneable
//! handle callers hold; every combinator takes a `Seq` and returns a new one
//! without touching the source.
//!
//! # Keys
//!
//! * keyed views carry arbitrary unique keys;
//! * indexed views carry positions `0, 1, 2, ...` in forward order;
//! * set views carry each value as its own key.

mod memo;
mod step;

pub use memo::{Memo, Realized};
pub use step::{Cursor, Entries, Kind, Step};

pub(crate) use memo::{pull_entries, push_entries};

use core::fmt;
use core::ops::ControlFlow;

use crate::{Rc, Result, Vec, value::Value};

/// A `(key, value)` pair.
pub type Entry = (Value, Value);

/// Push-iteration callback: receives `(value, key)` and tells the producer
/// whether to keep going.
pub type Visitor<'a> = dyn FnMut(Value, Value) -> ControlFlow<()> + 'a;

/// What the keys of a view mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Keyed,
    Indexed,
    Set,
}

impl Shape {
    /// Whether combinators over this shape carry source keys through instead
    /// of numbering their output from zero.
    pub const fn keeps_keys(self) -> bool {
        !matches!(self, Shape::Indexed)
    }
}

/// The capability contract shared by concrete containers and lazy views.
///
/// `iterate_push` returns the number of entries handed to the visitor,
/// including the one on which the visitor asked to stop.
pub trait Iterable {
    fn shape(&self) -> Shape;

    /// Exact element count, when known without iterating.
    fn size(&self) -> Option<usize>;

    fn is_ordered(&self) -> bool {
        true
    }

    fn get(&self, key: &Value) -> Result<Option<Value>> {
        lookup(self, key)
    }

    fn has(&self, key: &Value) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn includes(&self, value: &Value) -> Result<bool> {
        contains(self, value)
    }

    fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize>;

    fn iterate_pull(&self, reverse: bool) -> Result<Entries>;

    /// Realize this view into its own buffer, if it keeps one. Returns whether
    /// the view is now backed by realized entries.
    fn cache(&self) -> Result<bool> {
        Ok(false)
    }

    /// The view this one reverses, so that reversing twice unwraps.
    fn reversed(&self) -> Option<Seq> {
        None
    }

    /// The view this one flips, so that flipping twice unwraps.
    fn flipped(&self) -> Option<Seq> {
        None
    }

    /// A cheaper values-only view than re-indexing this one, if known.
    fn value_seq(&self) -> Option<Seq> {
        None
    }
}

/// Cloneable handle to a view.
#[derive(Clone)]
pub struct Seq {
    view: Rc<dyn Iterable>,
}

impl Seq {
    pub fn new(view: impl Iterable + 'static) -> Self {
        Self {
            view: Rc::new(view),
        }
    }

    pub fn view(&self) -> &dyn Iterable {
        &*self.view
    }

    /// Whether both handles point at the same view instance.
    pub fn ptr_eq(&self, other: &Seq) -> bool {
        Rc::ptr_eq(&self.view, &other.view)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.view).cast::<()>() as usize
    }

    pub fn shape(&self) -> Shape {
        self.view.shape()
    }

    pub fn size(&self) -> Option<usize> {
        self.view.size()
    }

    pub fn is_ordered(&self) -> bool {
        self.view.is_ordered()
    }

    pub fn get(&self, key: impl Into<Value>) -> Result<Option<Value>> {
        self.view.get(&key.into())
    }

    /// Like [`Seq::get`], falling back to `not_set` when the key is absent.
    pub fn get_or(&self, key: impl Into<Value>, not_set: impl Into<Value>) -> Result<Value> {
        Ok(self.get(key)?.unwrap_or_else(|| not_set.into()))
    }

    pub fn has(&self, key: impl Into<Value>) -> Result<bool> {
        self.view.has(&key.into())
    }

    pub fn includes(&self, value: impl Into<Value>) -> Result<bool> {
        self.view.includes(&value.into())
    }

    /// Push every entry into `visitor` as `(value, key)` until it breaks.
    pub fn iterate_push(&self, visitor: &mut Visitor<'_>, reverse: bool) -> Result<usize> {
        self.view.iterate_push(visitor, reverse)
    }

    /// Convenience over [`Seq::iterate_push`] taking the visitor by value.
    pub fn iterate(
        &self,
        reverse: bool,
        mut visitor: impl FnMut(Value, Value) -> ControlFlow<()>,
    ) -> Result<usize> {
        self.view.iterate_push(&mut visitor, reverse)
    }

    /// Pull iterator over `(key, value)` entries.
    pub fn entries(&self, reverse: bool) -> Result<Entries> {
        self.view.iterate_pull(reverse)
    }

    /// Pull iterator yielding keys, values or `[key, value]` pairs.
    pub fn iterate_pull(&self, kind: Kind, reverse: bool) -> Result<Cursor> {
        Ok(Cursor::new(self.entries(reverse)?, kind))
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.shape();
        let (open, close) = match shape {
            Shape::Keyed => ("{", "}"),
            Shape::Indexed => ("[", "]"),
            Shape::Set => ("#{", "}"),
        };
        f.write_str(open)?;
        let mut written = Ok(());
        let mut first = true;
        let driven = self.iterate(false, |value, key| {
            written = (|| {
                if !first {
                    f.write_str(", ")?;
                }
                if shape == Shape::Keyed {
                    write!(f, "{key:?}: ")?;
                }
                write!(f, "{value:?}")
            })();
            first = false;
            if written.is_err() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        written?;
        if driven.is_err() {
            f.write_str(if first { "<error>" } else { ", <error>" })?;
        }
        f.write_str(close)
    }
}

/// Resolve a possibly negative position against `size`.
pub(crate) fn wrap_index(index: i64, size: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok()
    } else {
        size.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)
    }
}

/// Number of entries, iterating when the size is not known.
pub(crate) fn count<I: Iterable + ?Sized>(view: &I) -> Result<usize> {
    match view.size() {
        Some(size) => Ok(size),
        None => view.iterate_push(&mut |_, _| ControlFlow::Continue(()), false),
    }
}

/// Default `get`: scan forward for the matching key.
///
/// Negative positions on indexed views count from the end; set views answer
/// with the value itself when they contain it.
pub(crate) fn lookup<I: Iterable + ?Sized>(view: &I, key: &Value) -> Result<Option<Value>> {
    let target = match (view.shape(), key) {
        (Shape::Set, _) => return Ok(contains(view, key)?.then(|| key.clone())),
        (Shape::Indexed, Value::Int(index)) if *index < 0 => {
            match wrap_index(*index, count(view)?) {
                Some(position) => Value::from(position),
                None => return Ok(None),
            }
        }
        _ => key.clone(),
    };
    let mut found = None;
    view.iterate_push(
        &mut |value, key| {
            if key == target {
                found = Some(value);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
        false,
    )?;
    Ok(found)
}

/// Default `includes`: scan forward for an equal value.
pub(crate) fn contains<I: Iterable + ?Sized>(view: &I, needle: &Value) -> Result<bool> {
    let mut found = false;
    view.iterate_push(
        &mut |value, _| {
            if value == *needle {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
        false,
    )?;
    Ok(found)
}

/// Collect entries in forward order.
pub(crate) fn collect_entries(seq: &Seq) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(seq.size().unwrap_or(0));
    seq.iterate(false, |value, key| {
        entries.push((key, value));
        ControlFlow::Continue(())
    })?;
    Ok(entries)
}
