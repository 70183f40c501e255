//! Concrete, already-materialized sources.
//!
//! These are the minimal containers views are built over and aggregations
//! freeze into. They are immutable once constructed; [`MapBuilder`] is the
//! only mutable piece, used as scratch space until it is frozen.

mod list;
mod map;
mod set;

pub use list::List;
pub use map::{Map, MapBuilder};
pub use set::Set;

use crate::{
    Vec,
    seq::{Entry, Seq, Shape},
    value::Value,
};

impl Seq {
    /// Indexed seq over `values`.
    pub fn indexed<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Seq {
        Seq::new(List::new(values.into_iter().map(Into::into).collect()))
    }

    /// Ordered keyed seq over `entries`; a repeated key keeps its first
    /// position and its last value.
    pub fn keyed<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Seq {
        let mut builder = MapBuilder::<Value>::ordered();
        for (key, value) in entries {
            builder.set(key.into(), value.into());
        }
        Seq::new(builder.freeze())
    }

    /// Ordered set seq over `values`, dropping repeats.
    pub fn set<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Seq {
        Seq::new(Set::new(values.into_iter().map(Into::into)))
    }

    pub fn empty(shape: Shape) -> Seq {
        match shape {
            Shape::Keyed => Seq::new(MapBuilder::<Value>::ordered().freeze()),
            Shape::Indexed => Seq::new(List::new(Vec::new())),
            Shape::Set => Seq::new(Set::new(core::iter::empty())),
        }
    }
}

/// Materialize `entries` in `shape`: keyed keeps the pairs, indexed keeps the
/// values in order, set keeps the distinct values.
pub(crate) fn from_bucket(shape: Shape, entries: Vec<Entry>) -> Seq {
    match shape {
        Shape::Keyed => Seq::keyed(entries),
        Shape::Indexed => Seq::indexed(entries.into_iter().map(|(_, value)| value)),
        Shape::Set => Seq::set(entries.into_iter().map(|(_, value)| value)),
    }
}
