//! Lazyseq - lazy, composable views over keyed, indexed and set collections
//!
//! # Overview
//!
//! A [`Seq`] is a cheap, cloneable handle to a read-only view. Combinators
//! such as [`Seq::map`], [`Seq::filter`] or [`Seq::slice`] wrap a view in
//! another view without touching any element; work only happens when the
//! result is driven, either by push iteration ([`Seq::iterate`]), by pull
//! iteration ([`Seq::iterate_pull`]) or by an eager consumer such as
//! [`Seq::to_vec`] or [`Seq::fold`].
//!
//! Every view has a [`Shape`]:
//!
//! - **Indexed** views are keyed by position and renumber from zero after
//!   filtering or slicing
//! - **Keyed** views carry their keys through every combinator
//! - **Set** views are keyed by the values themselves
//!
//! # Quick Start
//!
//! ```
//! use lazyseq::{Seq, Value};
//!
//! let numbers = Seq::indexed([5, 6, 7, 8, 9]);
//! let evens = numbers
//!     .filter(|value, _, _| value.as_int().is_some_and(|i| i % 2 == 0))
//!     .map(|value, _, _| Value::Int(value.as_int().unwrap_or_default() * 10));
//!
//! assert_eq!(evens.to_vec().unwrap(), vec![Value::Int(60), Value::Int(80)]);
//! assert_eq!(evens.reverse().first().unwrap(), Some(Value::Int(80)));
//! ```
//!
//! # Pull Iteration
//!
//! ```
//! use lazyseq::{Kind, Seq, Value};
//!
//! let letters = Seq::keyed([("a", 1), ("b", 2)]);
//! let mut keys = letters.iterate_pull(Kind::Keys, true).unwrap();
//!
//! assert_eq!(keys.next().unwrap().unwrap(), Value::str("b"));
//! assert_eq!(keys.next().unwrap().unwrap(), Value::str("a"));
//! assert!(keys.next().is_none());
//! ```
//!
//! # Custom Sources
//!
//! Anything implementing [`Iterable`] can be wrapped with [`Seq::new`] and
//! used with every combinator. Views of unknown size are realized on demand
//! where an operation needs to know where the end is (reversing, negative
//! slice bounds).

// Re-export public API from lazyseq_core
pub use lazyseq_core::{
    Comparator, Cursor, Entries, Entry, Error, Iterable, Kind, Mapper, Memo, Predicate, Result,
    Seq, Shape, Step, Value, Visitor, Zipper,
};

// Re-export the building blocks for custom views
pub use lazyseq_core::{collections, ops, seq};
