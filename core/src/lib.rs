#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![deny(unsafe_code)]

// Needed so that doc examples and integration tests can uniformly refer to
// `::lazyseq_core` from within this crate or a different one.
extern crate self as lazyseq_core;

// This works on std and no_std and is harmless.
extern crate alloc;

// Exports some symbols publicly so that downstream crates can name the same
// allocation types the engine uses.
#[doc(hidden)]
pub mod shim {
    pub use alloc::{boxed::Box, format, rc::Rc, string::String, string::ToString, vec, vec::Vec};
}

// Re-export (crate only) for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use shim::*;

pub mod collections;
pub mod error;
pub mod ops;
pub mod seq;
pub mod value;

pub use error::{Error, Result};
pub use ops::{Comparator, Mapper, Predicate, Zipper};
pub use seq::{Cursor, Entries, Entry, Iterable, Kind, Memo, Seq, Shape, Step, Visitor};
pub use value::Value;
