//! Manually managed growable array with explicit capacity control.
//!
//! `growvec` provides [`GrowVec<T>`], a contiguous, C-array-equivalent
//! container for `Copy` elements with ergonomic push/pop/insert/delete
//! operations and fully fallible allocation: growth failures come back as
//! [`VecError`] values, never as panics or aborts.
//!
//! # Architecture
//!
//! Two layers, one algorithm:
//!
//! ```text
//! GrowVec<T>   (vec.rs)   typed facade: computes Layout::new::<T>(),
//!   |                     forwards, casts slot pointers back to T
//!   v
//! RawVec       (raw.rs)   untyped engine: (capacity, length, storage)
//!                         triple over an explicit element layout:
//!                         growth policy, block-move insert/delete
//! ```
//!
//! The engine is private; callers only ever see the type-safe facade. A
//! single generic instantiation per element type replaces per-type source
//! duplication while keeping identical operation semantics.
//!
//! Operations that can surface engine-zeroed slots (`push_slot`,
//! `insert_slot`, extending `insert`) are bounded on [`ZeroValid`], the
//! marker for element types whose all-zero byte pattern is a valid value.
//!
//! # Capacity policy
//!
//! A handle starts empty with no allocation. The first growth allocates 4
//! elements, after which the capacity doubles until the request fits, with
//! one reallocation per growth. Capacity never decreases; the allocation is
//! released when the handle is dropped.
//!
//! # What this is not
//!
//! No iterators beyond slice access, no destructors on removal (elements
//! are `Copy`), no internal locking (use `&mut` exclusivity or an external
//! lock), no shrinking, no sorting or searching.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
mod raw;
pub mod vec;
pub mod zero;

pub use error::VecError;
pub use vec::GrowVec;
pub use zero::ZeroValid;
