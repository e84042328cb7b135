//! The typed specialization layer.
//!
//! [`GrowVec<T>`] is a compile-time-generic facade over the untyped engine
//! in [`raw`](crate::raw). It computes the element layout once, forwards
//! every operation, and casts engine slot pointers back to `T`. It contains
//! no growth or shift logic of its own.
//!
//! The `unsafe` blocks here are the slot-pointer casts over pointers the
//! engine has already validated; each carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::slice;

use crate::error::VecError;
use crate::raw::RawVec;
use crate::zero::ZeroValid;

/// A growable array with explicit capacity control and fallible allocation.
///
/// The handle starts empty without allocating ([`GrowVec::new`] is `const`).
/// Growth is geometric: the first allocation holds 4 elements, then the
/// capacity doubles until the request fits. The capacity never shrinks.
/// All fallible operations report failure through [`VecError`] or `None`
/// and leave the handle untouched; nothing in the operation API panics.
///
/// Elements must be [`Copy`]: removal never runs destructors, so types with
/// drop glue have no place here. Removed elements simply become stale bytes
/// in unused capacity.
///
/// Slots handed out by [`push_slot`](Self::push_slot) and
/// [`insert_slot`](Self::insert_slot), and any slots skipped over by an
/// insert beyond the current length, hold unspecified (stale or zeroed)
/// values until overwritten. The operations that create such slots are
/// bounded on [`ZeroValid`], so a zeroed slot is always a valid value of
/// the element type; types with niche bit-patterns (references, `NonZero*`
/// integers) keep the rest of the API.
///
/// ```
/// # fn main() -> Result<(), growvec::VecError> {
/// use growvec::GrowVec;
///
/// let mut v: GrowVec<u32> = GrowVec::new();
/// v.push(7)?;
/// v.insert(0, 3)?;
/// assert_eq!(v.as_slice(), &[3, 7]);
/// assert_eq!(v.pop(), Some(&7));
/// # Ok(())
/// # }
/// ```
pub struct GrowVec<T: Copy> {
    raw: RawVec,
    _marker: PhantomData<T>,
}

impl<T: Copy> GrowVec<T> {
    const ELEM: Layout = Layout::new::<T>();

    /// An empty handle. No allocation happens until the first growth.
    pub const fn new() -> Self {
        Self {
            raw: RawVec::new(),
            _marker: PhantomData,
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> u32 {
        self.raw.len()
    }

    /// Number of elements the backing storage can hold without reallocating.
    pub fn capacity(&self) -> u32 {
        self.raw.cap()
    }

    /// `true` if no elements are live.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the engine keeps every byte of [0, len) initialized (slot
        // zero-fill in ins_ptr), and slot_ptr(0) is the allocation base or
        // an aligned dangling pointer when len == 0.
        unsafe { slice::from_raw_parts(self.base(), self.raw.len() as usize) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for as_slice; &mut self gives exclusive access.
        unsafe { slice::from_raw_parts_mut(self.base(), self.raw.len() as usize) }
    }

    /// Raw pointer to the backing storage (dangling while unallocated).
    pub fn as_ptr(&self) -> *const T {
        self.base()
    }

    /// Borrow the element at `index`, or `None` past the length.
    pub fn get(&self, index: u32) -> Option<&T> {
        self.as_slice().get(index as usize)
    }

    /// Mutably borrow the element at `index`, or `None` past the length.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index as usize)
    }

    /// Guarantee capacity for at least `count` elements.
    ///
    /// No-op when already satisfied; otherwise grows with a single
    /// reallocation. On failure the handle is unchanged.
    pub fn ensure_capacity(&mut self, count: u32) -> Result<(), VecError> {
        self.raw.ensure_cap(count, Self::ELEM)
    }

    /// Guarantee capacity for `extra` elements beyond the current length.
    pub fn ensure_fit(&mut self, extra: u32) -> Result<(), VecError> {
        self.raw.ensure_fit(extra, Self::ELEM)
    }

    /// Append `value`. On failure nothing is written and nothing grows.
    pub fn push(&mut self, value: T) -> Result<(), VecError> {
        self.raw.ensure_fit(1, Self::ELEM)?;
        let len = self.raw.len();
        // SAFETY: cap >= len + 1 after ensure_fit; the slot at len is a
        // valid, exclusively-owned element-sized position.
        unsafe { self.raw.slot_ptr(len, Self::ELEM).cast::<T>().write(value) };
        self.raw.set_len(len + 1);
        Ok(())
    }

    /// Exclude the last element and return a borrow of it.
    ///
    /// Returns `None` when empty. The borrow is a read window into memory
    /// the container still owns; no copy is made. The bytes stay valid
    /// until the next mutating call overwrites them, and the borrow checker
    /// confines the window to exactly that span.
    pub fn pop(&mut self) -> Option<&T> {
        let len = self.raw.len();
        if len == 0 {
            return None;
        }
        self.raw.set_len(len - 1);
        // SAFETY: the slot at len - 1 is within the allocation and still
        // holds the element's bytes; only a future &mut call may touch it.
        Some(unsafe { &*self.raw.slot_ptr(len - 1, Self::ELEM).cast::<T>() })
    }

    /// Remove the element at `index`, shifting later elements left.
    /// Order-preserving, O(n). Fails (no mutation) if `index >= len`.
    pub fn delete(&mut self, index: u32) -> Result<(), VecError> {
        self.raw.del(index, Self::ELEM)
    }

    /// Remove the element at `index` by moving the last element into its
    /// place. O(1), does not preserve order. Fails (no mutation) if
    /// `index >= len`.
    pub fn delete_swap(&mut self, index: u32) -> Result<(), VecError> {
        let len = self.raw.len();
        if index >= len {
            return Err(VecError::OutOfBounds { index, len });
        }
        let last = len - 1;
        if index < last {
            let s = self.as_mut_slice();
            s[index as usize] = s[last as usize];
        }
        self.raw.set_len(last);
        Ok(())
    }

    fn base(&self) -> *mut T {
        self.raw.slot_ptr(0, Self::ELEM).cast()
    }
}

/// Operations that can surface engine-zeroed slots to the caller: the slot
/// they hand out (or skip over) must already be a valid `T`, which is what
/// the [`ZeroValid`] bound guarantees.
impl<T: ZeroValid> GrowVec<T> {
    /// Append an element slot and return it for in-place construction.
    ///
    /// The slot holds an unspecified (zeroed) value; overwrite it before
    /// reading. Returns `None` (no mutation) if growth fails.
    pub fn push_slot(&mut self) -> Option<&mut T> {
        let len = self.raw.len();
        let p = self.raw.ins_ptr(len, Self::ELEM).ok()?;
        // SAFETY: ins_ptr returned a valid, zero-filled slot inside the
        // allocation, now covered by len; zero bytes are a valid T.
        Some(unsafe { &mut *p.cast::<T>() })
    }

    /// Open a slot at `index` and return it for in-place construction.
    ///
    /// With `index < len`, elements from `index` onward shift one position
    /// right and the slot holds the stale previous occupant. With
    /// `index >= len`, the length jumps to `index + 1` and the skipped
    /// slots (this one included) are zero-filled. Overwrite the slot before
    /// reading it. Fails only if growth fails, in which case nothing was
    /// mutated.
    pub fn insert_slot(&mut self, index: u32) -> Result<&mut T, VecError> {
        let p = self.raw.ins_ptr(index, Self::ELEM)?;
        // SAFETY: ins_ptr returned a valid slot inside the allocation,
        // covered by the new length; its bytes are a stale former element
        // or zero-fill, both valid T.
        Ok(unsafe { &mut *p.cast::<T>() })
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// Inserting beyond the current length extends the array; see
    /// [`insert_slot`](Self::insert_slot). On failure nothing is written.
    pub fn insert(&mut self, index: u32, value: T) -> Result<(), VecError> {
        *self.insert_slot(index)? = value;
        Ok(())
    }
}

impl<T: Copy> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Drop for GrowVec<T> {
    fn drop(&mut self) {
        // Elements are Copy and never individually dropped; only the
        // backing storage is released, exactly once.
        self.raw.dealloc(Self::ELEM);
    }
}

// SAFETY: the handle exclusively owns its allocation; the raw pointer never
// aliases another handle, so moving or sharing the handle across threads is
// exactly as safe as doing so with the elements themselves.
unsafe impl<T: Copy + Send> Send for GrowVec<T> {}
// SAFETY: as above; &GrowVec<T> only permits reads of T.
unsafe impl<T: Copy + Sync> Sync for GrowVec<T> {}

impl<T: Copy + fmt::Debug> fmt::Debug for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Copy> Index<u32> for GrowVec<T> {
    type Output = T;

    fn index(&self, index: u32) -> &T {
        &self.as_slice()[index as usize]
    }
}

impl<T: Copy> IndexMut<u32> for GrowVec<T> {
    fn index_mut(&mut self, index: u32) -> &mut T {
        &mut self.as_mut_slice()[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty_and_unallocated() {
        let v: GrowVec<u64> = GrowVec::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.is_empty());
        assert_eq!(v.as_slice(), &[] as &[u64]);
    }

    #[test]
    fn push_then_index() {
        let mut v = GrowVec::new();
        v.push(10u32).unwrap();
        v.push(20).unwrap();
        assert_eq!(v[0], 10);
        assert_eq!(v[1], 20);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn push_slot_writes_in_place() {
        let mut v: GrowVec<u32> = GrowVec::new();
        *v.push_slot().unwrap() = 5;
        *v.push_slot().unwrap() = 6;
        assert_eq!(v.as_slice(), &[5, 6]);
    }

    #[test]
    fn pop_is_a_read_window_not_a_copy() {
        let mut v = GrowVec::new();
        v.push(1u8).unwrap();
        v.push(2).unwrap();
        assert_eq!(v.pop(), Some(&2));
        assert_eq!(v.len(), 1);
        // The excluded byte is still present in unused capacity.
        assert!(v.capacity() >= 2);
    }

    #[test]
    fn insert_slot_mid_holds_stale_value() {
        let mut v = GrowVec::new();
        v.push(1u32).unwrap();
        v.push(2).unwrap();
        let slot = v.insert_slot(0).unwrap();
        assert_eq!(*slot, 1); // stale bytes of the former occupant
        *slot = 9;
        assert_eq!(v.as_slice(), &[9, 1, 2]);
    }

    #[test]
    fn delete_swap_relocates_last() {
        let mut v = GrowVec::new();
        for i in 0..4u32 {
            v.push(i).unwrap();
        }
        v.delete_swap(1).unwrap();
        assert_eq!(v.as_slice(), &[0, 3, 2]);
    }

    #[test]
    fn delete_swap_on_last_index_just_shrinks() {
        let mut v = GrowVec::new();
        v.push(1u32).unwrap();
        v.push(2).unwrap();
        v.delete_swap(1).unwrap();
        assert_eq!(v.as_slice(), &[1]);
    }

    #[test]
    fn get_past_length_is_none() {
        let mut v = GrowVec::new();
        v.push(1i64).unwrap();
        assert_eq!(v.get(0), Some(&1));
        assert_eq!(v.get(1), None);
    }

    #[test]
    fn debug_formats_as_list() {
        let mut v = GrowVec::new();
        v.push(1u8).unwrap();
        v.push(2).unwrap();
        assert_eq!(format!("{v:?}"), "[1, 2]");
    }

    #[test]
    fn handles_are_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<GrowVec<u32>>();
    }

    #[test]
    fn zero_sized_elements_work() {
        let mut v: GrowVec<()> = GrowVec::new();
        v.push(()).unwrap();
        v.push(()).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.pop(), Some(&()));
        v.delete(0).unwrap();
        assert!(v.is_empty());
    }
}
