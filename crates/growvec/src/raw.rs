//! The untyped array engine.
//!
//! [`RawVec`] manages a (capacity, length, storage) triple generically over
//! an element [`Layout`] supplied per call: capacity growth, positional
//! insert with block-move shifting, and positional delete. It knows nothing
//! about element types; the typed facade [`GrowVec`](crate::GrowVec)
//! forwards here with `Layout::new::<T>()`.
//!
//! This is the only module that talks to the allocator. Every `unsafe`
//! block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr;

use crate::error::VecError;

/// Capacity used the first time a handle needs backing storage.
const MIN_CAP: u32 = 4;

/// The untyped (capacity, length, storage) triple.
///
/// Callers must pass the same element layout across all calls on one value;
/// the typed facade guarantees this. Length may cover slots the caller has
/// not written: [`ins_ptr`](Self::ins_ptr) zero-fills every slot it exposes
/// without handing the caller a pointer to it, so the byte range
/// `[0, len * elem.size())` is always initialized.
pub(crate) struct RawVec {
    /// Number of elements the backing storage can hold. Never decreases.
    cap: u32,
    /// Number of logically live elements. Always <= `cap`.
    len: u32,
    /// Backing storage of exactly `cap * elem.size()` bytes. Null while no
    /// allocation exists (`cap == 0`, or zero-sized elements throughout).
    ptr: *mut u8,
}

impl RawVec {
    /// An empty handle. Allocation-free; the first growth allocates.
    pub(crate) const fn new() -> Self {
        Self {
            cap: 0,
            len: 0,
            ptr: ptr::null_mut(),
        }
    }

    pub(crate) fn cap(&self) -> u32 {
        self.cap
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    /// Set the live-element count directly.
    ///
    /// Caller contract: `len <= cap`, and every slot in `[0, len)` has been
    /// written through a slot pointer (or zero-filled by the engine) before
    /// it is next read.
    pub(crate) fn set_len(&mut self, len: u32) {
        debug_assert!(len <= self.cap);
        self.len = len;
    }

    /// Pointer to slot `i`.
    ///
    /// While no allocation exists (or for zero-sized elements) this is a
    /// well-aligned dangling pointer, valid only for zero-size access and
    /// for conjuring dangling typed pointers in the facade.
    ///
    /// Caller contract: `i <= cap` when an allocation exists.
    pub(crate) fn slot_ptr(&self, i: u32, elem: Layout) -> *mut u8 {
        if self.ptr.is_null() || elem.size() == 0 {
            elem.align() as *mut u8
        } else {
            // SAFETY: i <= cap (caller contract), so the offset stays within
            // the cap * elem.size() byte allocation.
            unsafe { self.ptr.add(elem.size() * i as usize) }
        }
    }

    /// Guarantee `cap >= c`, growing the backing storage if needed.
    ///
    /// Growth starts at [`MIN_CAP`] and doubles until sufficient, then
    /// performs a single reallocation. No-op if the capacity already
    /// suffices. On failure the handle is left exactly as it was; the old
    /// allocation is untouched by a failed `realloc`.
    pub(crate) fn ensure_cap(&mut self, c: u32, elem: Layout) -> Result<(), VecError> {
        if c <= self.cap {
            return Ok(());
        }
        if elem.size() == 0 {
            // Zero-sized elements never need storage.
            self.cap = u32::MAX;
            return Ok(());
        }

        let mut cap = self.cap.max(MIN_CAP);
        while cap < c {
            cap = cap.saturating_mul(2);
        }

        let new_size = (cap as usize).saturating_mul(elem.size());
        // Rejects sizes that overflow isize when rounded up to alignment:
        // such a request can never be satisfied.
        let new_layout = Layout::from_size_align(new_size, elem.align())
            .map_err(|_| VecError::AllocFailed { requested: new_size })?;

        let new_ptr = if self.ptr.is_null() {
            // SAFETY: new_layout has non-zero size (elem.size() > 0 and
            // cap >= MIN_CAP).
            unsafe { alloc::alloc(new_layout) }
        } else {
            // SAFETY: ptr was allocated by this allocator with exactly
            // (cap * elem.size(), elem.align()), which was a valid layout
            // when the allocation was made.
            let old_layout = unsafe {
                Layout::from_size_align_unchecked(self.cap as usize * elem.size(), elem.align())
            };
            // SAFETY: old_layout matches the live allocation and new_size
            // was validated by Layout::from_size_align above.
            unsafe { alloc::realloc(self.ptr, old_layout, new_size) }
        };

        if new_ptr.is_null() {
            return Err(VecError::AllocFailed { requested: new_size });
        }
        self.cap = cap;
        self.ptr = new_ptr;
        Ok(())
    }

    /// Guarantee room for `extra` elements beyond the current length.
    pub(crate) fn ensure_fit(&mut self, extra: u32, elem: Layout) -> Result<(), VecError> {
        self.ensure_cap(self.len.saturating_add(extra), elem)
    }

    /// Open a slot at index `i`, growing the length, and return a pointer
    /// to it.
    ///
    /// - `i < len`: elements in `[i, len)` shift one slot right via a single
    ///   block move; the returned slot holds the stale bytes of the element
    ///   previously at `i`.
    /// - `i >= len`: the length jumps to `i + 1`; the skipped slots in
    ///   `[len, i]` (the returned one included) are zero-filled.
    ///
    /// Either way the slot's contents are unspecified; the caller is
    /// expected to overwrite them. Fails only if the required growth fails,
    /// in which case nothing was mutated.
    pub(crate) fn ins_ptr(&mut self, i: u32, elem: Layout) -> Result<*mut u8, VecError> {
        let s = elem.size();
        if i < self.len {
            self.ensure_fit(1, elem)?;
            if s > 0 {
                // SAFETY: cap >= len + 1 after ensure_fit, so both the
                // source range [i, len) and its right-shifted image lie
                // within the allocation.
                unsafe {
                    let src = self.ptr.add(s * i as usize);
                    let dst = src.add(s);
                    ptr::copy(src, dst, s * (self.len - i) as usize);
                }
            }
            self.len += 1;
        } else {
            // An index of u32::MAX asks for u32::MAX + 1 elements, which
            // no capacity can represent; report the byte size that growth
            // would have requested.
            let needed = i.checked_add(1).ok_or(VecError::AllocFailed {
                requested: (i as usize).saturating_add(1).saturating_mul(s),
            })?;
            self.ensure_cap(needed, elem)?;
            if s > 0 {
                // Slots in [len, i] become live without the caller writing
                // them through a returned pointer; zero-fill so reads over
                // the live range never observe uninitialized memory.
                //
                // SAFETY: cap >= i + 1 after ensure_cap, so the byte range
                // [len * s, (i + 1) * s) lies within the allocation.
                unsafe {
                    let start = self.ptr.add(s * self.len as usize);
                    ptr::write_bytes(start, 0, s * (needed - self.len) as usize);
                }
            }
            self.len = needed;
        }
        Ok(self.slot_ptr(i, elem))
    }

    /// Remove the element at index `i`, shifting later elements one slot
    /// left via a single block move. Order-preserving.
    ///
    /// Fails with [`VecError::OutOfBounds`] (no mutation) if `i >= len`.
    /// The element that was logically last remains as stale bytes in
    /// now-unused capacity; it is not cleared.
    pub(crate) fn del(&mut self, i: u32, elem: Layout) -> Result<(), VecError> {
        if i >= self.len {
            return Err(VecError::OutOfBounds {
                index: i,
                len: self.len,
            });
        }
        self.len -= 1;
        if i < self.len {
            let s = elem.size();
            if s > 0 {
                // SAFETY: i < len < cap, so the source range (i, old_len)
                // and its left-shifted image lie within the allocation.
                unsafe {
                    let dst = self.ptr.add(s * i as usize);
                    let src = dst.add(s);
                    ptr::copy(src, dst, s * (self.len - i) as usize);
                }
            }
        }
        Ok(())
    }

    /// Release the backing storage and return to the empty state.
    ///
    /// Elements are plain bytes to this layer; nothing is dropped. Called
    /// exactly once, from the typed facade's `Drop`.
    pub(crate) fn dealloc(&mut self, elem: Layout) {
        if !self.ptr.is_null() {
            // SAFETY: ptr was allocated by this allocator with exactly
            // (cap * elem.size(), elem.align()), the invariant ensure_cap
            // maintains.
            unsafe {
                let layout = Layout::from_size_align_unchecked(
                    self.cap as usize * elem.size(),
                    elem.align(),
                );
                alloc::dealloc(self.ptr, layout);
            }
            self.ptr = ptr::null_mut();
        }
        self.cap = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U32: Layout = Layout::new::<u32>();

    fn write_u32(v: &RawVec, i: u32, x: u32) {
        unsafe { v.slot_ptr(i, U32).cast::<u32>().write(x) }
    }

    fn read_u32(v: &RawVec, i: u32) -> u32 {
        unsafe { v.slot_ptr(i, U32).cast::<u32>().read() }
    }

    #[test]
    fn starts_empty_without_allocating() {
        let v = RawVec::new();
        assert_eq!(v.cap(), 0);
        assert_eq!(v.len(), 0);
        assert!(v.ptr.is_null());
    }

    #[test]
    fn first_growth_uses_minimum_threshold() {
        let mut v = RawVec::new();
        v.ensure_cap(1, U32).unwrap();
        assert_eq!(v.cap(), MIN_CAP);
        v.dealloc(U32);
    }

    #[test]
    fn growth_doubles_until_sufficient() {
        let mut v = RawVec::new();
        v.ensure_cap(5, U32).unwrap();
        assert_eq!(v.cap(), 8);
        v.ensure_cap(100, U32).unwrap();
        assert_eq!(v.cap(), 128);
        v.dealloc(U32);
    }

    #[test]
    fn ensure_cap_is_noop_when_satisfied() {
        let mut v = RawVec::new();
        v.ensure_cap(8, U32).unwrap();
        let before = v.ptr;
        v.ensure_cap(3, U32).unwrap();
        assert_eq!(v.cap(), 8);
        assert_eq!(v.ptr, before);
        v.dealloc(U32);
    }

    #[test]
    fn ensure_fit_counts_from_length() {
        let mut v = RawVec::new();
        v.ins_ptr(2, U32).unwrap(); // len = 3
        v.ensure_fit(10, U32).unwrap();
        assert!(v.cap() >= 13);
        v.dealloc(U32);
    }

    #[test]
    fn slot_writes_are_readable_in_place() {
        let mut v = RawVec::new();
        v.ins_ptr(0, U32).unwrap();
        write_u32(&v, 0, 42);
        assert_eq!(read_u32(&v, 0), 42);
        v.dealloc(U32);
    }

    #[test]
    fn insert_mid_shifts_right() {
        let mut v = RawVec::new();
        for i in 0..3 {
            unsafe { v.ins_ptr(i, U32).unwrap().cast::<u32>().write(i * 10) };
        }
        unsafe { v.ins_ptr(1, U32).unwrap().cast::<u32>().write(99) };
        assert_eq!(v.len(), 4);
        assert_eq!(read_u32(&v, 0), 0);
        assert_eq!(read_u32(&v, 1), 99);
        assert_eq!(read_u32(&v, 2), 10);
        assert_eq!(read_u32(&v, 3), 20);
        v.dealloc(U32);
    }

    #[test]
    fn insert_beyond_length_extends_and_zero_fills() {
        let mut v = RawVec::new();
        let p = v.ins_ptr(5, U32).unwrap();
        unsafe { p.cast::<u32>().write(321) };
        assert_eq!(v.len(), 6);
        assert!(v.cap() >= 6);
        for i in 0..5 {
            assert_eq!(read_u32(&v, i), 0);
        }
        assert_eq!(read_u32(&v, 5), 321);
        v.dealloc(U32);
    }

    #[test]
    fn delete_mid_shifts_left() {
        let mut v = RawVec::new();
        for i in 0..4 {
            unsafe { v.ins_ptr(i, U32).unwrap().cast::<u32>().write(i) };
        }
        v.del(1, U32).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(read_u32(&v, 0), 0);
        assert_eq!(read_u32(&v, 1), 2);
        assert_eq!(read_u32(&v, 2), 3);
        v.dealloc(U32);
    }

    #[test]
    fn delete_last_only_decrements() {
        let mut v = RawVec::new();
        unsafe { v.ins_ptr(0, U32).unwrap().cast::<u32>().write(7) };
        v.del(0, U32).unwrap();
        assert_eq!(v.len(), 0);
        // The bytes remain in unused capacity until overwritten.
        assert_eq!(read_u32(&v, 0), 7);
        v.dealloc(U32);
    }

    #[test]
    fn delete_out_of_range_fails_without_mutation() {
        let mut v = RawVec::new();
        unsafe { v.ins_ptr(0, U32).unwrap().cast::<u32>().write(1) };
        let err = v.del(1, U32).unwrap_err();
        assert_eq!(err, VecError::OutOfBounds { index: 1, len: 1 });
        assert_eq!(v.len(), 1);
        assert_eq!(read_u32(&v, 0), 1);
        v.dealloc(U32);
    }

    #[test]
    fn unrepresentable_index_reports_requested_bytes() {
        let mut v = RawVec::new();
        let err = v.ins_ptr(u32::MAX, U32).unwrap_err();
        let expected = (u32::MAX as usize).saturating_add(1).saturating_mul(4);
        assert_eq!(err, VecError::AllocFailed { requested: expected });
        assert_eq!(v.len(), 0);
        assert_eq!(v.cap(), 0);
    }

    #[test]
    fn capacity_never_decreases() {
        let mut v = RawVec::new();
        v.ensure_cap(64, U32).unwrap();
        for i in 0..10 {
            unsafe { v.ins_ptr(i, U32).unwrap().cast::<u32>().write(i) };
        }
        while v.len() > 0 {
            v.del(0, U32).unwrap();
        }
        assert_eq!(v.cap(), 64);
        v.dealloc(U32);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        const ZST: Layout = Layout::new::<()>();
        let mut v = RawVec::new();
        v.ensure_cap(10, ZST).unwrap();
        assert_eq!(v.cap(), u32::MAX);
        assert!(v.ptr.is_null());
        v.ins_ptr(0, ZST).unwrap();
        v.ins_ptr(5, ZST).unwrap();
        assert_eq!(v.len(), 6);
        v.del(2, ZST).unwrap();
        assert_eq!(v.len(), 5);
        v.dealloc(ZST);
    }
}
