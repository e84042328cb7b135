//! Zero-validity marker for element types.
//!
//! The engine zero-fills slots that become live without the caller writing
//! them (the gap of an extending insert, the fresh slot returned by the
//! slot operations). Those slots are reachable through safe reads
//! immediately, so the operations that create them are bounded on
//! [`ZeroValid`]: the type-level promise that zero bytes form a valid
//! value. The `unsafe impl`s below are the only unsafe code in this module.

#![allow(unsafe_code)]

/// Marker for element types whose all-zero byte pattern is a valid value.
///
/// Required by [`GrowVec::push_slot`](crate::GrowVec::push_slot),
/// [`GrowVec::insert_slot`](crate::GrowVec::insert_slot), and
/// [`GrowVec::insert`](crate::GrowVec::insert), the operations that can
/// surface engine-zeroed slots to the caller. Types with niche
/// bit-patterns (references, `NonZero*` integers) do not implement it and
/// keep the rest of the API:
///
/// ```compile_fail
/// use growvec::GrowVec;
/// use std::num::NonZeroU32;
///
/// let mut v: GrowVec<NonZeroU32> = GrowVec::new();
/// v.insert(5, NonZeroU32::new(321).unwrap()); // NonZeroU32 is not ZeroValid
/// ```
///
/// # Safety
///
/// Implementors must guarantee that a value of the type consisting
/// entirely of zero bytes is valid.
pub unsafe trait ZeroValid: Copy {}

macro_rules! impl_zero_valid {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: the all-zero pattern is a valid value of this type.
            unsafe impl ZeroValid for $t {}
        )*
    };
}

impl_zero_valid!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

// SAFETY: null is a valid raw pointer value.
unsafe impl<T> ZeroValid for *const T {}
// SAFETY: null is a valid raw pointer value.
unsafe impl<T> ZeroValid for *mut T {}

// SAFETY: every element of the all-zero array is itself zero-valid.
unsafe impl<T: ZeroValid, const N: usize> ZeroValid for [T; N] {}

macro_rules! impl_zero_valid_tuple {
    ($($name:ident)+) => {
        // SAFETY: every field of the all-zero tuple is itself zero-valid.
        unsafe impl<$($name: ZeroValid),+> ZeroValid for ($($name,)+) {}
    };
}

impl_zero_valid_tuple!(A);
impl_zero_valid_tuple!(A B);
impl_zero_valid_tuple!(A B C);
impl_zero_valid_tuple!(A B C D);
