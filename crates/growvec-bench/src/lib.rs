//! Shared fixtures for the growvec benchmarks.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use growvec::GrowVec;

/// Build a vector holding `0..n` without intermediate reallocations.
pub fn filled(n: u32) -> GrowVec<u32> {
    let mut v = GrowVec::new();
    v.ensure_capacity(n).expect("bench allocation");
    for i in 0..n {
        v.push(i).expect("capacity was pre-ensured");
    }
    v
}
