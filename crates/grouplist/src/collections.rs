//! Hash map aliases used by the engine.
//!
//! Lookups keyed by [`ViewId`](crate::ViewId), [`ViewType`](crate::ViewType) and
//! [`RowIndex`](crate::RowIndex) are small integer keys, so the Fx hasher is the
//! default. Enable the `std-hash` feature to fall back to SipHash.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;

    #[inline]
    pub fn with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
        HashMap::with_capacity(capacity)
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashMap as HashMap;

    #[inline]
    pub fn with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
        HashMap::with_capacity_and_hasher(capacity, Default::default())
    }
}
