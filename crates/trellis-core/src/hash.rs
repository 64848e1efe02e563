//! Hashers used by the runtime.
//!
//! `default` is the fast general purpose hasher used for element hash codes.
//! `stable` is deterministic across runs and platforms; identifiers derived
//! from seeds must come from it.

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    // fast branch
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

pub mod stable {
    use std::hash::{Hash, Hasher};

    pub use rustc_hash::FxHasher as StableHasher;

    #[inline]
    pub fn new() -> StableHasher {
        StableHasher::default()
    }

    /// Hashes `value` with the deterministic hasher.
    pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}
