//! Map and set aliases used throughout the runtime.
//!
//! The fast path uses `rustc-hash`; enabling the `std-hash` feature swaps in
//! the standard library containers (useful when debugging hash-order issues).

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::hash_map::Entry;
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
    pub use std::collections::hash_map::Entry;
}
