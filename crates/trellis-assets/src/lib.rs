//! Asset loading and management primitives for Trellis.
//!
//! Only fonts are managed: the collection keeps the raw bytes for a future
//! renderer and reads the handful of metrics layout needs. Missing or
//! unreadable fonts degrade to built-in metrics with a warning.

mod error;
mod fonts;

pub use error::AssetError;
pub use fonts::{FontCollection, FontMetrics};
