//! Testing utilities and harness for Trellis

pub mod harness;

pub use harness::*;

pub mod prelude {
    pub use crate::harness::{HarnessError, TestHarness};
}
