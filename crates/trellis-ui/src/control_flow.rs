//! Control-flow combinators that scope identity.
//!
//! Each combinator pushes a deterministic key prefix before running its
//! body, so identifiers and state keys of different branches, iterations or
//! keys never collide.

use std::fmt::Display;

use crate::composer::Composer;

pub const IF_TRUE: &str = "_if_true";
pub const IF_FALSE: &str = "_if_false";

impl Composer<'_> {
    /// Runs `if_true` or `if_false`; only the chosen branch executes.
    pub fn if_else(
        &mut self,
        condition: bool,
        if_true: impl FnOnce(&mut Self),
        if_false: impl FnOnce(&mut Self),
    ) -> &mut Self {
        if condition {
            self.key_prefix(IF_TRUE, if_true);
        } else {
            self.key_prefix(IF_FALSE, if_false);
        }
        self
    }

    /// Runs `body` when `condition` holds.
    pub fn when(&mut self, condition: bool, body: impl FnOnce(&mut Self)) -> &mut Self {
        if condition {
            self.key_prefix(IF_TRUE, body);
        }
        self
    }

    /// Runs `body` when `condition` does not hold; the inverse of [`when`](Self::when).
    pub fn otherwise(&mut self, condition: bool, body: impl FnOnce(&mut Self)) -> &mut Self {
        if !condition {
            self.key_prefix(IF_FALSE, body);
        }
        self
    }

    /// Runs `make(i)` for `i` in `0..count`, each under its own prefix.
    pub fn range(&mut self, count: usize, mut make: impl FnMut(&mut Self, usize)) -> &mut Self {
        for index in 0..count {
            self.key_prefix(&format!("_i_{index}"), |composer| make(composer, index));
        }
        self
    }

    /// Runs `body` under a prefix derived from `key`, so its identity follows
    /// the key rather than the source position.
    pub fn key(&mut self, key: impl Display, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.key_prefix(&format!("_key_{key}"), body);
        self
    }
}

#[cfg(test)]
#[path = "tests/control_flow_tests.rs"]
mod tests;
