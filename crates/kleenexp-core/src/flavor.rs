//! Target regex dialect selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// A target regular-expression engine's syntax variant.
///
/// The flavor decides named-group and backreference syntax, the string
/// anchors, and which constructs are accepted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    /// Python's `re` module syntax
    Python,
    /// ECMAScript `RegExp` syntax
    Javascript,
    /// The Rust `regex` crate: no lookarounds, no backreferences
    Rust,
    /// The Rust `fancy-regex` crate: lookarounds and backreferences allowed
    RustFancy,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flavor::Python => "python",
            Flavor::Javascript => "javascript",
            Flavor::Rust => "rust",
            Flavor::RustFancy => "rust_fancy",
        };
        write!(f, "{}", name)
    }
}
