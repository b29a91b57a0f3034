//! Kleenexp Core - Core types for the kleenexp pattern compiler
//!
//! This crate provides the fundamental types used across the kleenexp
//! pipeline:
//! - AST (Abstract Syntax Tree) definitions produced by the parser
//! - IR ("assembly") definitions produced by the compiler, each able to
//!   render itself to a target dialect string
//! - Target dialect (flavor) selection
//! - Error types
//! - The integer-range-to-regex algorithm used by the `NumberRange` IR node

pub mod ast;
pub mod error;
pub mod flavor;
pub mod ir;
pub mod numrange;

// Re-export commonly used types
pub use ast::Ast;
pub use error::{CompileError, Error, ParseError, Result};
pub use flavor::Flavor;
pub use ir::{assemble, ClassItem, Ir};
pub use numrange::number_range_to_regex;
