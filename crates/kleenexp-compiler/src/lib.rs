//! Kleenexp Compiler - AST to assembly IR
//!
//! This crate lowers the parser's AST into the assembly IR defined in
//! `kleenexp-core`. It owns the two builtin registries: the macro table
//! (`#digit`, `#integer`, short aliases, derived `#not_*` inverses) and
//! the operator table (`capture`, `not`, `join`, lookarounds, inline
//! flags, numeric repetitions).

pub mod compiler;
pub mod macros;
pub mod operators;

pub use compiler::compile;
pub use macros::MacroTable;
pub use operators::OpKind;
