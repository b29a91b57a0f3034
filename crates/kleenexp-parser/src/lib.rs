//! Kleenexp Parser - pattern text to AST
//!
//! This crate turns kleenexp pattern text into the AST defined in
//! `kleenexp-core`. Text outside square brackets is matched verbatim;
//! everything inside brackets is syntax: quoted literals, `#macro`
//! references, `#name=[...]` definitions, prefix operators, and `|`
//! alternation.

mod parser;

pub use kleenexp_core::ast::Ast;
pub use kleenexp_core::error::ParseError;
pub use parser::parse;

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
