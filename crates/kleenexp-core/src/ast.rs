//! Abstract Syntax Tree definitions
//!
//! The parser produces a tree of these nodes; the compiler consumes it once.
//! Nodes are plain values with structural equality, which the test suites
//! lean on heavily.

use serde::{Deserialize, Serialize};

/// A parsed kleenexp expression.
///
/// Macro and definition names are stored with their `#` sigil, exactly as
/// written in the source pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ast {
    /// Raw text matched verbatim
    Literal(String),

    /// Sequential composition
    Concat(Vec<Ast>),

    /// Alternation
    Either(Vec<Ast>),

    /// Local macro definition; valid only as a direct child of a `Concat`
    Def { name: String, subregex: Box<Ast> },

    /// Prefix operator application, optionally carrying a user name
    /// (e.g. a capture group name or a join separator)
    Operator {
        op_name: String,
        name: Option<String>,
        subregex: Box<Ast>,
    },

    /// Reference to a named macro, builtin or locally defined
    Macro(String),

    /// Single-character inclusive range, e.g. `#a..z`
    Range { start: char, end: char },

    /// Multi-digit integer interval, e.g. `#0..255`
    MultiRange { start: i64, end: i64 },

    /// The empty placeholder inside otherwise-empty braces
    Nothing,
}

impl Ast {
    /// Create a literal node
    pub fn literal(text: impl Into<String>) -> Self {
        Ast::Literal(text.into())
    }

    /// Create a macro reference node
    pub fn macro_(name: impl Into<String>) -> Self {
        Ast::Macro(name.into())
    }

    /// Create an operator application node
    pub fn operator(op_name: impl Into<String>, name: Option<String>, subregex: Ast) -> Self {
        Ast::Operator {
            op_name: op_name.into(),
            name,
            subregex: Box::new(subregex),
        }
    }

    /// Create a local definition node
    pub fn def(name: impl Into<String>, subregex: Ast) -> Self {
        Ast::Def {
            name: name.into(),
            subregex: Box::new(subregex),
        }
    }
}
