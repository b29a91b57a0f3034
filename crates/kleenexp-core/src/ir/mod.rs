//! Intermediate "assembly" representation
//!
//! The IR is the tree the compiler lowers the AST into. Each node owns its
//! children exclusively and knows how to render itself to a dialect string
//! (see [`assemble`]). Nodes are plain values with structural equality.

mod assemble;

pub use assemble::assemble;

use crate::error::CompileError;
use crate::flavor::Flavor;
use serde::{Deserialize, Serialize};

/// One member of a character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassItem {
    /// A single character, escaped as needed for class context
    Char(char),
    /// An inclusive character range, rendered as `a-b`
    Range(char, char),
    /// A raw engine escape carried verbatim, e.g. `\d` or `\u2028`
    Shorthand(String),
}

/// An assembly node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ir {
    /// Verbatim text; metacharacters are escaped at render time
    Literal(String),

    /// Sequential composition
    Concat(Vec<Ir>),

    /// Alternation, rendered with `|`
    Either(Vec<Ir>),

    /// Repetition. `max: None` means unbounded.
    Multiple {
        min: u32,
        max: Option<u32>,
        greedy: bool,
        sub: Box<Ir>,
    },

    /// A character class; `inverted` renders as `[^...]`
    CharacterClass {
        items: Vec<ClassItem>,
        inverted: bool,
    },

    /// A zero-width boundary marker. `reverse` is the marker of the
    /// inverted boundary, when one exists.
    Boundary {
        marker: String,
        reverse: Option<String>,
    },

    /// A capture group, optionally named
    Capture { name: Option<String>, sub: Box<Ir> },

    /// Zero-width assertion that `sub` matches ahead
    Lookahead(Box<Ir>),
    /// Zero-width assertion that `sub` does not match ahead
    NegativeLookahead(Box<Ir>),
    /// Zero-width assertion that `sub` matches behind
    Lookbehind(Box<Ir>),
    /// Zero-width assertion that `sub` does not match behind
    NegativeLookbehind(Box<Ir>),

    /// A scoped inline flag such as `(?i:...)` or `(?-i:...)`. Chains of
    /// nested flags over the same body collapse into one group header.
    InlineFlag {
        letter: char,
        unset: bool,
        sub: Box<Ir>,
    },

    /// Global flags attached once at the root, e.g. `(?ms)`. An empty flag
    /// string renders to nothing.
    Setting { flags: String, sub: Box<Ir> },

    /// A backreference to a previous capture group, by name or by 1-based
    /// index, resolved at render time
    Repeat(String),

    /// An integer interval, lowered to an alternation at render time
    NumberRange { start: u64, end: u64 },
}

impl Ir {
    /// The empty literal, which renders to nothing
    pub fn empty() -> Ir {
        Ir::Literal(String::new())
    }

    /// Structurally empty nodes render to nothing and are dropped from
    /// concatenations.
    pub fn is_empty(&self) -> bool {
        match self {
            Ir::Literal(s) => s.is_empty(),
            Ir::Concat(items) => items.is_empty(),
            Ir::Multiple { max: Some(0), .. } => true,
            _ => false,
        }
    }

    /// Invert this node, if it has an inversion: character classes toggle,
    /// boundaries with a defined reverse swap markers, lookarounds toggle
    /// polarity. Everything else is an error naming the rendered form.
    pub fn invert(self) -> Result<Ir, CompileError> {
        match self {
            Ir::CharacterClass { items, inverted } => Ok(Ir::CharacterClass {
                items,
                inverted: !inverted,
            }),
            Ir::Boundary {
                marker,
                reverse: Some(reverse),
            } => Ok(Ir::Boundary {
                marker: reverse,
                reverse: Some(marker),
            }),
            Ir::Lookahead(sub) => Ok(Ir::NegativeLookahead(sub)),
            Ir::NegativeLookahead(sub) => Ok(Ir::Lookahead(sub)),
            Ir::Lookbehind(sub) => Ok(Ir::NegativeLookbehind(sub)),
            Ir::NegativeLookbehind(sub) => Ok(Ir::Lookbehind(sub)),
            other => {
                let rendered = assemble(&other, Flavor::Python)
                    .unwrap_or_else(|_| format!("{:?}", other));
                Err(CompileError::NotInvertible(rendered))
            }
        }
    }

    fn class(items: Vec<ClassItem>) -> Ir {
        Ir::CharacterClass {
            items,
            inverted: false,
        }
    }

    fn boundary(marker: &str, reverse: Option<&str>) -> Ir {
        Ir::Boundary {
            marker: marker.to_string(),
            reverse: reverse.map(str::to_string),
        }
    }

    /// Any character except a line terminator (`.`)
    pub fn any() -> Ir {
        Ir::CharacterClass {
            items: Vec::new(),
            inverted: true,
        }
    }

    /// Any single line-terminator character, Unicode ones included
    pub fn newline_character() -> Ir {
        Ir::class(vec![
            ClassItem::Shorthand(r"\r".to_string()),
            ClassItem::Shorthand(r"\n".to_string()),
            ClassItem::Shorthand(r"\u2028".to_string()),
            ClassItem::Shorthand(r"\u2029".to_string()),
        ])
    }

    pub fn linefeed() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\n".to_string())])
    }

    pub fn carriage_return() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\r".to_string())])
    }

    pub fn tab() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\t".to_string())])
    }

    pub fn digit() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\d".to_string())])
    }

    pub fn letter() -> Ir {
        Ir::class(vec![
            ClassItem::Range('a', 'z'),
            ClassItem::Range('A', 'Z'),
        ])
    }

    pub fn lowercase() -> Ir {
        Ir::class(vec![ClassItem::Range('a', 'z')])
    }

    pub fn uppercase() -> Ir {
        Ir::class(vec![ClassItem::Range('A', 'Z')])
    }

    pub fn space() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\s".to_string())])
    }

    pub fn token_character() -> Ir {
        Ir::class(vec![ClassItem::Shorthand(r"\w".to_string())])
    }

    pub fn start_line() -> Ir {
        Ir::boundary("^", None)
    }

    pub fn end_line() -> Ir {
        Ir::boundary("$", None)
    }

    pub fn start_string() -> Ir {
        Ir::boundary(r"\A", None)
    }

    /// End of string. The exact semantics are dialect-dependent: Python's
    /// `\Z` is strict, the Rust dialects render `\z`, Javascript falls back
    /// to `$`.
    pub fn end_string() -> Ir {
        Ir::boundary(r"\Z", None)
    }

    pub fn word_boundary() -> Ir {
        Ir::boundary(r"\b", Some(r"\B"))
    }
}
