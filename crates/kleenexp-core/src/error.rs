//! Error types for the kleenexp pipeline
//!
//! Two error kinds live under one umbrella so callers can catch either
//! generically: [`ParseError`] for grammar rejections and [`CompileError`]
//! for semantic rejections during compilation or assembly.

use crate::flavor::Flavor;
use thiserror::Error;

/// Grammar rejection. Carries the position and the offending slice of the
/// input so callers can render a human-readable diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at position {position}: {message} (near {snippet:?})")]
pub struct ParseError {
    /// What the grammar expected
    pub message: String,
    /// Byte offset into the pattern where parsing failed
    pub position: usize,
    /// The offending stretch of input, truncated for display
    pub snippet: String,
}

/// Semantic rejection raised by the compiler or the assembler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Reference to a macro that is not in scope
    #[error("macro {0} does not exist, perhaps you defined it in the wrong scope?")]
    UndefinedMacro(String),

    /// A `Def` re-binding a name that already exists in the current scope
    #[error("macro {0} already defined")]
    DuplicateMacro(String),

    /// A `Def` somewhere other than directly under a concatenation
    #[error("macro definition {0} is only allowed as a direct element of a sequence")]
    MisplacedDefinition(String),

    /// Reference to an operator that is not in the builtin table
    #[error("operator {0} does not exist")]
    UnknownOperator(String),

    /// An operator whose body compiled to nothing
    #[error("operator {0} not allowed to have empty body")]
    EmptyOperatorBody(String),

    /// A name tag on an operator that forbids one
    #[error("operator {op} does not accept a name")]
    OperatorTakesNoName { op: String },

    /// `join`/`separate` without a separator tag
    #[error("must specify a separator, e.g. join:','")]
    MissingSeparator,

    /// `join`/`separate` applied to something that is not a repetition
    #[error("operator {0} must be applied to a repetition")]
    ExpectedRepetition(String),

    /// A tag other than `unset` on an inline-flag operator
    #[error("operator {op} does not understand the modifier {modifier:?}")]
    InvalidFlagModifier { op: String, modifier: String },

    /// `unset` requested for a flag that may only be set
    #[error("flag '{0}' cannot be unset")]
    FlagNotUnsettable(char),

    /// Capture name that is not an identifier
    #[error("invalid capture group name: {0:?}")]
    InvalidCaptureName(String),

    /// Capture name used twice in one compiled expression
    #[error("duplicate capture group name: {0:?}")]
    DuplicateCaptureName(String),

    /// Backreference to a name or index with no matching capture group
    #[error("backreference {0:?} does not match any capture group seen so far")]
    UnresolvedBackreference(String),

    /// Character range whose endpoints belong to different categories
    #[error("range start and end not of the same category: '{start}' is a {start_category} but '{end}' is a {end_category}")]
    RangeCategoryMismatch {
        start: char,
        end: char,
        start_category: &'static str,
        end_category: &'static str,
    },

    /// Range with its endpoints in the wrong order
    #[error("range start after range end: {start} > {end}")]
    ReversedRange { start: String, end: String },

    /// `not` applied to a node with no inversion
    #[error("expression {0} cannot be inverted (maybe try [not lookahead <expression>]?)")]
    NotInvertible(String),

    /// A construct the selected dialect's engine has no syntax for
    #[error("{feature} is not supported by the {flavor} dialect")]
    UnsupportedByFlavor {
        feature: &'static str,
        flavor: Flavor,
    },
}

/// Umbrella error for the whole pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Grammar rejection
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Semantic rejection
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
