//! Builtin operator registry
//!
//! Operators apply as a prefix chain inside brackets, innermost last:
//! `[capture 1+ #digit]`. They live in their own namespace, separate from
//! macros, so the operator `lb` (lookbehind) and the macro `#lb` (left
//! brace) do not collide.

use std::collections::HashMap;
use std::sync::LazyLock;

/// What a builtin operator does to its compiled body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Wrap in a capture group; the tag is the group name
    Capture,
    /// Invert the body; takes no tag
    Invert,
    /// Rewrite a repetition so a separator sits between repeats; the tag
    /// is the separator text
    Join,
    /// Zero-width assertion ahead
    Lookahead,
    /// Zero-width assertion behind
    Lookbehind,
    /// Scoped inline flag with the given letter; the tag `unset` turns
    /// the flag off where the engine allows it
    Flag(char),
}

/// Builtin operators and their short aliases, keyed by name.
///
/// Numeric repetitions (`3`, `1+`, `2-5`) are not listed here; they are
/// recognized structurally by [`parse_repeat`].
pub static OPERATORS: LazyLock<HashMap<&'static str, OpKind>> = LazyLock::new(|| {
    HashMap::from([
        ("capture", OpKind::Capture),
        ("c", OpKind::Capture),
        ("not", OpKind::Invert),
        ("n", OpKind::Invert),
        ("join", OpKind::Join),
        ("separate", OpKind::Join),
        ("sep", OpKind::Join),
        ("lookahead", OpKind::Lookahead),
        ("la", OpKind::Lookahead),
        ("lookbehind", OpKind::Lookbehind),
        ("lb", OpKind::Lookbehind),
        ("ascii_only", OpKind::Flag('a')),
        ("locale_dependent", OpKind::Flag('L')),
        ("unicode", OpKind::Flag('u')),
        ("ignore_case", OpKind::Flag('i')),
        ("multiline", OpKind::Flag('m')),
        ("any_matches_all", OpKind::Flag('s')),
    ])
});

/// Recognize a numeric repetition operator: `N` (exactly N), `N+` (N or
/// more), `N-M` (N through M inclusive). Anything else is `None`.
pub fn parse_repeat(op_name: &str) -> Option<(u32, Option<u32>)> {
    if let Some(rest) = op_name.strip_suffix('+') {
        let min = rest.parse().ok()?;
        return Some((min, None));
    }
    if let Some((low, high)) = op_name.split_once('-') {
        let min = low.parse().ok()?;
        let max = high.parse().ok()?;
        return Some((min, Some(max)));
    }
    let exact = op_name.parse().ok()?;
    Some((exact, Some(exact)))
}
