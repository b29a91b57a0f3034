//! AST to IR lowering
//!
//! One pass over the AST with a mutable macro scope. Definitions are
//! hoisted within their sequence and removed again when the sequence
//! ends. The root of every compile is wrapped in a `Setting` with no
//! flags, where dialect defaults attach exactly once.

use kleenexp_core::ast::Ast;
use kleenexp_core::{ClassItem, CompileError, Ir};

use crate::macros::MacroTable;
use crate::operators::{parse_repeat, OpKind, OPERATORS};

/// Compile an AST into assembly IR against a fresh copy of the builtin
/// macro table.
pub fn compile(ast: &Ast) -> Result<Ir, CompileError> {
    let mut macros = MacroTable::builtins();
    let body = compile_ast(ast, &mut macros)?;
    Ok(Ir::Setting {
        flags: String::new(),
        sub: Box::new(body),
    })
}

pub(crate) fn compile_ast(ast: &Ast, macros: &mut MacroTable) -> Result<Ir, CompileError> {
    match ast {
        Ast::Literal(text) => Ok(Ir::Literal(text.clone())),
        Ast::Concat(items) => compile_concat(items, macros),
        Ast::Either(items) => compile_either(items, macros),
        Ast::Operator {
            op_name,
            name,
            subregex,
        } => compile_operator(op_name, name.as_deref(), subregex, macros),
        Ast::Macro(name) => compile_macro(name, macros),
        Ast::Range { start, end } => compile_range(*start, *end),
        Ast::MultiRange { start, end } => compile_multi_range(*start, *end),
        Ast::Def { name, .. } => Err(CompileError::MisplacedDefinition(name.clone())),
        Ast::Nothing => Ok(Ir::empty()),
    }
}

fn compile_concat(items: &[Ast], macros: &mut MacroTable) -> Result<Ir, CompileError> {
    // definitions are hoisted: in scope for every sibling, including the
    // ones written before them
    let mut defined = Vec::new();
    for item in items {
        if let Ast::Def { name, subregex } = item {
            if macros.contains(name) {
                return Err(CompileError::DuplicateMacro(name.clone()));
            }
            tracing::debug!("defining macro {}", name);
            let compiled = compile_ast(subregex, macros)?;
            macros.insert(name.clone(), compiled);
            defined.push(name.as_str());
        }
    }

    let mut compiled = Vec::new();
    for item in items {
        if matches!(item, Ast::Def { .. }) {
            continue;
        }
        let ir = compile_ast(item, macros)?;
        if !ir.is_empty() {
            compiled.push(ir);
        }
    }

    // definitions go out of scope with their sequence
    for name in defined {
        macros.remove(name);
    }

    if compiled.is_empty() {
        return Ok(Ir::empty());
    }
    if compiled.len() == 1 {
        return Ok(compiled.remove(0));
    }
    Ok(Ir::Concat(compiled))
}

fn compile_either(items: &[Ast], macros: &mut MacroTable) -> Result<Ir, CompileError> {
    let mut compiled = Vec::new();
    for item in items {
        compiled.push(compile_ast(item, macros)?);
    }

    if let Some(class_items) = merge_single_chars(&compiled) {
        return Ok(Ir::CharacterClass {
            items: class_items,
            inverted: false,
        });
    }

    // an alternation with exactly one non-empty branch is just that branch
    // made optional, greedy when the non-empty branch comes first
    let mut non_empty = None;
    let mut count = 0;
    let mut greedy = false;
    for (i, ir) in compiled.iter().enumerate() {
        if !ir.is_empty() {
            greedy = i == 0;
            count += 1;
            non_empty = Some(ir);
        }
    }
    if count == 1 {
        if let Some(sub) = non_empty {
            return Ok(Ir::Multiple {
                min: 0,
                max: Some(1),
                greedy,
                sub: Box::new(sub.clone()),
            });
        }
    }
    Ok(Ir::Either(compiled))
}

/// If every branch is a single character or a character class, the whole
/// alternation collapses into one class.
fn merge_single_chars(compiled: &[Ir]) -> Option<Vec<ClassItem>> {
    let mut items = Vec::new();
    for ir in compiled {
        match ir {
            Ir::Literal(s) if s.chars().count() == 1 => {
                items.push(ClassItem::Char(s.chars().next()?));
            }
            Ir::CharacterClass { items: sub, .. } => items.extend(sub.iter().cloned()),
            _ => return None,
        }
    }
    Some(items)
}

fn compile_operator(
    op_name: &str,
    name: Option<&str>,
    subregex: &Ast,
    macros: &mut MacroTable,
) -> Result<Ir, CompileError> {
    // comments vanish without compiling their body, so they may contain
    // anything that parses
    if op_name == "comment" {
        return Ok(Ir::empty());
    }

    let sub = compile_ast(subregex, macros)?;
    tracing::trace!("applying operator {} to {:?}", op_name, sub);

    let kind = OPERATORS.get(op_name).copied();
    if sub.is_empty() && !matches!(kind, Some(OpKind::Join)) {
        return Err(CompileError::EmptyOperatorBody(op_name.to_string()));
    }

    if let Some((min, max)) = parse_repeat(op_name) {
        if name.is_some() {
            return Err(CompileError::OperatorTakesNoName {
                op: op_name.to_string(),
            });
        }
        check_bounds(min, max)?;
        return Ok(Ir::Multiple {
            min,
            max,
            greedy: true,
            sub: Box::new(sub),
        });
    }

    match kind {
        None => Err(CompileError::UnknownOperator(op_name.to_string())),
        Some(OpKind::Capture) => Ok(Ir::Capture {
            name: name.map(str::to_string),
            sub: Box::new(sub),
        }),
        Some(OpKind::Invert) => {
            reject_name(op_name, name)?;
            invert(sub)
        }
        Some(OpKind::Join) => compile_join(op_name, name, sub),
        Some(OpKind::Lookahead) => {
            reject_name(op_name, name)?;
            Ok(Ir::Lookahead(Box::new(sub)))
        }
        Some(OpKind::Lookbehind) => {
            reject_name(op_name, name)?;
            Ok(Ir::Lookbehind(Box::new(sub)))
        }
        Some(OpKind::Flag(letter)) => {
            let unset = match name {
                None => false,
                Some("unset") => true,
                Some(other) => {
                    return Err(CompileError::InvalidFlagModifier {
                        op: op_name.to_string(),
                        modifier: other.to_string(),
                    })
                }
            };
            if unset && !matches!(letter, 'i' | 'm' | 's') {
                return Err(CompileError::FlagNotUnsettable(letter));
            }
            Ok(Ir::InlineFlag {
                letter,
                unset,
                sub: Box::new(sub),
            })
        }
    }
}

fn reject_name(op_name: &str, name: Option<&str>) -> Result<(), CompileError> {
    if name.is_some() {
        return Err(CompileError::OperatorTakesNoName {
            op: op_name.to_string(),
        });
    }
    Ok(())
}

fn check_bounds(min: u32, max: Option<u32>) -> Result<(), CompileError> {
    if let Some(max) = max {
        if min > max {
            return Err(CompileError::ReversedRange {
                start: min.to_string(),
                end: max.to_string(),
            });
        }
    }
    Ok(())
}

fn invert(sub: Ir) -> Result<Ir, CompileError> {
    if let Ir::Literal(text) = &sub {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Ir::CharacterClass {
                items: vec![ClassItem::Char(c)],
                inverted: true,
            });
        }
    }
    sub.invert()
}

/// Rewrite `[join:<sep> N-M <expr>]` so the separator sits between
/// repeats: one `<expr>`, then `N-1` through `M-1` repeats of
/// `<sep><expr>`. A zero minimum makes the whole thing optional.
fn compile_join(op_name: &str, separator: Option<&str>, sub: Ir) -> Result<Ir, CompileError> {
    let Some(separator) = separator else {
        return Err(CompileError::MissingSeparator);
    };
    let Ir::Multiple {
        min,
        max,
        greedy,
        sub,
    } = sub
    else {
        return Err(CompileError::ExpectedRepetition(op_name.to_string()));
    };
    check_bounds(min, max)?;

    if max == Some(0) {
        return Ok(Ir::empty());
    }
    if (min, max) == (0, Some(1)) {
        return Ok(Ir::Multiple {
            min,
            max,
            greedy,
            sub,
        });
    }

    let sub = *sub;
    let rest = Ir::Multiple {
        min: min.saturating_sub(1),
        max: max.map(|m| m - 1),
        greedy,
        sub: Box::new(Ir::Concat(vec![
            Ir::Literal(separator.to_string()),
            sub.clone(),
        ])),
    };
    let joined = Ir::Concat(vec![sub, rest]);
    if min == 0 {
        return Ok(Ir::Multiple {
            min: 0,
            max: Some(1),
            greedy,
            sub: Box::new(joined),
        });
    }
    Ok(joined)
}

fn compile_macro(name: &str, macros: &MacroTable) -> Result<Ir, CompileError> {
    // `#repeat:x` is not a table lookup but a backreference, resolved
    // against the capture groups at assembly time
    for prefix in ["#repeat:", "#rep:"] {
        if let Some(target) = name.strip_prefix(prefix) {
            return Ok(Ir::Repeat(target.to_string()));
        }
    }
    macros
        .get(name)
        .cloned()
        .ok_or_else(|| CompileError::UndefinedMacro(name.to_string()))
}

fn compile_range(start: char, end: char) -> Result<Ir, CompileError> {
    let start_category = character_category(start);
    let end_category = character_category(end);
    if start_category != end_category {
        return Err(CompileError::RangeCategoryMismatch {
            start,
            end,
            start_category,
            end_category,
        });
    }
    if start > end {
        return Err(CompileError::ReversedRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if start == end {
        return Ok(Ir::CharacterClass {
            items: vec![ClassItem::Char(start)],
            inverted: false,
        });
    }
    Ok(Ir::CharacterClass {
        items: vec![ClassItem::Range(start, end)],
        inverted: false,
    })
}

fn character_category(c: char) -> &'static str {
    if c.is_ascii_lowercase() {
        "lowercase letter"
    } else if c.is_ascii_uppercase() {
        "uppercase letter"
    } else if c.is_ascii_digit() {
        "digit"
    } else {
        "unknown"
    }
}

/// An integer interval. Negative parts are matched with an explicit `-`
/// sign in front of the mirrored positive interval.
fn compile_multi_range(start: i64, end: i64) -> Result<Ir, CompileError> {
    if start > end {
        return Err(CompileError::ReversedRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if start >= 0 {
        return Ok(Ir::NumberRange {
            start: start as u64,
            end: end as u64,
        });
    }
    if end < 0 {
        return Ok(Ir::Concat(vec![
            Ir::Literal("-".to_string()),
            Ir::NumberRange {
                start: end.unsigned_abs(),
                end: start.unsigned_abs(),
            },
        ]));
    }
    Ok(Ir::Either(vec![
        Ir::Concat(vec![
            Ir::Literal("-".to_string()),
            Ir::NumberRange {
                start: 1,
                end: start.unsigned_abs(),
            },
        ]),
        Ir::NumberRange {
            start: 0,
            end: end as u64,
        },
    ]))
}
