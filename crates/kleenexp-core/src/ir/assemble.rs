//! IR to dialect-string rendering
//!
//! Recursive descent over the assembly tree. A `wrap` flag threads top-down:
//! a child is parenthesized with a non-capturing group when its own
//! precedence is weaker than the context requires. Capture names are
//! collected left to right into an ordered list, which doubles as the
//! resolution table for backreferences.

use super::{ClassItem, Ir};
use crate::error::CompileError;
use crate::flavor::Flavor;
use crate::numrange::number_range_to_regex;

/// Render an assembly tree to a regex string for the given flavor.
pub fn assemble(ir: &Ir, flavor: Flavor) -> Result<String, CompileError> {
    let mut names = Vec::new();
    render(ir, flavor, false, &mut names)
}

fn wrap_if(condition: bool, body: String) -> String {
    if condition {
        format!("(?:{})", body)
    } else {
        body
    }
}

/// Escape literal text for use outside a character class. `\t \n \r \v \f`
/// become named escapes; all other metacharacters and the space character
/// get a backslash.
fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '[' | ']' | '{' | '}' | '?' | '*' | '+' | '|' | '^' | '$' | '\\' | '.'
            | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\x0b' => out.push_str(r"\v"),
            '\x0c' => out.push_str(r"\f"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape one character for use inside a character class, where only
/// `^ - [ ] \` are special.
fn escape_class_char(c: char) -> String {
    match c {
        '\t' => r"\t".to_string(),
        '\n' => r"\n".to_string(),
        '\r' => r"\r".to_string(),
        '\x0b' => r"\v".to_string(),
        '\x0c' => r"\f".to_string(),
        '^' | '-' | '[' | ']' | '\\' => format!("\\{}", c),
        _ => c.to_string(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn render(
    ir: &Ir,
    flavor: Flavor,
    wrap: bool,
    names: &mut Vec<Option<String>>,
) -> Result<String, CompileError> {
    match ir {
        Ir::Literal(text) => Ok(wrap_if(
            wrap && text.chars().count() != 1,
            escape_literal(text),
        )),

        Ir::Concat(items) => {
            let mut out = String::new();
            for item in items {
                // an Either child needs its own group, or adjacent items
                // would leak into its branches
                let child_wrap = matches!(item, Ir::Either(_)) && items.len() > 1;
                out.push_str(&render(item, flavor, child_wrap, names)?);
            }
            Ok(wrap_if(wrap, out))
        }

        Ir::Either(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(render(item, flavor, false, names)?);
            }
            Ok(wrap_if(wrap, rendered.join("|")))
        }

        Ir::Multiple {
            min,
            max,
            greedy,
            sub,
        } => {
            if (*min, *max) == (0, Some(0)) {
                return Ok(String::new());
            }
            if (*min, *max) == (1, Some(1)) {
                return render(sub, flavor, wrap, names);
            }
            let mut op = match (*min, *max) {
                (0, None) => "*".to_string(),
                (1, None) => "+".to_string(),
                (0, Some(1)) => "?".to_string(),
                (n, Some(m)) if n == m => format!("{{{}}}", n),
                (n, m) => {
                    // "{0,m}" rather than Python's "{,m}", which other
                    // engines treat as a literal
                    let high = m.map(|m| m.to_string()).unwrap_or_default();
                    format!("{{{},{}}}", n, high)
                }
            };
            if !greedy {
                op.push('?');
            }
            let body = render(sub, flavor, true, names)?;
            Ok(wrap_if(wrap, format!("{}{}", body, op)))
        }

        Ir::CharacterClass { items, inverted } => render_class(items, *inverted),

        Ir::Boundary { marker, .. } => Ok(match (marker.as_str(), flavor) {
            (r"\A", Flavor::Javascript) => "^".to_string(),
            (r"\Z", Flavor::Javascript) => "$".to_string(),
            (r"\Z", Flavor::Rust | Flavor::RustFancy) => r"\z".to_string(),
            (m, _) => m.to_string(),
        }),

        Ir::Capture { name, sub } => {
            let header = match name {
                None => String::new(),
                Some(name) => {
                    if !is_identifier(name) {
                        return Err(CompileError::InvalidCaptureName(name.clone()));
                    }
                    if names.iter().any(|n| n.as_deref() == Some(name.as_str())) {
                        return Err(CompileError::DuplicateCaptureName(name.clone()));
                    }
                    match flavor {
                        Flavor::Javascript => format!("?<{}>", name),
                        _ => format!("?P<{}>", name),
                    }
                }
            };
            names.push(name.clone());
            let body = render(sub, flavor, false, names)?;
            Ok(format!("({}{})", header, body))
        }

        Ir::Lookahead(sub) => render_lookaround(sub, "(?=", "lookahead", flavor, names),
        Ir::NegativeLookahead(sub) => render_lookaround(sub, "(?!", "lookahead", flavor, names),
        Ir::Lookbehind(sub) => render_lookaround(sub, "(?<=", "lookbehind", flavor, names),
        Ir::NegativeLookbehind(sub) => render_lookaround(sub, "(?<!", "lookbehind", flavor, names),

        Ir::InlineFlag { .. } => render_flags(ir, flavor, names),

        Ir::Setting { flags, sub } => {
            if flags.is_empty() {
                return render(sub, flavor, false, names);
            }
            // settings have global effect and match zero characters, so the
            // group itself never needs wrapping, but the child still might
            let body = render(sub, flavor, wrap, names)?;
            Ok(format!("(?{}){}", flags, body))
        }

        Ir::Repeat(target) => render_backreference(target, flavor, names),

        Ir::NumberRange { start, end } => {
            let body = number_range_to_regex(*start, *end);
            // a single character or one bracket class is already an atom
            // and quantifies without a group
            let atom = body.chars().count() == 1
                || (body.starts_with('[') && body.find(']') == Some(body.len() - 1));
            Ok(wrap_if(body.contains('|') || (wrap && !atom), body))
        }
    }
}

fn render_class(items: &[ClassItem], inverted: bool) -> Result<String, CompileError> {
    if items.is_empty() {
        if inverted {
            // relies on the dotall-style default the compiler attaches at
            // the root
            return Ok(".".to_string());
        }
        // an expression that never matches: empty lookahead always succeeds,
        // so its negation always fails; the dot keeps it one character wide
        return Ok("(?!).".to_string());
    }

    if items.len() == 1 {
        match &items[0] {
            ClassItem::Char(c) if !inverted => return Ok(escape_literal(&c.to_string())),
            ClassItem::Shorthand(s) if !inverted => return Ok(s.clone()),
            ClassItem::Shorthand(s) if matches!(s.as_str(), r"\d" | r"\s" | r"\w") => {
                return Ok(s.to_uppercase());
            }
            _ => {}
        }
    }

    let mut rendered: Vec<String> = items
        .iter()
        .map(|item| match item {
            ClassItem::Char(c) => escape_class_char(*c),
            ClassItem::Range(a, b) => format!("{}-{}", escape_class_char(*a), escape_class_char(*b)),
            ClassItem::Shorthand(s) => s.clone(),
        })
        .collect();
    // sorted for deterministic, testable output
    rendered.sort();
    Ok(format!(
        "[{}{}]",
        if inverted { "^" } else { "" },
        rendered.concat()
    ))
}

fn render_lookaround(
    sub: &Ir,
    opener: &str,
    feature: &'static str,
    flavor: Flavor,
    names: &mut Vec<Option<String>>,
) -> Result<String, CompileError> {
    if flavor == Flavor::Rust {
        return Err(CompileError::UnsupportedByFlavor { feature, flavor });
    }
    let body = render(sub, flavor, false, names)?;
    Ok(format!("{}{})", opener, body))
}

/// Collapse a chain of nested inline flags over one body into a single
/// group header: set letters, `-`, unset letters. The innermost occurrence
/// of a letter wins; letters keep their first-appearance order.
fn render_flags(
    ir: &Ir,
    flavor: Flavor,
    names: &mut Vec<Option<String>>,
) -> Result<String, CompileError> {
    let mut chain: Vec<(char, bool)> = Vec::new();
    let mut node = ir;
    while let Ir::InlineFlag { letter, unset, sub } = node {
        chain.push((*letter, *unset));
        node = sub;
    }

    let mut order: Vec<char> = Vec::new();
    let mut final_unset: Vec<bool> = Vec::new();
    for (letter, unset) in chain {
        if unset && !matches!(letter, 'i' | 'm' | 's') {
            return Err(CompileError::FlagNotUnsettable(letter));
        }
        match order.iter().position(|&l| l == letter) {
            Some(i) => final_unset[i] = unset,
            None => {
                order.push(letter);
                final_unset.push(unset);
            }
        }
    }

    let set: String = order
        .iter()
        .zip(&final_unset)
        .filter(|(_, &unset)| !unset)
        .map(|(&l, _)| l)
        .collect();
    let unset: String = order
        .iter()
        .zip(&final_unset)
        .filter(|(_, &unset)| unset)
        .map(|(&l, _)| l)
        .collect();

    let body = render(node, flavor, false, names)?;
    if unset.is_empty() {
        Ok(format!("(?{}:{})", set, body))
    } else {
        Ok(format!("(?{}-{}:{})", set, unset, body))
    }
}

fn render_backreference(
    target: &str,
    flavor: Flavor,
    names: &[Option<String>],
) -> Result<String, CompileError> {
    if flavor == Flavor::Rust {
        return Err(CompileError::UnsupportedByFlavor {
            feature: "backreferences",
            flavor,
        });
    }
    if target.is_empty() {
        return Err(CompileError::UnresolvedBackreference(target.to_string()));
    }
    if target.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = target
            .parse()
            .map_err(|_| CompileError::UnresolvedBackreference(target.to_string()))?;
        if index == 0 || index > names.len() {
            return Err(CompileError::UnresolvedBackreference(target.to_string()));
        }
        return Ok(format!("\\{}", index));
    }
    if !names
        .iter()
        .any(|name| name.as_deref() == Some(target))
    {
        return Err(CompileError::UnresolvedBackreference(target.to_string()));
    }
    Ok(match flavor {
        Flavor::Python => format!("(?P={})", target),
        _ => format!("\\k<{}>", target),
    })
}
