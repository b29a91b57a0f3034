//! Recursive descent parser for the kleenexp grammar
//!
//! The grammar is a PEG with ordered choice:
//!
//! ```text
//! pattern         = ( outer_literal / braces )*
//! braces          = '[' ws? ( ops_matches / either / matches )? ws? ']'
//! ops_matches     = op ( ws op )* ( ws matches )?
//! op              = token ( ':' token )?
//! either          = matches ( ws? '|' ws? matches )+
//! matches         = match ( ws match )*
//! match           = inner_literal / def / macro / braces
//! macro           = '#' ( range / token )
//! def             = macro '=' braces
//! ```
//!
//! `ws` matches real whitespace, or nothing at all when the boundary is
//! already unambiguous because a bracket sits on either side. Inner
//! literals are single- or double-quoted with no escape processing; the
//! quote character itself is written with the other quote kind.
//!
//! An alternative inside braces only wins if the closing bracket follows
//! it, so `[2+ 'a' | 'b']` is rejected rather than silently grouped.

use kleenexp_core::ast::Ast;
use kleenexp_core::error::ParseError;

use crate::Result;

/// Parse a kleenexp pattern into its AST.
///
/// The result is always a `Concat` at the top level, with nested `Concat`
/// children flattened into it.
pub fn parse(pattern: &str) -> Result<Ast> {
    tracing::trace!("parsing {} byte pattern", pattern.len());
    Parser {
        text: pattern,
        pos: 0,
    }
    .pattern()
}

/// Characters allowed in operator and macro tokens, besides ASCII
/// alphanumerics. `:` and `=` are excluded: they separate an operator
/// from its tag and a definition name from its body.
const TOKEN_PUNCTUATION: &str = "!$%&()*+,./;<>?@\\^_`{}~-";

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || TOKEN_PUNCTUATION.contains(c)
}

/// Macro names additionally allow `:`, so `#repeat:name` is one token.
fn is_macro_char(c: char) -> bool {
    is_token_char(c) || c == ':'
}

/// One end of a `#x..y` range.
enum Endpoint {
    Char(char),
    Int(i64),
}

impl Endpoint {
    fn numeric(self) -> Option<i64> {
        match self {
            Endpoint::Char(c) => c.to_digit(10).map(i64::from),
            Endpoint::Int(i) => Some(i),
        }
    }
}

struct Op {
    op_name: String,
    name: Option<String>,
}

struct Parser<'a> {
    text: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            position: self.pos,
            snippet: self.text[self.pos..].chars().take(16).collect(),
        }
    }

    fn skip_spaces(&mut self) {
        self.take_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }

    /// The grammar's whitespace rule: real whitespace, or zero width when
    /// the previous character was `]` or the next one is `[`.
    fn ws(&mut self) -> bool {
        let start = self.pos;
        self.skip_spaces();
        self.pos > start
            || self.text[..self.pos].ends_with(']')
            || matches!(self.peek(), Some('['))
    }

    fn pattern(&mut self) -> Result<Ast> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '[' => match self.braces()? {
                    Ast::Concat(subs) => items.extend(subs),
                    Ast::Nothing => {}
                    other => items.push(other),
                },
                ']' => return Err(self.error("unbalanced ']'")),
                _ => {
                    let literal = self.take_while(|c| c != '[' && c != ']');
                    items.push(Ast::Literal(literal.to_string()));
                }
            }
        }
        Ok(Ast::Concat(items))
    }

    fn braces(&mut self) -> Result<Ast> {
        if !self.eat('[') {
            return Err(self.error("expected '['"));
        }
        self.skip_spaces();
        let start = self.pos;

        let alternatives: [fn(&mut Self) -> Result<Ast>; 3] =
            [Self::ops_matches, Self::either, Self::matches];
        let mut last_error = None;
        for alternative in alternatives {
            self.pos = start;
            match alternative(self) {
                Ok(ast) => {
                    self.skip_spaces();
                    if self.eat(']') {
                        return Ok(ast);
                    }
                    last_error = Some(self.error("expected ']'"));
                }
                Err(e) => last_error = Some(e),
            }
        }

        self.pos = start;
        self.skip_spaces();
        if self.eat(']') {
            return Ok(Ast::Nothing);
        }
        match last_error {
            Some(e) => Err(e),
            None => Err(self.error("expected ']'")),
        }
    }

    fn ops_matches(&mut self) -> Result<Ast> {
        let mut ops = vec![self.op()?];
        loop {
            let save = self.pos;
            if !self.ws() {
                break;
            }
            match self.op() {
                Ok(op) => ops.push(op),
                Err(_) => {
                    self.pos = save;
                    break;
                }
            }
        }

        let save = self.pos;
        let mut body = Ast::Nothing;
        if self.ws() {
            match self.matches() {
                Ok(ast) => body = ast,
                Err(_) => self.pos = save,
            }
        }

        Ok(ops.into_iter().rfold(body, |sub, op| Ast::Operator {
            op_name: op.op_name,
            name: op.name,
            subregex: Box::new(sub),
        }))
    }

    fn op(&mut self) -> Result<Op> {
        let op_name = self.token()?;
        let save = self.pos;
        let mut name = None;
        if self.eat(':') {
            match self.token() {
                Ok(tag) => name = Some(tag),
                Err(_) => self.pos = save,
            }
        }
        Ok(Op { op_name, name })
    }

    fn token(&mut self) -> Result<String> {
        let token = self.take_while(is_token_char);
        if token.is_empty() {
            return Err(self.error("expected a token"));
        }
        Ok(token.to_string())
    }

    fn either(&mut self) -> Result<Ast> {
        let mut branches = vec![self.matches()?];
        loop {
            let save = self.pos;
            self.skip_spaces();
            if !self.eat('|') {
                self.pos = save;
                break;
            }
            self.skip_spaces();
            branches.push(self.matches()?);
        }
        if branches.len() < 2 {
            return Err(self.error("expected '|'"));
        }
        Ok(Ast::Either(branches))
    }

    fn matches(&mut self) -> Result<Ast> {
        let mut items = vec![self.match_one()?];
        loop {
            let save = self.pos;
            if !self.ws() {
                break;
            }
            match self.match_one() {
                Ok(ast) => items.push(ast),
                Err(_) => {
                    self.pos = save;
                    break;
                }
            }
        }
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Ast::Concat(items))
    }

    fn match_one(&mut self) -> Result<Ast> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => self.inner_literal(quote),
            Some('#') => self.macro_or_def(),
            Some('[') => self.braces(),
            _ => Err(self.error("expected a literal, macro, or group")),
        }
    }

    /// A quoted literal. No escape processing: the body runs to the next
    /// quote of the same kind, and may be empty.
    fn inner_literal(&mut self, quote: char) -> Result<Ast> {
        self.eat(quote);
        let body = self.take_while(|c| c != quote).to_string();
        if !self.eat(quote) {
            return Err(self.error("unterminated literal"));
        }
        Ok(Ast::Literal(body))
    }

    fn macro_or_def(&mut self) -> Result<Ast> {
        let start = self.pos;
        self.eat('#');
        if let Some(range) = self.try_range() {
            return Ok(range);
        }

        if self.take_while(is_macro_char).is_empty() {
            return Err(self.error("expected a macro name after '#'"));
        }
        // the name keeps its '#' sigil, exactly as written
        let name = self.text[start..self.pos].to_string();
        if self.eat('=') {
            let subregex = self.braces()?;
            return Ok(Ast::Def {
                name,
                subregex: Box::new(subregex),
            });
        }
        Ok(Ast::Macro(name))
    }

    fn try_range(&mut self) -> Option<Ast> {
        let save = self.pos;
        match self.range() {
            Some(ast) => Some(ast),
            None => {
                self.pos = save;
                None
            }
        }
    }

    /// `x..y` after the `#`. Single alphanumerics on both sides make a
    /// character range; optionally signed integers make a numeric
    /// interval. Anything longer falls back to a plain macro name, since
    /// `.` is a legal token character.
    fn range(&mut self) -> Option<Ast> {
        let start = self.range_endpoint()?;
        if !(self.eat('.') && self.eat('.')) {
            return None;
        }
        let end = self.range_endpoint()?;
        if matches!(self.peek(), Some(c) if is_macro_char(c)) {
            return None;
        }
        match (start, end) {
            (Endpoint::Char(start), Endpoint::Char(end)) => Some(Ast::Range { start, end }),
            (start, end) => Some(Ast::MultiRange {
                start: start.numeric()?,
                end: end.numeric()?,
            }),
        }
    }

    fn range_endpoint(&mut self) -> Option<Endpoint> {
        let negative = self.eat('-');
        let text = self.take_while(|c| c.is_ascii_alphanumeric());
        if text.is_empty() {
            return None;
        }
        if !negative && text.chars().count() == 1 {
            return text.chars().next().map(Endpoint::Char);
        }
        let value: i64 = text.parse().ok()?;
        Some(Endpoint::Int(if negative { -value } else { value }))
    }
}
