//! Builtin macro registry
//!
//! Macro names carry their `#` sigil. The table starts from a set of
//! primitives built directly as IR, derives `#not_*` inverses and short
//! aliases from them, then bootstraps composite macros (`#integer`,
//! `#float`, `#token`, ...) by compiling kleenexp fragments against the
//! half-built table. Each top-level compile works on its own clone, so
//! local definitions never leak between compiles.

use std::collections::HashMap;
use std::sync::LazyLock;

use kleenexp_core::Ir;

use crate::compiler::compile_ast;

/// A scope of macro definitions: the builtins plus any local `#name=[...]`
/// definitions currently in scope.
#[derive(Debug, Clone)]
pub struct MacroTable {
    entries: HashMap<String, Ir>,
}

impl MacroTable {
    /// A fresh copy of the builtin table.
    pub fn builtins() -> MacroTable {
        BUILTINS.clone()
    }

    pub fn get(&self, name: &str) -> Option<&Ir> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: String, ir: Ir) {
        self.entries.insert(name, ir);
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }
}

static BUILTINS: LazyLock<MacroTable> = LazyLock::new(build_builtins);

/// Primitive macros with no inverse derivation or alias of their own.
fn primitives() -> Vec<(&'static str, Ir)> {
    vec![
        ("#any", Ir::any()),
        ("#newline_character", Ir::newline_character()),
        (
            "#newline",
            Ir::Either(vec![
                Ir::newline_character(),
                Ir::Literal("\r\n".to_string()),
            ]),
        ),
        (
            "#any_at_all",
            Ir::Either(vec![Ir::any(), Ir::newline_character()]),
        ),
        ("#linefeed", Ir::linefeed()),
        ("#carriage_return", Ir::carriage_return()),
        ("#windows_newline", Ir::Literal("\r\n".to_string())),
        ("#tab", Ir::tab()),
        ("#digit", Ir::digit()),
        ("#letter", Ir::letter()),
        ("#lowercase", Ir::lowercase()),
        ("#uppercase", Ir::uppercase()),
        ("#space", Ir::space()),
        ("#token_character", Ir::token_character()),
        ("#start_string", Ir::start_string()),
        ("#end_string", Ir::end_string()),
        ("#start_line", Ir::start_line()),
        ("#end_line", Ir::end_line()),
        ("#word_boundary", Ir::word_boundary()),
        ("#quote", Ir::Literal("'".to_string())),
        ("#double_quote", Ir::Literal("\"".to_string())),
        ("#left_brace", Ir::Literal("[".to_string())),
        ("#right_brace", Ir::Literal("]".to_string())),
        ("#vertical_tab", Ir::Literal("\x0b".to_string())),
        ("#formfeed", Ir::Literal("\x0c".to_string())),
        ("#bell", Ir::Literal("\x07".to_string())),
        ("#backspace", Ir::Literal("\x08".to_string())),
    ]
}

/// Macros that get a derived `#not_*` inverse.
const INVERTIBLE: [&str; 10] = [
    "linefeed",
    "carriage_return",
    "tab",
    "digit",
    "letter",
    "lowercase",
    "uppercase",
    "space",
    "token_character",
    "word_boundary",
];

/// Aliases for the invertible macros; `#nX` is the inverse of `#X`.
const INVERTIBLE_ALIASES: [(&str, &str); 10] = [
    ("linefeed", "lf"),
    ("carriage_return", "cr"),
    ("tab", "t"),
    ("digit", "d"),
    ("letter", "l"),
    ("lowercase", "lc"),
    ("uppercase", "uc"),
    ("space", "s"),
    ("token_character", "tc"),
    ("word_boundary", "wb"),
];

/// Plain aliases with no inverse of their own.
const ALIASES: [(&str, &str); 14] = [
    ("any", "a"),
    ("any_at_all", "aaa"),
    ("newline", "n"),
    ("newline_character", "nc"),
    ("not_newline", "nn"),
    ("windows_newline", "crlf"),
    ("start_string", "ss"),
    ("end_string", "es"),
    ("start_line", "sl"),
    ("end_line", "el"),
    ("quote", "q"),
    ("double_quote", "dq"),
    ("left_brace", "lb"),
    ("right_brace", "rb"),
];

fn build_builtins() -> MacroTable {
    let mut table = MacroTable {
        entries: HashMap::new(),
    };
    for (name, ir) in primitives() {
        table.insert(name.to_string(), ir);
    }

    // the inversion of #newline_character, not of #newline, for practical
    // reasons
    let newline = builtin(&table, "#newline_character");
    table.insert(
        "#not_newline".to_string(),
        newline.invert().expect("newline class must invert"),
    );

    for name in INVERTIBLE {
        let inverted = builtin(&table, &format!("#{}", name))
            .invert()
            .expect("every invertible builtin must invert");
        table.insert(format!("#not_{}", name), inverted);
    }
    for (long, short) in INVERTIBLE_ALIASES {
        let ir = builtin(&table, &format!("#{}", long));
        table.insert(format!("#{}", short), ir);
        let inverse = builtin(&table, &format!("#not_{}", long));
        table.insert(format!("#n{}", short), inverse);
    }
    for (long, short) in ALIASES {
        let ir = builtin(&table, &format!("#{}", long));
        table.insert(format!("#{}", short), ir);
    }

    composite(&mut table, "#integer", Some("#int"), "[[0-1 '-'] [1+ #digit]]");
    composite(&mut table, "#digits", Some("#uint"), "[1+ #digit]");
    composite(&mut table, "#decimal", None, "[#int [0-1 '.' #uint]]");
    composite(
        &mut table,
        "#float",
        None,
        "[[0-1 '-'] [[#uint '.' [0-1 #uint] | '.' #uint] [0-1 #exponent] | #int #exponent] \
         #exponent=[['e' | 'E'] [0-1 ['+' | '-']] #uint]]",
    );
    composite(&mut table, "#hex_digit", Some("#hexd"), "[#digit | #a..f | #A..F]");
    composite(&mut table, "#hex_number", Some("#hexn"), "[1+ #hex_digit]");
    // not called #word because legacy regex pronounces \w "word character",
    // which is #token_character here
    composite(&mut table, "#letters", None, "[1+ #letter]");
    composite(&mut table, "#token", None, "[#letter | '_'][0+ #token_character]");
    composite(&mut table, "#capture_0+_any", Some("#c0"), "[capture 0+ #any]");
    composite(&mut table, "#capture_1+_any", Some("#c1"), "[capture 1+ #any]");

    table
}

fn builtin(table: &MacroTable, name: &str) -> Ir {
    table
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("builtin macro {} missing during registry init", name))
}

/// Compile a kleenexp fragment against the table built so far and record
/// it under one or two names.
fn composite(table: &mut MacroTable, long: &str, short: Option<&str>, source: &str) {
    let ast = kleenexp_parser::parse(source)
        .unwrap_or_else(|e| panic!("builtin fragment {} must parse: {}", long, e));
    let ir = compile_ast(&ast, table)
        .unwrap_or_else(|e| panic!("builtin fragment {} must compile: {}", long, e));
    table.insert(long.to_string(), ir.clone());
    if let Some(short) = short {
        table.insert(short.to_string(), ir);
    }
}
