//! End-to-end tests: pattern text in, dialect regex out

use kleenexp_sdk::{compile_to_dialect, transpile, CompileError, Error, Flavor};

fn py(pattern: &str) -> String {
    match compile_to_dialect(pattern, Flavor::Python) {
        Ok(regex) => regex,
        Err(e) => panic!("{:?} should compile: {}", pattern, e),
    }
}

fn rejects(pattern: &str) -> Error {
    match compile_to_dialect(pattern, Flavor::Python) {
        Ok(regex) => panic!("{:?} should not compile, got {:?}", pattern, regex),
        Err(e) => e,
    }
}

/// Compile for the plain Rust dialect and build a matcher out of it.
fn matcher(pattern: &str) -> regex::Regex {
    let compiled = compile_to_dialect(pattern, Flavor::Rust)
        .unwrap_or_else(|e| panic!("{:?} should compile: {}", pattern, e));
    regex::Regex::new(&compiled)
        .unwrap_or_else(|e| panic!("{:?} should be a valid regex: {}", compiled, e))
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn test_basic_patterns() {
    assert_eq!(py(""), "");
    assert_eq!(py("[]"), "");
    assert_eq!(py("abc"), "abc");
    assert_eq!(py(r#"["a"]"#), "a");
    assert_eq!(py("[0+ #any]"), ".*");
    assert_eq!(py("Number [capture 1+ #digit]"), r"Number\ (\d+)");
    assert_eq!(py("[join:, 1+ #d]"), r"\d(?:,\d)*");
}

#[test]
fn test_transpile_is_an_alias() {
    let pattern = "Number [capture 1+ #digit]";
    assert_eq!(
        transpile(pattern, Flavor::Python).unwrap(),
        compile_to_dialect(pattern, Flavor::Python).unwrap()
    );
}

#[test]
fn test_deterministic_output() {
    let patterns = ["[#hexn '-' #hexn]", "[capture:x 1+ #token_character]", "[#0..255]"];
    for pattern in patterns {
        for flavor in [Flavor::Python, Flavor::Javascript, Flavor::Rust, Flavor::RustFancy] {
            assert_eq!(
                compile_to_dialect(pattern, flavor).unwrap(),
                compile_to_dialect(pattern, flavor).unwrap()
            );
        }
    }
}

#[test]
fn test_errors() {
    assert!(matches!(rejects("["), Error::Parse(_)));
    assert!(matches!(rejects("a]b"), Error::Parse(_)));
    assert!(matches!(
        rejects("[capture]"),
        Error::Compile(CompileError::EmptyOperatorBody(_))
    ));
    assert!(matches!(
        rejects("[#no_such_macro]"),
        Error::Compile(CompileError::UndefinedMacro(_))
    ));
}

// =============================================================================
// Character classes and ranges
// =============================================================================

#[test]
fn test_either_merges_into_classes() {
    assert_eq!(py("['a' | 'b']"), "[ab]");
    assert_eq!(py(r#"[#a..c | "g" | #q..t]"#), "[a-cgq-t]");
    assert_eq!(py(r#"[#a..c | "-"]"#), r"[\-a-c]");
}

#[test]
fn test_range_macros() {
    assert_eq!(py("[#a..z]"), "[a-z]");
    // equal endpoints degrade to a single character
    assert_eq!(py("[#a..a]"), "a");
    assert!(matches!(
        rejects("[#a..5]"),
        Error::Compile(CompileError::RangeCategoryMismatch { .. })
    ));
    assert!(matches!(
        rejects("[#c..a]"),
        Error::Compile(CompileError::ReversedRange { .. })
    ));
}

#[test]
fn test_number_ranges() {
    assert_eq!(py("[#0..5]"), "[0-5]");
    assert_eq!(py("[#0..255]"), r"(?:\d|[1-9]\d|1\d\d|2[0-4]\d|25[0-5])");
    assert_eq!(py("[#-10..10]"), r"-(?:[1-9]|10)|(?:\d|10)");

    let re = matcher("[#ss #-10..10 #es]");
    for n in -15i32..=15 {
        assert_eq!(re.is_match(&n.to_string()), (-10..=10).contains(&n), "{}", n);
    }
}

#[test]
fn test_not() {
    assert_eq!(py("[not 'a']"), "[^a]");
    assert_eq!(py("[not not 'a']"), "a");
    assert_eq!(py("[not ['a' | #d]]"), r"[^\da]");
    assert_eq!(py("[not #a..f]"), "[^a-f]");
    assert!(matches!(
        rejects("[not 'ab']"),
        Error::Compile(CompileError::NotInvertible(_))
    ));
}

// =============================================================================
// Captures and backreferences
// =============================================================================

#[test]
fn test_named_groups_per_flavor() {
    let pattern = "[capture:n 1+ #d]";
    assert_eq!(py(pattern), r"(?P<n>\d+)");
    assert_eq!(
        compile_to_dialect(pattern, Flavor::Javascript).unwrap(),
        r"(?<n>\d+)"
    );
    assert_eq!(
        compile_to_dialect(pattern, Flavor::Rust).unwrap(),
        r"(?P<n>\d+)"
    );
}

#[test]
fn test_backreferences_per_flavor() {
    let pattern = "[capture:w 1+ #l] [#repeat:w]";
    assert_eq!(py(pattern), r"(?P<w>[A-Za-z]+)\ (?P=w)");
    assert_eq!(
        compile_to_dialect(pattern, Flavor::RustFancy).unwrap(),
        r"(?P<w>[A-Za-z]+)\ \k<w>"
    );
    assert_eq!(
        compile_to_dialect(pattern, Flavor::Javascript).unwrap(),
        r"(?<w>[A-Za-z]+)\ \k<w>"
    );
    assert!(matches!(
        compile_to_dialect(pattern, Flavor::Rust),
        Err(Error::Compile(CompileError::UnsupportedByFlavor { .. }))
    ));
}

#[test]
fn test_duplicate_capture_names() {
    assert!(matches!(
        rejects("[capture:x 'a'][capture:x 'b']"),
        Error::Compile(CompileError::DuplicateCaptureName(_))
    ));
}

#[test]
fn test_unresolved_backreference() {
    assert!(matches!(
        rejects("[#rep:nope]"),
        Error::Compile(CompileError::UnresolvedBackreference(_))
    ));
}

#[test]
fn test_captures_extract() {
    let re = matcher("a[#c0]z");
    assert_eq!(
        re.captures("a16z").and_then(|c| c.get(1)).map(|m| m.as_str()),
        Some("16")
    );
    assert_eq!(
        re.captures("azure").and_then(|c| c.get(1)).map(|m| m.as_str()),
        Some("")
    );
    assert!(matcher("a[#c1]z").captures("azure").is_none());
}

// =============================================================================
// Anchors, flags, comments
// =============================================================================

#[test]
fn test_anchors_per_flavor() {
    let pattern = "[#ss 'a' #es]";
    assert_eq!(py(pattern), r"\Aa\Z");
    assert_eq!(compile_to_dialect(pattern, Flavor::Rust).unwrap(), r"\Aa\z");
    assert_eq!(
        compile_to_dialect(pattern, Flavor::Javascript).unwrap(),
        "^a$"
    );
}

#[test]
fn test_inline_flags() {
    assert_eq!(py("[ignore_case 'test']"), "(?i:test)");
    assert_eq!(py("[multiline:unset 'a']"), "(?-m:a)");
    assert!(matches!(
        rejects("[unicode:unset 'a']"),
        Error::Compile(CompileError::FlagNotUnsettable('u'))
    ));
}

#[test]
fn test_comments() {
    assert_eq!(py("[comment]"), "");
    assert_eq!(py("[comment 'a']"), "");
    assert_eq!(py("[comment not #token]"), "");
    assert_eq!(py("['a' [comment 'a'] 'b']"), "ab");
}

#[test]
fn test_scoping() {
    assert_eq!(py("[#x=['a'] #x]"), "a");
    assert!(matches!(
        rejects("[[#x=['a'] #x] #x]"),
        Error::Compile(CompileError::UndefinedMacro(_))
    ));
    // one compile's definitions never leak into the next
    assert!(matches!(
        rejects("[#x]"),
        Error::Compile(CompileError::UndefinedMacro(_))
    ));
}

#[test]
fn test_escape_macros() {
    assert_eq!(py("[#dq #q #t #lb #rb]"), "\"'\\t\\[\\]");
}

// =============================================================================
// Composite macros, matched for real
// =============================================================================

#[test]
fn test_decimal_macro() {
    let re = matcher("[#ss #decimal #es]");
    for good in ["0", "0.0", "-0.0", "1234.56"] {
        assert!(re.is_match(good), "{} should match", good);
    }
    for bad in ["0.", ".0", "-0.", "-.0"] {
        assert!(!re.is_match(bad), "{} should not match", bad);
    }
}

#[test]
fn test_float_macro() {
    let re = matcher("[#ss #float #es]");
    for good in [
        "0.0", "-0.0", "0.0e1", "-0.0e1", "0.0e-1", "0.0E1", "0.", "0.e1", ".0", ".0e1",
        "0e1", "1024.12e3", "-1024.12e-3", "-.12e3", "-1024.12E-3",
    ] {
        assert!(re.is_match(good), "{} should match", good);
    }
    for bad in ["0", ".", ".e1", "0.0e"] {
        assert!(!re.is_match(bad), "{} should not match", bad);
    }
}

#[test]
fn test_hex_macro() {
    let re = matcher("[#ss #hexn #es]");
    for good in ["0", "9", "a", "f", "A", "1234567890abcdef", "09af09AF"] {
        assert!(re.is_match(good), "{} should match", good);
    }
    for bad in ["-1", "g", ""] {
        assert!(!re.is_match(bad), "{} should not match", bad);
    }
}

#[test]
fn test_token_macro() {
    let re = matcher("[#ss #token #es]");
    for good in ["a", "abc", "a1", "A", "AbC19", "_", "_a", "_1", "a_b_c"] {
        assert!(re.is_match(good), "{} should match", good);
    }
    for bad in ["1", "1_", "9_", "1234", "!", "a!", "#x", "x ", "x y"] {
        assert!(!re.is_match(bad), "{} should not match", bad);
    }
}

// =============================================================================
// Definitions, recursively
// =============================================================================

#[test]
fn test_recursive_macro_definitions() {
    let pattern = r#"[#recursive_dawg][
        #yo=["Yo dawg, I heard you like "]
        #so_i_put=[", so I put some "]
        #in_your=[" in your "]
        #so_you_can=[" so you can "]
        #while_you=[" while you "]
        #dawg=[#yo "this" #so_i_put "of this" #in_your "regex" #so_you_can "recurse" #while_you "recurse"]
        #recursive_dawg=[#yo #dawg #so_i_put #dawg #in_your #dawg #so_you_can "recurse" #while_you "recurse"]
    ]"#;

    let yo = "Yo dawg, I heard you like ";
    let so_i_put = ", so I put some ";
    let in_your = " in your ";
    let so_you_can = " so you can ";
    let while_you = " while you ";
    let dawg = format!(
        "{yo}this{so_i_put}of this{in_your}regex{so_you_can}recurse{while_you}recurse"
    );
    let expected = format!(
        "{yo}{dawg}{so_i_put}{dawg}{in_your}{dawg}{so_you_can}recurse{while_you}recurse"
    )
    .replace(' ', "\\ ");

    assert_eq!(py(pattern), expected);
}
