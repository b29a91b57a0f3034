//! Kleenexp SDK - the public entry point
//!
//! One call runs the whole pipeline: parse the pattern text, compile the
//! AST to assembly IR, render the IR for the requested dialect.
//!
//! ```
//! use kleenexp_sdk::{compile_to_dialect, Flavor};
//!
//! let regex = compile_to_dialect("Number [capture 1+ #digit]", Flavor::Python)?;
//! assert_eq!(regex, r"Number\ (\d+)");
//! # Ok::<(), kleenexp_sdk::Error>(())
//! ```

pub use kleenexp_compiler::compile;
pub use kleenexp_core::{assemble, Ast, CompileError, Error, Flavor, Ir, ParseError, Result};
pub use kleenexp_parser::parse;

/// Compile a kleenexp pattern into a regex string for the given dialect.
///
/// The same (pattern, flavor) pair always produces the same output.
pub fn compile_to_dialect(pattern: &str, flavor: Flavor) -> Result<String> {
    let ast = parse(pattern)?;
    let ir = compile(&ast)?;
    Ok(assemble(&ir, flavor)?)
}

/// The historical name of [`compile_to_dialect`].
pub fn transpile(pattern: &str, flavor: Flavor) -> Result<String> {
    compile_to_dialect(pattern, flavor)
}
