//! # ecmalite
//!
//! ecmalite is a tree-walking interpreter for a small JavaScript-like
//! scripting language written in Rust.
//! It lexes, parses and evaluates programs with variables, closures, classes,
//! objects, arrays and the usual arithmetic, bitwise and logical operators.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::{
    ast::Stmt,
    error::ParseError,
    interpreter::{
        evaluator::{core::Context, function::builtin::register_globals},
        lexer::tokenize,
        parser::core::parse_program,
    },
};
pub use crate::{
    error::Error,
    interpreter::{environment::Environment, value::core::Value},
};

/// Syntax tree produced by the parser.
///
/// Every `Expr` and `Stmt` node records its source line, and `Display`
/// prints a node in a compact canonical form with no whitespace.
pub mod ast;
/// `ParseError`, `RuntimeError` and the `Error` wrapping both.
pub mod error;
/// Lexer, parser, scopes, values and the evaluator.
///
/// # Responsibilities
/// - Turn source text into tokens and tokens into statements.
/// - Hold variables in nested, shareable scopes.
/// - Execute statements against a scope and report the first failure.
pub mod interpreter;
/// Checked numeric conversions between `i64`, `usize` and `f64`.
pub mod util;

/// Lexes and parses `source` into a list of top-level statements.
///
/// Parsing the same source twice yields identical trees, so comparing
/// statement renderings is a reliable way to check what was parsed.
///
/// # Examples
/// ```
/// use ecmalite::parse;
///
/// let program = parse("var a = 1; if (a) { a = true } else { a = false }").unwrap();
/// let rendered: String = program.iter().map(ToString::to_string).collect();
///
/// assert_eq!(rendered, "var a=1;if(a){a=true;}else{a=false;}");
/// ```
pub fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = tokenize(source)?;
    parse_program(&tokens)
}

/// Returns a fresh root environment with the host globals (`console`,
/// `clock`) defined.
#[must_use]
pub fn global_environment() -> Environment {
    let environment = Environment::new();
    register_globals(&environment);
    environment
}

/// Runs `source` in `environment` and returns the value of its last
/// statement.
///
/// Declarations made by the program stay in `environment`, so several calls
/// sharing one environment behave like consecutive lines of a REPL. A
/// top-level `return` ends the program with its value.
///
/// # Errors
/// Returns `Error::Parse` when the source is malformed and `Error::Runtime`
/// when evaluation fails. Either way nothing after the failure runs.
///
/// # Examples
/// ```
/// use ecmalite::{global_environment, interpret, Value};
///
/// let env = global_environment();
/// interpret("function add(a, b) { return a + b; }", &env).unwrap();
///
/// assert_eq!(interpret("add(1, 2);", &env).unwrap(), Value::Integer(3));
/// assert_eq!(interpret("add(1, 2.5);", &env).unwrap(), Value::Real(3.5));
///
/// // `x` was never declared.
/// assert!(interpret("x = 1;", &env).is_err());
/// ```
pub fn interpret(source: &str, environment: &Environment) -> Result<Value, Error> {
    let program = parse(source)?;
    debug!(statements = program.len(), "interpreting program");

    let mut context = Context::new(environment.clone());
    Ok(context.interpret(&program)?)
}
