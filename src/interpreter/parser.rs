/// Binary operator precedence levels.
///
/// One function per level of the ladder from `||` down to `**`, each parsing
/// the next tighter level and folding operators of its own level.
pub mod binary;
/// Parser entry points.
///
/// Defines `ParseResult`, whole-program parsing and assignment handling,
/// including compound-assignment desugaring.
pub mod core;
/// Statements and declarations.
///
/// Blocks, `var`, `if`, loops (with `for` and `do-while` desugared into
/// `while`), `return`, and function and class bodies.
pub mod statement;
/// Prefix, postfix, `new`, call and primary expressions.
pub mod unary;
/// Shared token helpers and list parsing.
pub mod utils;
