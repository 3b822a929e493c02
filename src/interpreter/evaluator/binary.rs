/// Dispatch of binary operators to their handlers.
pub mod core;

/// Arithmetic operators `+ - * / % **`, including string concatenation and
/// NaN propagation.
pub mod arithmetic;

/// Equality and relational operators.
pub mod comparison;

/// Bitwise and shift operators, plus unary `~`.
pub mod bitwise;

/// Short-circuiting `&&` and `||`.
pub mod logic;
