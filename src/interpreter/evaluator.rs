/// Binary operator evaluation logic.
///
/// Handles arithmetic (with string concatenation and NaN propagation),
/// comparisons, bitwise operators and the short-circuiting logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical and bitwise not, unary plus, and the
/// increment and decrement operators.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the statement executor, the expression dispatcher, the runtime
/// context with its current environment, and the `Flow` type that carries
/// `return` values upward.
pub mod core;

/// Property access.
///
/// Reads and writes on objects, arrays and classes, and array and object
/// literals.
pub mod property;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, class creation and
/// instantiation.
pub mod function;
