/// Lexical scopes.
///
/// An environment maps names to values and links to the scope it is nested
/// in. Blocks and function calls each get a fresh one; closures keep theirs
/// alive.
pub mod environment;
/// Tree-walking execution of parsed programs.
///
/// A `Context` walks statements and expressions directly, holding the scope
/// currently in effect. Operators, property access, calls and class
/// instantiation each live in their own submodule.
pub mod evaluator;
/// Source text to tokens.
///
/// Built on a `logos` derive. Every token is paired with the line it starts
/// on, comments and whitespace are dropped, and characters no rule accepts
/// are skipped with a warning.
pub mod lexer;
/// Recursive descent from tokens to `Stmt` trees.
///
/// One function per precedence level, lowest first. Compound assignment,
/// `for` and `do`-`while` are rewritten into simpler nodes here, so the
/// evaluator never sees them.
pub mod parser;
/// What programs compute with.
///
/// `Value` covers the primitives (`null`, booleans, integers, floats,
/// strings, NaN) and the shared, mutable heap values: objects, arrays,
/// functions and classes. Truthiness, coercion, both equalities and the
/// canonical rendering are defined alongside it.
pub mod value;
