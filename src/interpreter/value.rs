/// Functions, host functions and classes.
///
/// Defines the callable runtime values. Each user function keeps the
/// `Environment` it was defined in, which is what makes closures work; the
/// calling logic itself lives in the evaluator.
pub mod callable;
/// The `Value` enum.
///
/// Declares every runtime value kind together with truthiness, numeric
/// coercion, strict and loose equality, and canonical rendering.
pub mod core;
/// Keyed containers.
///
/// Defines the `Property` trait and the `Object` and `Array` types that
/// implement it, plus `PropertyKey`, the ordered key form of a value.
pub mod property;
