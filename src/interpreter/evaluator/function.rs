/// Host functions available to every program.
///
/// Registers the `console` object and the `clock` function in a root
/// environment.
pub mod builtin;

/// Calling functions and classes.
///
/// Binds arguments, runs bodies in fresh scopes, creates class values and
/// constructs instances.
pub mod core;
