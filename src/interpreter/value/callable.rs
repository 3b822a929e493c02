use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::{ClassDecl, FunctionDecl},
    interpreter::{
        environment::Environment,
        evaluator::core::EvalResult,
        value::{core::Value, property::Object},
    },
};

/// Signature of a host function: the call arguments and the call's line.
pub type NativeFn = fn(&[Value], usize) -> EvalResult<Value>;

/// A user-defined function: its declaration plus the environment it was
/// created in.
pub struct Function {
    /// The shared declaration holding parameters and body.
    pub decl:    Rc<FunctionDecl>,
    /// Scope the body runs in (as the parent of each call's scope).
    pub closure: Environment,
}

impl Function {
    /// Creates a function closing over `closure`.
    #[must_use]
    pub const fn new(decl: Rc<FunctionDecl>, closure: Environment) -> Self {
        Self { decl, closure }
    }

    /// Returns the declared name, or `anonymous`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("anonymous")
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

/// A function implemented in Rust, such as `console.log`.
pub struct NativeFunction {
    /// Name used when the function is rendered.
    pub name:     &'static str,
    /// The implementation.
    pub function: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// A class value.
///
/// Static members live in `statics` and are reachable as properties of the
/// class itself. Instance field defaults are evaluated once, when the class
/// is created, and copied onto every new instance; instance methods are bound
/// per instance.
pub struct Class {
    /// The shared declaration.
    pub decl:    Rc<ClassDecl>,
    /// Scope the class was declared in.
    pub closure: Environment,
    /// Static fields and methods.
    pub statics: RefCell<Object>,
    /// Instance field names with their default values, in declaration order.
    pub fields:  Vec<(String, Value)>,
}

impl Class {
    /// Returns the declared name, or `anonymous`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("anonymous")
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name())
    }
}
