use std::{cell::RefCell, rc::Rc};

use tracing::trace;

use crate::{
    ast::{ClassDecl, ClassMember, Expr},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{Context, EvalResult, Flow},
        value::{
            callable::{Class, Function},
            core::Value,
            property::Object,
        },
    },
};

/// Name of the method run when a class is instantiated.
pub const CONSTRUCTOR: &str = "constructor";

impl Context {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then the arguments from left to right.
    /// An empty argument slot, as in `f(1,,2)`, passes `null`.
    pub fn eval_call(&mut self, callee: &Expr, arguments: &[Option<Expr>], line: usize) -> EvalResult<Value> {
        let callee = self.eval(callee)?;

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(match argument {
                            Some(expr) => self.eval(expr)?,
                            None => Value::Null,
                        });
        }

        self.call_value(&callee, &values, line)
    }

    /// Calls a function, native function or class with evaluated arguments.
    ///
    /// # Errors
    /// `NotCallable` when `callee` is any other kind of value.
    pub fn call_value(&mut self, callee: &Value, arguments: &[Value], line: usize) -> EvalResult<Value> {
        trace!(%callee, arguments = arguments.len(), line, "call");

        match callee {
            Value::Function(function) => self.call_function(function, arguments),
            Value::Native(native) => (native.function)(arguments, line),
            Value::Class(class) => self.instantiate(class, arguments),
            other => Err(RuntimeError::NotCallable { value: other.to_string(),
                                                     line }),
        }
    }

    /// Runs a user function.
    ///
    /// Parameters are bound in a fresh child scope of the closure. Missing
    /// arguments bind to `null` and extra ones are ignored. The result is the
    /// returned value, or `null` when the body finishes without `return`.
    pub fn call_function(&mut self, function: &Function, arguments: &[Value]) -> EvalResult<Value> {
        let scope = Environment::with_parent(&function.closure);
        for (index, param) in function.decl.params.iter().enumerate() {
            scope.define(param, arguments.get(index).cloned().unwrap_or(Value::Null));
        }

        match self.execute_in(&function.decl.body, scope)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Null),
        }
    }

    /// Creates a class value from its declaration.
    ///
    /// Instance field initializers run now, in the current scope, and the
    /// results become the defaults copied onto every instance. Static fields
    /// and methods are stored on the class; static methods see the class
    /// itself as `this`.
    pub fn create_class(&mut self, decl: &Rc<ClassDecl>) -> EvalResult<Value> {
        let mut fields = Vec::new();
        for member in &decl.members {
            if let ClassMember::Field { name,
                                        initializer,
                                        is_static: false,
                                        .. } = member
            {
                fields.push((name.clone(), self.eval_initializer(initializer.as_ref())?));
            }
        }

        let class = Rc::new(Class { decl:    Rc::clone(decl),
                                    closure: self.environment().clone(),
                                    statics: RefCell::new(Object::new()),
                                    fields, });
        let value = Value::Class(Rc::clone(&class));

        let static_scope = Environment::with_parent(self.environment());
        static_scope.define("this", value.clone());

        for member in decl.members.iter().filter(|member| member.is_static()) {
            let member_value = match member {
                ClassMember::Field { initializer, .. } => self.eval_initializer(initializer.as_ref())?,
                ClassMember::Method { function, .. } => {
                    Value::Function(Rc::new(Function::new(Rc::clone(function), static_scope.clone())))
                },
            };
            class.statics.borrow_mut().insert(member.name(), member_value);
        }

        Ok(value)
    }

    fn eval_initializer(&mut self, initializer: Option<&Expr>) -> EvalResult<Value> {
        match initializer {
            Some(expr) => self.eval(expr),
            None => Ok(Value::Null),
        }
    }

    /// Constructs an instance of `class`.
    ///
    /// The instance receives the field defaults, then every instance method
    /// bound to a scope where `this` is the instance. A `constructor` method,
    /// if declared, runs last with the call's arguments and is not stored on
    /// the instance; its return value is discarded and the instance is always
    /// the result.
    pub fn instantiate(&mut self, class: &Class, arguments: &[Value]) -> EvalResult<Value> {
        let mut fields = Object::new();
        for (name, value) in &class.fields {
            fields.insert(name, value.clone());
        }
        let instance = Rc::new(RefCell::new(fields));
        let this = Value::Object(Rc::clone(&instance));

        let bound = Environment::with_parent(&class.closure);
        bound.define("this", this.clone());

        let mut constructor = None;
        for member in &class.decl.members {
            let ClassMember::Method { function,
                                      is_static: false, } = member
            else {
                continue;
            };

            let method = Rc::new(Function::new(Rc::clone(function), bound.clone()));
            if member.name() == CONSTRUCTOR {
                constructor = Some(method);
            } else {
                instance.borrow_mut().insert(member.name(), Value::Function(method));
            }
        }

        if let Some(constructor) = constructor {
            self.call_function(&constructor, arguments)?;
        }

        Ok(this)
    }
}
