use std::{mem, rc::Rc};

use crate::{
    ast::{Expr, Stmt},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        value::{callable::Function, core::Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Outcome of executing a statement.
///
/// `Return` carries the value of a `return` statement up through enclosing
/// blocks, loops and branches until the surrounding function call (or the
/// top-level `interpret`) unwraps it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement; holds the statement's
    /// value.
    Normal(Value),
    /// A `return` is unwinding.
    Return(Value),
}

impl Flow {
    /// Returns the carried value, whichever way control is flowing.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(value) | Self::Return(value) => value,
        }
    }
}

/// Stores the runtime evaluation context.
///
/// The context owns a single "current" environment. Entering a block or a
/// function call swaps it for a child scope and restores the previous one on
/// every exit path, including errors and early returns.
///
/// ## Usage
///
/// A `Context` is created around a root environment and reused across
/// `interpret` calls, so declarations made by one program stay visible to the
/// next (the REPL relies on this).
#[derive(Debug)]
pub struct Context {
    environment: Environment,
}

impl Context {
    /// Creates a context evaluating in `environment`.
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Returns the environment currently in effect.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs a whole program and returns the value of its last statement.
    ///
    /// A top-level `return` stops the program and its value becomes the
    /// result. Declarations and loops yield `null`.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     interpreter::{environment::Environment, evaluator::core::Context, value::core::Value},
    ///     parse,
    /// };
    ///
    /// let program = parse("var a = 2; a * 21;").unwrap();
    /// let mut context = Context::new(Environment::new());
    ///
    /// assert_eq!(context.interpret(&program).unwrap(), Value::Integer(42));
    /// ```
    pub fn interpret(&mut self, statements: &[Stmt]) -> EvalResult<Value> {
        self.execute_sequence(statements).map(Flow::into_value)
    }

    /// Executes `statements` with `environment` as the current scope, then
    /// restores the previous scope whatever the outcome.
    pub fn execute_in(&mut self, statements: &[Stmt], environment: Environment) -> EvalResult<Flow> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_sequence(statements);
        self.environment = previous;
        result
    }

    fn execute_sequence(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        let mut last = Value::Null;
        for statement in statements {
            match self.execute(statement)? {
                Flow::Normal(value) => last = value,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    }

    /// Executes a single statement.
    ///
    /// Blocks run in a fresh child scope. Function and class declarations bind
    /// their value in the current scope. A `Flow::Return` produced anywhere
    /// inside a block, loop body or branch is passed straight up without
    /// running the remaining statements.
    pub fn execute(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Block { statements, .. } => {
                let scope = Environment::with_parent(&self.environment);
                self.execute_in(statements, scope)
            },
            Stmt::Var { name, initializer, .. } => {
                let value = match initializer {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                self.environment.define(name, value);
                Ok(Flow::Normal(Value::Null))
            },
            Stmt::Function { decl } => {
                let function = Rc::new(Function::new(Rc::clone(decl), self.environment.clone()));
                self.environment.define(function.name(), Value::Function(Rc::clone(&function)));
                Ok(Flow::Normal(Value::Null))
            },
            Stmt::Class { decl } => {
                let class = self.create_class(decl)?;
                if let Some(name) = &decl.name {
                    self.environment.define(name, class);
                }
                Ok(Flow::Normal(Value::Null))
            },
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            },
            Stmt::While { condition, body, .. } => {
                while self.eval(condition)?.is_truthy() {
                    if let flow @ Flow::Return(_) = self.execute(body)? {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal(Value::Null))
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            },
            Stmt::Expression { expr, .. } => self.eval(expr).map(Flow::Normal),
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation; it dispatches
    /// on the expression variant.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, line } => self.lookup(name, *line),
            Expr::Assign { name, value, line } => {
                let value = self.eval(value)?;
                self.assign(name, value.clone(), *line)?;
                Ok(value)
            },
            Expr::Binary { left, op, right, line } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_binary(*op, &left, &right, *line)
            },
            Expr::Logical { left, op, right, .. } => self.eval_logical(left, *op, right),
            Expr::Unary { op, operand, line } | Expr::Postfix { op, operand, line } => {
                self.eval_unary(*op, operand, *line)
            },
            Expr::Grouping { expr, .. } => self.eval(expr),
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, *line),
            Expr::Get { object, member, line } => self.eval_get(object, member, *line),
            Expr::Set { object,
                        member,
                        value,
                        line, } => self.eval_set(object, member, value, *line),
            Expr::Array { elements, .. } => self.eval_array_literal(elements),
            Expr::Object { entries, .. } => self.eval_object_literal(entries),
            Expr::Function { decl, .. } => {
                let function = Function::new(Rc::clone(decl), self.environment.clone());
                Ok(Value::Function(Rc::new(function)))
            },
            Expr::Class { decl, .. } => self.create_class(decl),
            Expr::New { call, line } => match call.as_ref() {
                Expr::Call { callee,
                             arguments,
                             line, } => self.eval_call(callee, arguments, *line),
                other => Err(RuntimeError::NewWithoutCall { expr: other.to_string(),
                                                            line: *line, }),
            },
        }
    }

    /// Reads a variable from the current scope chain.
    pub(crate) fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.environment
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Overwrites an existing variable; assigning an undeclared name fails.
    pub(crate) fn assign(&self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        if self.environment.assign(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                  line })
        }
    }
}
