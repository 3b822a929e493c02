use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            property::{get_property, set_property},
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a prefix or postfix unary expression.
    ///
    /// `++` and `--` need the operand as a place to write back to and are
    /// handled by `eval_update`; every other operator works on the operand's
    /// value through `apply_unary`.
    pub fn eval_unary(&mut self, op: UnaryOperator, operand: &Expr, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Increment | UnaryOperator::Decrement => self.eval_update(op, operand, line),
            _ => {
                let value = self.eval(operand)?;
                Self::apply_unary(op, &value, line)
            },
        }
    }

    /// Applies a value-level unary operator.
    ///
    /// - `Negate`: integers and floats are negated, `null` gives `0`, booleans
    ///   are coerced to a float first; anything else gives NaN.
    /// - `Plus`: returns the operand unchanged.
    /// - `Not`: negated truthiness.
    /// - `BitNot`: bitwise complement of the truncated integer.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::apply_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Context::apply_unary(UnaryOperator::Negate, &Value::Bool(true), 1).unwrap();
    /// assert_eq!(v, Value::Real(-1.0));
    ///
    /// let v = Context::apply_unary(UnaryOperator::Not, &Value::from(""), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    /// ```
    pub fn apply_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Null => Ok(Value::Integer(0)),
                Value::Integer(n) => n.checked_neg()
                                      .map(Value::Integer)
                                      .ok_or(RuntimeError::Overflow { line }),
                Value::Real(r) => Ok(Value::Real(-r)),
                Value::Bool(_) => Ok(value.as_number().map_or(Value::NaN, |r| Value::Real(-r))),
                _ => Ok(Value::NaN),
            },
            UnaryOperator::Plus => Ok(value.clone()),
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::BitNot => Self::eval_bit_not(value, line),
            UnaryOperator::Increment | UnaryOperator::Decrement => step(op, value, line),
        }
    }

    /// Evaluates `++` or `--` on a variable or property.
    ///
    /// The new value is written back and is also the value of the
    /// expression, for the prefix and the postfix form alike. For a property
    /// target the holder and key are evaluated once.
    pub fn eval_update(&mut self, op: UnaryOperator, operand: &Expr, line: usize) -> EvalResult<Value> {
        match operand {
            Expr::Variable { name, .. } => {
                let current = self.lookup(name, line)?;
                let next = step(op, &current, line)?;
                self.assign(name, next.clone(), line)?;
                Ok(next)
            },
            Expr::Get { object, member, .. } => {
                let holder = self.eval(object)?;
                let key = self.eval_member_key(member)?;
                let next = step(op, &get_property(&holder, &key), line)?;
                set_property(&holder, &key, next.clone());
                Ok(next)
            },
            Expr::Grouping { expr, .. } => self.eval_update(op, expr, line),
            other => Err(RuntimeError::InvalidUpdateTarget { expr: other.to_string(),
                                                             line }),
        }
    }
}

/// Adds or subtracts one.
///
/// Integers stay integers; other numeric values become floats, and values
/// without a numeric meaning become NaN.
fn step(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
    let delta: i64 = if op == UnaryOperator::Decrement { -1 } else { 1 };

    match value {
        Value::Integer(n) => n.checked_add(delta)
                              .map(Value::Integer)
                              .ok_or(RuntimeError::Overflow { line }),
        Value::Str(_) => Ok(Value::NaN),
        other => Ok(other.as_number()
                         .map_or(Value::NaN, |r| Value::Real(r + if delta < 0 { -1.0 } else { 1.0 }))),
    }
}
