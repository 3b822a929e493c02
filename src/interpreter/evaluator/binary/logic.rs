use crate::{
    ast::{Expr, LogicalOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `&&` and `||` with short-circuiting.
    ///
    /// The left operand is evaluated first. If its truthiness already decides
    /// the result (falsy for `&&`, truthy for `||`) it is returned as is and
    /// the right operand is never evaluated; otherwise the right operand's
    /// value is the result. Neither side is converted to a boolean.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{global_environment, interpret, interpreter::value::core::Value};
    ///
    /// let env = global_environment();
    /// assert_eq!(interpret("0 || 'fallback'", &env).unwrap(), Value::from("fallback"));
    /// assert_eq!(interpret("null && missing", &env).unwrap(), Value::Null);
    /// ```
    pub fn eval_logical(&mut self, left: &Expr, op: LogicalOperator, right: &Expr) -> EvalResult<Value> {
        let left = self.eval(left)?;
        self.short_circuit(left, op, right)
    }

    /// Finishes a logical operation whose left operand is already known.
    pub(crate) fn short_circuit(&mut self, left: Value, op: LogicalOperator, right: &Expr) -> EvalResult<Value> {
        let decided = match op {
            LogicalOperator::And => !left.is_truthy(),
            LogicalOperator::Or => left.is_truthy(),
        };

        if decided { Ok(left) } else { self.eval(right) }
    }
}
