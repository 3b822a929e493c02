use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation between two already evaluated values.
    ///
    /// Arithmetic operators go to `eval_arithmetic`, equality and relational
    /// operators to `eval_comparison`, and bitwise and shift operators to
    /// `eval_bitwise`. The logical operators are not binary operations here
    /// because they short-circuit; see `eval_logical`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Value::Integer(3);
    /// let right = Value::Integer(4);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right, 1);
    /// assert_eq!(result.unwrap(), Value::Integer(7));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{
            Add, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod,
            Mul, NotEqual, Pow, Shl, Shr, StrictEqual, StrictNotEqual, Sub, UShr,
        };

        match op {
            Add | Sub | Mul | Div | Mod | Pow => Self::eval_arithmetic(op, left, right, line),

            Equal | NotEqual | StrictEqual | StrictNotEqual | Less | LessEqual | Greater
            | GreaterEqual => Self::eval_comparison(op, left, right, line),

            BitAnd | BitOr | BitXor | Shl | Shr | UShr => Self::eval_bitwise(op, left, right, line),
        }
    }
}
