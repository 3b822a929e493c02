use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::{f64_to_i64_truncated, i64_to_f64},
};

impl Context {
    /// Evaluates `+ - * / % **`.
    ///
    /// The rules are applied in order:
    /// - a NaN operand makes the result NaN;
    /// - two integers stay integer (except `**`, which is always a float);
    /// - a string operand turns `+` into concatenation of the renderings and
    ///   every other operator into NaN;
    /// - otherwise both operands are coerced to floats (`null` is `0`,
    ///   booleans are `0` or `1`). An operand without a numeric meaning, such
    ///   as an array, is a type error.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::eval_arithmetic(BinaryOperator::Add, &Value::Integer(1), &Value::Real(0.5), 1);
    /// assert_eq!(sum.unwrap(), Value::Real(1.5));
    ///
    /// let text = Context::eval_arithmetic(BinaryOperator::Add, &Value::from("a"), &Value::Integer(1), 1);
    /// assert_eq!(text.unwrap(), Value::from("a1"));
    ///
    /// let nan = Context::eval_arithmetic(BinaryOperator::Sub, &Value::Integer(1), &Value::from("test"), 1);
    /// assert_eq!(nan.unwrap(), Value::NaN);
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        match (left, right) {
            (Value::NaN, _) | (_, Value::NaN) => Ok(Value::NaN),
            (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b, line),
            (Value::Str(_), _) | (_, Value::Str(_)) => match op {
                BinaryOperator::Add => Ok(Value::from(format!("{left}{right}"))),
                _ => Ok(Value::NaN),
            },
            _ => match (left.as_number(), right.as_number()) {
                (Some(a), Some(b)) => Ok(real_arithmetic(op, a, b)),
                _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op}' to {} and {}",
                                                                    left.type_name(),
                                                                    right.type_name()),
                                                   line }),
            },
        }
    }
}

fn integer_arithmetic(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<Value> {
    let checked = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Div if b == 0 => return Ok(Value::Real(f64::MAX)),
        BinaryOperator::Div => a.checked_div(b),
        BinaryOperator::Mod if b == 0 => return Ok(Value::NaN),
        BinaryOperator::Mod => Some(a.wrapping_rem(b)),
        _ => return Ok(real_arithmetic(op, i64_to_f64(a), i64_to_f64(b))),
    };

    checked.map(Value::Integer)
           .ok_or(RuntimeError::Overflow { line })
}

fn real_arithmetic(op: BinaryOperator, a: f64, b: f64) -> Value {
    match op {
        BinaryOperator::Add => Value::Real(a + b),
        BinaryOperator::Sub => Value::Real(a - b),
        BinaryOperator::Mul => Value::Real(a * b),
        BinaryOperator::Div if b == 0.0 => Value::Real(f64::MAX),
        BinaryOperator::Div => Value::Real(a / b),
        BinaryOperator::Mod => {
            let (a, b) = (f64_to_i64_truncated(a), f64_to_i64_truncated(b));
            if b == 0 {
                Value::NaN
            } else {
                Value::Integer(a.wrapping_rem(b))
            }
        },
        _ => Value::Real(a.powf(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::property::Array;

    fn eval(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Context::eval_arithmetic(op, &left, &right, 1)
    }

    const fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    const fn real(r: f64) -> Value {
        Value::Real(r)
    }

    #[test]
    fn integers_stay_integers() {
        assert_eq!(eval(BinaryOperator::Add, int(2), int(3)).unwrap(), int(5));
        assert_eq!(eval(BinaryOperator::Div, int(7), int(2)).unwrap(), int(3));
        assert_eq!(eval(BinaryOperator::Mod, int(-7), int(3)).unwrap(), int(-1));
        assert_eq!(eval(BinaryOperator::Pow, int(2), int(10)).unwrap(), real(1024.0));
    }

    #[test]
    fn mixed_operands_promote_to_float() {
        assert_eq!(eval(BinaryOperator::Mul, int(2), real(1.5)).unwrap(), real(3.0));
        assert_eq!(eval(BinaryOperator::Add, Value::Bool(true), int(1)).unwrap(), real(2.0));
        assert_eq!(eval(BinaryOperator::Sub, Value::Null, int(1)).unwrap(), real(-1.0));
    }

    #[test]
    fn modulo_truncates_non_integers() {
        assert_eq!(eval(BinaryOperator::Mod, real(7.9), int(2)).unwrap(), int(1));
        assert_eq!(eval(BinaryOperator::Mod, int(5), int(0)).unwrap(), Value::NaN);
        assert_eq!(eval(BinaryOperator::Mod, real(5.0), real(0.5)).unwrap(), Value::NaN);
    }

    #[test]
    fn division_by_zero_gives_the_largest_float() {
        assert_eq!(eval(BinaryOperator::Div, int(1), int(0)).unwrap(), real(f64::MAX));
        assert_eq!(eval(BinaryOperator::Div, real(1.0), real(0.0)).unwrap(), real(f64::MAX));
    }

    #[test]
    fn strings_concatenate_or_give_nan() {
        assert_eq!(eval(BinaryOperator::Add, int(1), Value::from("a")).unwrap(), Value::from("1a"));
        assert_eq!(eval(BinaryOperator::Add, Value::from("x"), real(1.5)).unwrap(), Value::from("x1.5"));
        assert_eq!(eval(BinaryOperator::Mul, Value::from("2"), int(2)).unwrap(), Value::NaN);
    }

    #[test]
    fn nan_propagates() {
        assert_eq!(eval(BinaryOperator::Add, Value::NaN, Value::from("a")).unwrap(), Value::NaN);
        assert_eq!(eval(BinaryOperator::Pow, int(1), Value::NaN).unwrap(), Value::NaN);
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(eval(BinaryOperator::Add, int(i64::MAX), int(1)),
                         Err(RuntimeError::Overflow { line: 1 })));
        assert!(matches!(eval(BinaryOperator::Div, int(i64::MIN), int(-1)),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn non_numeric_operands_fail() {
        let array = Value::from(Array::default());
        assert!(matches!(eval(BinaryOperator::Sub, array, int(1)), Err(RuntimeError::TypeError { .. })));
    }
}
