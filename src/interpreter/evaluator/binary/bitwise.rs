use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::f64_to_i64_truncated,
};

impl Context {
    /// Evaluates `& | ^ << >> >>>`.
    ///
    /// Operands are truncated to 64-bit integers first; strings and NaN
    /// produce NaN. Shift counts are masked to `0..64`, and `>>>` shifts in
    /// zeros where `>>` preserves the sign.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_bitwise(BinaryOperator::BitOr, &Value::Integer(1), &Value::Real(2.7), 1);
    /// assert_eq!(result.unwrap(), Value::Integer(3));
    /// ```
    pub fn eval_bitwise(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let (Some(a), Some(b)) = (to_bits(left, line)?, to_bits(right, line)?) else {
            return Ok(Value::NaN);
        };
        let shift = u32::try_from(b & 63).unwrap_or_default();

        Ok(Value::Integer(match op {
                              BinaryOperator::BitAnd => a & b,
                              BinaryOperator::BitOr => a | b,
                              BinaryOperator::BitXor => a ^ b,
                              BinaryOperator::Shl => a.wrapping_shl(shift),
                              BinaryOperator::Shr => a.wrapping_shr(shift),
                              _ => logical_shift_right(a, shift),
                          }))
    }

    /// Evaluates unary `~` on the truncated integer form of `value`.
    ///
    /// `~2.0` is `-3`; strings and NaN give NaN.
    pub fn eval_bit_not(value: &Value, line: usize) -> EvalResult<Value> {
        Ok(to_bits(value, line)?.map_or(Value::NaN, |n| Value::Integer(!n)))
    }
}

/// The integer a bitwise operator works on, or `None` when the result is NaN.
fn to_bits(value: &Value, line: usize) -> EvalResult<Option<i64>> {
    match value {
        Value::Str(_) | Value::NaN => Ok(None),
        Value::Integer(n) => Ok(Some(*n)),
        other => other.as_number()
                      .map(|r| Some(f64_to_i64_truncated(r)))
                      .ok_or_else(|| RuntimeError::TypeError { details: format!("{} has no bitwise form",
                                                                               other.type_name()),
                                                               line }),
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
const fn logical_shift_right(value: i64, shift: u32) -> i64 {
    ((value as u64) >> shift) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinaryOperator, left: Value, right: Value) -> Value {
        Context::eval_bitwise(op, &left, &right, 1).unwrap()
    }

    #[test]
    fn and_or_xor() {
        assert_eq!(eval(BinaryOperator::BitOr, Value::Integer(1), Value::Integer(2)), Value::Integer(3));
        assert_eq!(eval(BinaryOperator::BitAnd, Value::Integer(1), Value::Integer(2)), Value::Integer(0));
        assert_eq!(eval(BinaryOperator::BitXor, Value::Integer(3), Value::Bool(true)), Value::Integer(2));
    }

    #[test]
    fn shifts() {
        assert_eq!(eval(BinaryOperator::Shl, Value::Integer(1), Value::Integer(4)), Value::Integer(16));
        assert_eq!(eval(BinaryOperator::Shr, Value::Integer(-16), Value::Integer(2)), Value::Integer(-4));
        assert_eq!(eval(BinaryOperator::UShr, Value::Integer(-1), Value::Integer(60)), Value::Integer(15));
        assert_eq!(eval(BinaryOperator::Shl, Value::Integer(1), Value::Integer(65)), Value::Integer(2));
    }

    #[test]
    fn strings_give_nan() {
        assert_eq!(eval(BinaryOperator::BitOr, Value::from("1"), Value::Integer(2)), Value::NaN);
        assert_eq!(Context::eval_bit_not(&Value::from("x"), 1).unwrap(), Value::NaN);
    }

    #[test]
    fn bit_not_truncates() {
        assert_eq!(Context::eval_bit_not(&Value::Real(2.0), 1).unwrap(), Value::Integer(-3));
        assert_eq!(Context::eval_bit_not(&Value::Null, 1).unwrap(), Value::Integer(-1));
    }
}
