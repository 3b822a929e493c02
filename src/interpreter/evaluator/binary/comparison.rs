use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates equality and relational operators.
    ///
    /// `==` and `!=` compare canonical renderings, so `1 == '1'` and
    /// `1 == 1.0` hold. `===` and `!==` compare without coercion, by identity
    /// for functions, classes, objects and arrays. Either form yields NaN when
    /// an operand is NaN.
    ///
    /// Relational operators are `false` whenever an operand is a string or
    /// NaN. Two integers compare exactly; otherwise both sides are coerced to
    /// floats and an operand without a numeric meaning is a type error.
    ///
    /// # Example
    /// ```
    /// use ecmalite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::Real(3.0);
    /// let b = Value::Integer(5);
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &a, &Value::from("5"), 1);
    /// assert_eq!(result.unwrap(), Value::Bool(false));
    /// ```
    pub fn eval_comparison(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        use BinaryOperator::{Equal, NotEqual, StrictEqual, StrictNotEqual};

        match op {
            Equal | NotEqual | StrictEqual | StrictNotEqual => {
                if matches!(left, Value::NaN) || matches!(right, Value::NaN) {
                    return Ok(Value::NaN);
                }
                Ok(Value::Bool(match op {
                                   Equal => left.loose_equals(right),
                                   NotEqual => !left.loose_equals(right),
                                   StrictEqual => left.strict_equals(right),
                                   _ => !left.strict_equals(right),
                               }))
            },
            _ => relational(op, left, right, line).map(Value::Bool),
        }
    }
}

fn relational(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<bool> {
    let ordering = match (left, right) {
        (Value::Str(_) | Value::NaN, _) | (_, Value::Str(_) | Value::NaN) => return Ok(false),
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                return Err(RuntimeError::TypeError { details: format!("cannot compare {} and {} with '{op}'",
                                                                      left.type_name(),
                                                                      right.type_name()),
                                                     line });
            },
        },
    };

    // An unordered pair (a float NaN) makes every relation false.
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
           BinaryOperator::Less => ordering == Ordering::Less,
           BinaryOperator::LessEqual => ordering != Ordering::Greater,
           BinaryOperator::Greater => ordering == Ordering::Greater,
           _ => ordering != Ordering::Less,
       })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::property::Object;

    fn compare(op: BinaryOperator, left: &Value, right: &Value) -> Value {
        Context::eval_comparison(op, left, right, 1).unwrap()
    }

    #[test]
    fn loose_equality_compares_renderings() {
        assert_eq!(compare(BinaryOperator::Equal, &Value::Integer(1), &Value::from("1")), Value::Bool(true));
        assert_eq!(compare(BinaryOperator::Equal, &Value::Integer(1), &Value::Real(1.0)), Value::Bool(true));
        assert_eq!(compare(BinaryOperator::NotEqual, &Value::Null, &Value::from("null")),
                   Value::Bool(false));
    }

    #[test]
    fn strict_equality_does_not_coerce() {
        assert_eq!(compare(BinaryOperator::StrictEqual, &Value::Integer(1), &Value::Real(1.0)),
                   Value::Bool(false));
        assert_eq!(compare(BinaryOperator::StrictNotEqual, &Value::Integer(1), &Value::from("1")),
                   Value::Bool(true));

        let object = Value::from(Object::new());
        assert_eq!(compare(BinaryOperator::StrictEqual, &object, &object.clone()), Value::Bool(true));
        assert_eq!(compare(BinaryOperator::StrictEqual, &object, &Value::from(Object::new())),
                   Value::Bool(false));
    }

    #[test]
    fn equality_with_nan_is_nan() {
        assert_eq!(compare(BinaryOperator::Equal, &Value::NaN, &Value::NaN), Value::NaN);
        assert_eq!(compare(BinaryOperator::StrictNotEqual, &Value::Integer(1), &Value::NaN), Value::NaN);
    }

    #[test]
    fn relational_operators() {
        assert_eq!(compare(BinaryOperator::LessEqual, &Value::Integer(2), &Value::Integer(2)),
                   Value::Bool(true));
        assert_eq!(compare(BinaryOperator::Greater, &Value::Real(2.5), &Value::Integer(2)), Value::Bool(true));
        assert_eq!(compare(BinaryOperator::GreaterEqual, &Value::Bool(true), &Value::Integer(1)),
                   Value::Bool(true));
        assert_eq!(compare(BinaryOperator::Less, &Value::Null, &Value::Integer(1)), Value::Bool(true));
    }

    #[test]
    fn strings_never_order() {
        assert_eq!(compare(BinaryOperator::Less, &Value::from("a"), &Value::from("b")), Value::Bool(false));
        assert_eq!(compare(BinaryOperator::GreaterEqual, &Value::from("b"), &Value::from("a")),
                   Value::Bool(false));
    }

    #[test]
    fn comparing_objects_fails() {
        let result = Context::eval_comparison(BinaryOperator::Less, &Value::from(Object::new()), &Value::Integer(1), 3);
        assert!(matches!(result, Err(RuntimeError::TypeError { line: 3, .. })));
    }
}
