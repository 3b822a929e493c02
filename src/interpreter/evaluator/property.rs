use tracing::trace;

use crate::{
    ast::{Expr, Member},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            property::{Array, Object, Property},
        },
    },
};

/// Reads `key` from `holder`.
///
/// Objects, arrays and classes (their static members) hold properties. A
/// missing key, or a holder of any other kind, reads as `null`.
#[must_use]
pub fn get_property(holder: &Value, key: &Value) -> Value {
    let found = match holder {
        Value::Object(object) => object.borrow().get(key),
        Value::Array(array) => array.borrow().get(key),
        Value::Class(class) => class.statics.borrow().get(key),
        _ => None,
    };
    found.unwrap_or(Value::Null)
}

/// Writes `value` under `key` on `holder`.
///
/// Writes to values that hold no properties are dropped.
pub fn set_property(holder: &Value, key: &Value, value: Value) {
    match holder {
        Value::Object(object) => object.borrow_mut().set(key, value),
        Value::Array(array) => array.borrow_mut().set(key, value),
        Value::Class(class) => class.statics.borrow_mut().set(key, value),
        other => trace!(holder = other.type_name(), %key, "ignoring property write"),
    }
}

/// Whether `expr` reads the same property that `object` and `member` write.
fn reads_target(expr: &Expr, object: &Expr, member: &Member) -> bool {
    matches!(expr, Expr::Get { object: read, member: key, .. } if read.as_ref() == object && key == member)
}

impl Context {
    /// Turns a member into the key it addresses: `o.name` is the string
    /// `"name"`, `o[expr]` is the value of `expr`.
    pub fn eval_member_key(&mut self, member: &Member) -> EvalResult<Value> {
        match member {
            Member::Named(name) => Ok(Value::from(name.as_str())),
            Member::Computed(expr) => self.eval(expr),
        }
    }

    /// Evaluates `object.name` or `object[key]`.
    pub fn eval_get(&mut self, object: &Expr, member: &Member, _line: usize) -> EvalResult<Value> {
        let holder = self.eval(object)?;
        let key = self.eval_member_key(member)?;
        Ok(get_property(&holder, &key))
    }

    /// Evaluates `object.name = value` or `object[key] = value`.
    ///
    /// The holder and key are evaluated once, before the right-hand side, and
    /// the assigned value is the result. A compound assignment such as
    /// `o[k()] += 1` reaches here as `o[k()] = o[k()] + 1`; the read of the
    /// target on the right goes through the already resolved pair.
    pub fn eval_set(&mut self, object: &Expr, member: &Member, value: &Expr, _line: usize) -> EvalResult<Value> {
        let holder = self.eval(object)?;
        let key = self.eval_member_key(member)?;
        let value = match value {
            Expr::Binary { left, op, right, line } if reads_target(left, object, member) => {
                let current = get_property(&holder, &key);
                let right = self.eval(right)?;
                Self::eval_binary(*op, &current, &right, *line)?
            },
            Expr::Logical { left, op, right, .. } if reads_target(left, object, member) => {
                let current = get_property(&holder, &key);
                self.short_circuit(current, *op, right)?
            },
            other => self.eval(other)?,
        };
        set_property(&holder, &key, value.clone());
        Ok(value)
    }

    /// Builds an array; empty slots such as those in `[1,,2]` hold `null`.
    pub fn eval_array_literal(&mut self, elements: &[Option<Expr>]) -> EvalResult<Value> {
        let mut array = Array::default();
        for element in elements {
            let value = match element {
                Some(expr) => self.eval(expr)?,
                None => Value::Null,
            };
            array.push(value);
        }
        Ok(Value::from(array))
    }

    pub fn eval_object_literal(&mut self, entries: &[(String, Expr)]) -> EvalResult<Value> {
        let mut object = Object::new();
        for (name, expr) in entries {
            let value = self.eval(expr)?;
            object.insert(name, value);
        }
        Ok(Value::from(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpreter::environment::Environment, parse};

    fn run(source: &str) -> Value {
        let program = parse(source).unwrap();
        Context::new(Environment::new()).interpret(&program).unwrap()
    }

    #[test]
    fn compound_assignment_evaluates_the_holder_once() {
        let calls = run("var n = 0; var o = {x: 1}; function g() { n++; return o; } g().x += 1; n;");
        assert_eq!(calls, Value::Integer(1));
        assert_eq!(run("var o = {x: 1}; function g() { return o; } g().x += 1; o.x;"), Value::Integer(2));
    }

    #[test]
    fn compound_assignment_evaluates_the_key_once() {
        let array = run("var i = 0; var a = [10, 20, 30]; a[i++] += 5; a;");
        assert_eq!(array.to_string(), "[10,25,30]");
        assert_eq!(run("var i = 0; var a = [10, 20, 30]; a[i++] += 5; i;"), Value::Integer(1));
        assert_eq!(run("var i = 1; var a = [10, 20, 30]; a[i++] ||= 5; a;").to_string(), "[10,20,30]");
    }

    #[test]
    fn reads_from_non_holders_are_null() {
        assert_eq!(get_property(&Value::Integer(1), &Value::from("x")), Value::Null);
        assert_eq!(get_property(&Value::from("abc"), &Value::Integer(0)), Value::Null);
    }

    #[test]
    fn writes_are_shared_through_aliases() {
        let object = Value::from(Object::new());
        let alias = object.clone();
        set_property(&alias, &Value::from("b"), Value::Integer(2));
        assert_eq!(get_property(&object, &Value::from("b")), Value::Integer(2));
    }

    #[test]
    fn writes_to_non_holders_are_dropped() {
        let number = Value::Integer(1);
        set_property(&number, &Value::from("x"), Value::Integer(2));
        assert_eq!(get_property(&number, &Value::from("x")), Value::Null);
    }
}
