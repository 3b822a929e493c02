use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::LiteralValue,
    interpreter::value::{
        callable::{Class, Function, NativeFunction},
        property::{Array, Object},
    },
    util::num::i64_to_f64,
};

/// Represents a runtime value in the interpreter.
///
/// Primitive variants are copied on assignment. `Function`, `Native`,
/// `Class`, `Object` and `Array` hold reference-counted handles, so assigning
/// them shares the underlying value and mutation through one binding is
/// visible through every other.
#[derive(Clone)]
pub enum Value {
    /// The `null` value.
    Null,
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A integer value (64 bit integer).
    Integer(i64),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// The result of arithmetic on operands that have no numeric meaning,
    /// such as `1 - 'a'`. Propagates through arithmetic and equality.
    NaN,
    /// A user-defined function together with its closure.
    Function(Rc<Function>),
    /// A function implemented by the host.
    Native(Rc<NativeFunction>),
    /// A class; calling it constructs an instance.
    Class(Rc<Class>),
    /// An object literal or class instance.
    Object(Rc<RefCell<Object>>),
    /// A growable array.
    Array(Rc<RefCell<Array>>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v.into())
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(Rc::new(RefCell::new(v)))
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Null => Self::Null,
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Real(r) => Self::Real(*r),
            LiteralValue::Str(s) => Self::Str(s.as_str().into()),
        }
    }
}

impl Value {
    /// Returns the language-level type name, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "float",
            Self::Str(_) => "string",
            Self::NaN => "NaN",
            Self::Function(_) | Self::Native(_) => "function",
            Self::Class(_) => "class",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }

    /// Decides whether the value counts as true in a condition.
    ///
    /// `null`, `false`, `0`, `0.0` and the empty string are falsy. Anything
    /// else is truthy when its rendering is non-empty.
    ///
    /// # Example
    /// ```
    /// use ecmalite::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Integer(0).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Real(r) => *r != 0.0,
            Self::Str(s) => !s.is_empty(),
            other => !other.to_string().is_empty(),
        }
    }

    /// Coerces the value to a float for mixed arithmetic.
    ///
    /// `null` becomes `0`, booleans become `0` or `1`, and integers are
    /// widened. Every other value has no numeric meaning and yields `None`.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Null => Some(0.0),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Integer(n) => Some(i64_to_f64(*n)),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Compares two values without coercion.
    ///
    /// Primitives compare by value (floats by bit pattern, so `0.0` and
    /// `-0.0` differ), reference values by identity. An integer never equals a
    /// float.
    #[must_use]
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::NaN, Self::NaN) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Compares canonical renderings, which is what `==` does.
    #[must_use]
    pub fn loose_equals(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }

    /// Renders `self`, printing `...` for a container that is already being
    /// rendered further up, so self-referencing values print in linear time.
    fn render(&self, f: &mut fmt::Formatter<'_>, open: &mut Vec<*const ()>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write_real(f, *r),
            Self::Str(s) => write!(f, "{s}"),
            Self::NaN => write!(f, "NaN"),
            Self::Function(function) => write!(f, "<fn {}>", function.name()),
            Self::Native(native) => write!(f, "<native fn {}>", native.name),
            Self::Class(class) => write!(f, "<class {}>", class.name()),
            Self::Object(object) => {
                let address = Rc::as_ptr(object).cast::<()>();
                let Ok(entries) = object.try_borrow() else {
                    return write!(f, "...");
                };
                if open.contains(&address) {
                    return write!(f, "...");
                }
                open.push(address);
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key}:")?;
                    value.render(f, open)?;
                }
                open.pop();
                write!(f, "}}")
            },
            Self::Array(array) => {
                let address = Rc::as_ptr(array).cast::<()>();
                let Ok(elements) = array.try_borrow() else {
                    return write!(f, "...");
                };
                if open.contains(&address) {
                    return write!(f, "...");
                }
                open.push(address);
                write!(f, "[")?;
                for (i, value) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    value.render(f, open)?;
                }
                open.pop();
                write!(f, "]")
            },
        }
    }
}

/// Writes a float in its shortest round-trip form.
///
/// Whole floats print without a fraction (`2.0` renders as `2`), so loose
/// equality treats `1` and `1.0` alike. Magnitudes from `1e21` upwards use
/// exponent notation.
pub(crate) fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_nan() {
        write!(f, "NaN")
    } else if r.is_infinite() {
        write!(f, "{}", if r > 0.0 { "Infinity" } else { "-Infinity" })
    } else if r.abs() >= 1e21 {
        write!(f, "{r:e}")
    } else {
        write!(f, "{r}")
    }
}

/// Canonical rendering, used for printing, loose equality and string
/// concatenation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Integer(n) => write!(f, "Integer({n})"),
            Self::Real(r) => write!(f, "Real({r:?})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            other => write!(f, "{}({other})", other.type_name()),
        }
    }
}

/// Strict equality: the same relation as `===`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        for falsy in [Value::Null, Value::Bool(false), Value::Integer(0), Value::Real(0.0), Value::from("")] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [Value::Bool(true), Value::Integer(-1), Value::Real(0.5), Value::from("a"), Value::NaN] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
        assert!(Value::from(Array::default()).is_truthy());
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::Real(65536.0).to_string(), "65536");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Real(f64::MAX).to_string(), "1.7976931348623157e308");
        assert_eq!(Value::from(Array::from(vec![Value::Integer(1), Value::Null])).to_string(), "[1,null]");
    }

    #[test]
    fn strict_and_loose_equality() {
        assert!(Value::Integer(1).loose_equals(&Value::Real(1.0)));
        assert!(!Value::Integer(1).strict_equals(&Value::Real(1.0)));
        assert!(Value::Integer(1).loose_equals(&Value::from("1")));

        let array = Value::from(Array::default());
        assert!(array.strict_equals(&array.clone()));
        assert!(!array.strict_equals(&Value::from(Array::default())));
    }

    #[test]
    fn self_referencing_array_renders() {
        let array = Rc::new(RefCell::new(Array::default()));
        let value = Value::Array(Rc::clone(&array));
        array.borrow_mut().push(value.clone());
        assert_eq!(value.to_string(), "[...]");
    }

    #[test]
    fn many_self_references_render_once_each() {
        let object = Rc::new(RefCell::new(Object::new()));
        let value = Value::Object(Rc::clone(&object));
        for key in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            object.borrow_mut().insert(key, value.clone());
        }
        assert_eq!(value.to_string(), "{a:...,b:...,c:...,d:...,e:...,f:...,g:...,h:...}");
        assert!(value.loose_equals(&value));
    }

    #[test]
    fn shared_values_that_are_not_cycles_render_in_full() {
        let inner = Value::from(Array::from(vec![Value::Integer(1)]));
        let outer = Value::from(Array::from(vec![inner.clone(), inner]));
        assert_eq!(outer.to_string(), "[[1],[1]]");
    }
}
