use std::{collections::BTreeMap, fmt, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    interpreter::value::core::{Value, write_real},
    util::num::{f64_to_index, i64_to_index},
};

/// Keyed access shared by objects, arrays and classes.
pub trait Property {
    /// Reads the value stored under `key`, or `None` if there is none.
    fn get(&self, key: &Value) -> Option<Value>;
    /// Stores `value` under `key`.
    fn set(&mut self, key: &Value, value: Value);
    /// Returns `true` if something is stored under `key`.
    fn has(&self, key: &Value) -> bool;
}

/// A hashable, ordered form of a value used as an object key.
///
/// Primitives keep their identity, so `o[1]` and `o['1']` are different
/// keys while `o.b` and `o['b']` are the same one. Reference values are keyed
/// by their rendering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    /// `null`
    Null,
    /// A boolean key.
    Bool(bool),
    /// An integer key.
    Integer(i64),
    /// A float key; `OrderedFloat` provides `Eq`, `Ord` and `Hash`.
    Real(OrderedFloat<f64>),
    /// A string key, including property names.
    Str(Rc<str>),
}

impl From<&Value> for PropertyKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Integer(n) => Self::Integer(*n),
            Value::Real(r) => Self::Real(OrderedFloat(*r)),
            Value::Str(s) => Self::Str(Rc::clone(s)),
            other => Self::Str(other.to_string().into()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        Self::Str(name.into())
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write_real(f, r.into_inner()),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A key to value map backing object literals and class instances.
///
/// Keys are kept sorted so renderings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: BTreeMap<PropertyKey, Value>,
}

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under a named property.
    pub fn insert(&mut self, name: &str, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Property for Object {
    fn get(&self, key: &Value) -> Option<Value> {
        self.entries.get(&PropertyKey::from(key)).cloned()
    }

    fn set(&mut self, key: &Value, value: Value) {
        self.entries.insert(key.into(), value);
    }

    fn has(&self, key: &Value) -> bool {
        self.entries.contains_key(&PropertyKey::from(key))
    }
}

/// A zero-indexed sequence that grows on writes past its end.
#[derive(Debug, Clone, Default)]
pub struct Array {
    elements: Vec<Value>,
}

impl From<Vec<Value>> for Array {
    fn from(elements: Vec<Value>) -> Self {
        Self { elements }
    }
}

/// Turns a numeric key into an index; anything else has none.
fn index_of(key: &Value) -> Option<usize> {
    match key {
        Value::Integer(n) => i64_to_index(*n),
        Value::Real(r) => f64_to_index(*r),
        _ => None,
    }
}

impl Array {
    /// Appends a value.
    pub fn push(&mut self, value: Value) {
        self.elements.push(value);
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    /// Number of slots, including unset ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the array has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Property for Array {
    /// Out-of-range, negative and non-numeric keys read as `None`.
    fn get(&self, key: &Value) -> Option<Value> {
        index_of(key).and_then(|index| self.elements.get(index).cloned())
    }

    /// Writing past the end grows the array, filling the gap with `null`.
    /// Negative and non-numeric keys are ignored.
    fn set(&mut self, key: &Value, value: Value) {
        let Some(index) = index_of(key) else {
            return;
        };
        if index >= self.elements.len() {
            self.elements.resize(index + 1, Value::Null);
        }
        self.elements[index] = value;
    }

    fn has(&self, key: &Value) -> bool {
        index_of(key).is_some_and(|index| index < self.elements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_grows_and_fills_with_null() {
        let mut array = Array::default();
        array.set(&Value::Integer(2), Value::Integer(7));
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(&Value::Integer(0)), Some(Value::Null));
        assert_eq!(array.get(&Value::Real(2.9)), Some(Value::Integer(7)));
        assert!(array.has(&Value::Integer(1)));
    }

    #[test]
    fn array_ignores_bad_indices() {
        let mut array = Array::from(vec![Value::Integer(1)]);
        array.set(&Value::Integer(-1), Value::Integer(5));
        array.set(&Value::from("x"), Value::Integer(5));
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(&Value::Integer(-1)), None);
        assert_eq!(array.get(&Value::Integer(4)), None);
        assert_eq!(array.get(&Value::from("0")), None);
        assert!(!array.has(&Value::Integer(-1)));
    }

    #[test]
    fn object_keys_by_identity_of_primitives() {
        let mut object = Object::new();
        object.insert("b", Value::Integer(1));
        object.set(&Value::Integer(1), Value::from("int"));

        assert_eq!(object.get(&Value::from("b")), Some(Value::Integer(1)));
        assert_eq!(object.get(&Value::Integer(1)), Some(Value::from("int")));
        assert_eq!(object.get(&Value::from("1")), None);
        assert!(object.has(&Value::from("b")));
        assert_eq!(object.len(), 2);
    }
}
