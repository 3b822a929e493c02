use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::value::core::Value;

struct Scope {
    parent:   Option<Environment>,
    bindings: HashMap<String, Value>,
}

/// A lexical scope: name to value bindings plus an optional parent.
///
/// Cloning an `Environment` clones the handle, not the bindings, so closures
/// and the evaluator observe the same scope.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// Creates a root scope without a parent.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Scope { parent:   None,
                                          bindings: HashMap::new(), })))
    }

    /// Creates a child scope of `parent`.
    #[must_use]
    pub fn with_parent(parent: &Self) -> Self {
        Self(Rc::new(RefCell::new(Scope { parent:   Some(parent.clone()),
                                          bindings: HashMap::new(), })))
    }

    /// Binds `name` in this scope, replacing any existing binding here.
    /// Parent scopes are never consulted.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(name.to_string(), value);
    }

    /// Looks `name` up in this scope and then each parent outward.
    ///
    /// Returns `None` when no scope in the chain binds it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        if let Some(value) = scope.bindings.get(name) {
            return Some(value.clone());
        }
        scope.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Overwrites `name` in the nearest scope that binds it.
    ///
    /// Returns `false`, leaving every scope untouched, if the name is not
    /// declared anywhere in the chain.
    #[must_use]
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut scope = self.0.borrow_mut();
        if let Some(slot) = scope.bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        match &scope.parent {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
         .field("bindings", &names)
         .field("parent", &scope.parent)
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let global = Environment::new();
        global.define("a", Value::Integer(1));
        let inner = Environment::with_parent(&global);

        assert_eq!(inner.get("a"), Some(Value::Integer(1)));
        assert_eq!(inner.get("b"), None);
    }

    #[test]
    fn define_shadows_without_touching_parent() {
        let global = Environment::new();
        global.define("a", Value::Integer(1));
        let inner = Environment::with_parent(&global);
        inner.define("a", Value::Integer(2));

        assert_eq!(inner.get("a"), Some(Value::Integer(2)));
        assert_eq!(global.get("a"), Some(Value::Integer(1)));
    }

    #[test]
    fn assign_updates_the_declaring_scope() {
        let global = Environment::new();
        global.define("a", Value::Integer(1));
        let inner = Environment::with_parent(&global);

        assert!(inner.assign("a", Value::Integer(3)));
        assert_eq!(global.get("a"), Some(Value::Integer(3)));
    }

    #[test]
    fn assign_to_undeclared_name_fails() {
        let global = Environment::new();
        let inner = Environment::with_parent(&global);

        assert!(!inner.assign("missing", Value::Null));
        assert_eq!(inner.get("missing"), None);
        assert_eq!(global.get("missing"), None);
    }
}
