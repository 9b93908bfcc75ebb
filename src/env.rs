// Environment frame chain for variable bindings and lexical scope.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent.
    pub fn new() -> Self {
        Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Self {
        Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    /// Builds a child environment with `params` bound to `args`
    /// positionally, used to invoke a closure.
    pub fn extend(parent: Rc<Environment>, params: &[String], args: &[Value]) -> Self {
        let env = Environment::with_parent(parent);
        for (name, value) in params.iter().zip(args.iter()) {
            env.define(name.clone(), value.clone());
        }
        env
    }

    /// Writes a binding in THIS scope unconditionally; never walks the
    /// parent chain.
    pub fn define(&self, name: String, value: Value) -> Value {
        self.bindings.borrow_mut().insert(name, value.clone());
        value
    }

    /// Looks up a symbol in this scope, then ancestors.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Whether `name` is bound directly in this frame; does not walk the
    /// parent chain. Used by `while` to decide which loop-body bindings
    /// should propagate: only names already present in the immediate
    /// enclosing frame, not ones merely reachable through it.
    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// The bindings made directly in this frame (not inherited), used by
    /// `while` to decide which loop-body bindings should propagate to the
    /// enclosing environment once the loop ends.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Integer(42));
        assert_eq!(env.get("x"), Some(Value::Integer(42)));
    }

    #[test]
    fn undefined_symbol_is_none() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Rc::new(Environment::new());
        parent.define("x".to_string(), Value::Integer(1));
        let child = Environment::with_parent(parent);
        child.define("x".to_string(), Value::Integer(2));
        assert_eq!(child.get("x"), Some(Value::Integer(2)));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Rc::new(Environment::new());
        parent.define("x".to_string(), Value::Integer(1));
        let child = Environment::with_parent(parent);
        assert_eq!(child.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn writes_never_touch_parent() {
        let parent = Rc::new(Environment::new());
        parent.define("x".to_string(), Value::Integer(1));
        let child = Environment::with_parent(parent.clone());
        child.define("x".to_string(), Value::Integer(99));
        assert_eq!(parent.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn entries_excludes_inherited_bindings() {
        let parent = Rc::new(Environment::new());
        parent.define("a".to_string(), Value::Integer(1));
        let child = Environment::with_parent(parent);
        child.define("b".to_string(), Value::Integer(2));
        let entries = child.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "b");
    }

    #[test]
    fn has_local_ignores_parent_bindings() {
        let parent = Rc::new(Environment::new());
        parent.define("a".to_string(), Value::Integer(1));
        let child = Environment::with_parent(parent);
        assert!(!child.has_local("a"));
        child.define("a".to_string(), Value::Integer(2));
        assert!(child.has_local("a"));
    }

    #[test]
    fn extend_binds_params_to_args_positionally() {
        let parent = Rc::new(Environment::new());
        let params = vec!["a".to_string(), "b".to_string()];
        let args = vec![Value::Integer(10), Value::Integer(20)];
        let env = Environment::extend(parent, &params, &args);
        assert_eq!(env.get("a"), Some(Value::Integer(10)));
        assert_eq!(env.get("b"), Some(Value::Integer(20)));
    }
}
