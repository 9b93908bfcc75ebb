//! Hash-map operations: `hash-map assoc dissoc get contains? keys vals`

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::{AtomKey, PlpMap, Value};
use std::rc::Rc;

fn to_key(v: &Value) -> Result<AtomKey, PlpError> {
    AtomKey::from_value(v).ok_or_else(|| PlpError::TypeError("hash-map key".to_string()))
}

/// `(hash-map :a 1 :b 2)` builds a map from alternating key/value args.
pub fn hash_map(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() % 2 != 0 {
        return Err(PlpError::ArgumentCountError("'hash-map' expects an even number of arguments".to_string()));
    }
    let mut pairs = Vec::with_capacity(args.len() / 2);
    for chunk in args.chunks(2) {
        pairs.push((to_key(&chunk[0])?, chunk[1].clone()));
    }
    let map = PlpMap::from_pairs(pairs).map_err(PlpError::SyntaxError)?;
    Ok(Value::HashMap(Rc::new(map)))
}

fn as_map(v: &Value) -> Result<&Rc<PlpMap>, PlpError> {
    match v {
        Value::HashMap(m) => Ok(m),
        _ => Err(PlpError::TypeError("expected a hash-map".to_string())),
    }
}

/// `(assoc m :a 1 :b 2)` returns a new map with the given pairs merged in.
pub fn assoc(args: &[Value]) -> Result<Value, PlpError> {
    if args.is_empty() || (args.len() - 1) % 2 != 0 {
        return Err(PlpError::ArgumentCountError("'assoc' expects a map and an even number of key/value arguments".to_string()));
    }
    let mut map = as_map(&args[0])?.as_ref().clone();
    for chunk in args[1..].chunks(2) {
        map = map.assoc(to_key(&chunk[0])?, chunk[1].clone());
    }
    Ok(Value::HashMap(Rc::new(map)))
}

/// `(dissoc m :a :b)` returns a new map without the given keys.
pub fn dissoc(args: &[Value]) -> Result<Value, PlpError> {
    if args.is_empty() {
        return Err(PlpError::ArgumentCountError("'dissoc' expects at least 1 argument".to_string()));
    }
    let mut map = as_map(&args[0])?.as_ref().clone();
    for key in &args[1..] {
        map = map.dissoc(&to_key(key)?);
    }
    Ok(Value::HashMap(Rc::new(map)))
}

/// `(get :a m)` — key first, then map.
pub fn get(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'get' expects 2 arguments".to_string()));
    }
    let key = to_key(&args[0])?;
    let map = as_map(&args[1])?;
    Ok(map.get(&key).cloned().unwrap_or(Value::Nil))
}

/// `(contains? :a m)` — key first, then map.
pub fn contains(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'contains?' expects 2 arguments".to_string()));
    }
    let key = to_key(&args[0])?;
    let map = as_map(&args[1])?;
    Ok(Value::Boolean(map.get(&key).is_some()))
}

pub fn keys(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'keys' expects 1 argument".to_string()));
    }
    let map = as_map(&args[0])?;
    Ok(Value::list(map.iter().map(|(k, _)| k.into_value()).collect()))
}

pub fn vals(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'vals' expects 1 argument".to_string()));
    }
    let map = as_map(&args[0])?;
    Ok(Value::list(map.iter().map(|(_, v)| v.clone()).collect()))
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "hash-map", hash_map);
    super::define_builtin(env, "assoc", assoc);
    super::define_builtin(env, "dissoc", dissoc);
    super::define_builtin(env, "get", get);
    super::define_builtin(env, "contains?", contains);
    super::define_builtin(env, "keys", keys);
    super::define_builtin(env, "vals", vals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_map_builds_from_pairs() {
        let m = hash_map(&[Value::Keyword("a".into()), Value::Integer(1)]).unwrap();
        assert_eq!(get(&[Value::Keyword("a".into()), m]).unwrap(), Value::Integer(1));
    }

    #[test]
    fn hash_map_rejects_duplicate_keys() {
        assert!(hash_map(&[
            Value::Keyword("a".into()),
            Value::Integer(1),
            Value::Keyword("a".into()),
            Value::Integer(2)
        ])
        .is_err());
    }

    #[test]
    fn assoc_does_not_mutate_the_original_map() {
        let m = hash_map(&[Value::Keyword("a".into()), Value::Integer(1)]).unwrap();
        let m2 = assoc(&[m.clone(), Value::Keyword("b".into()), Value::Integer(2)]).unwrap();
        assert_eq!(contains(&[Value::Keyword("b".into()), m.clone()]).unwrap(), Value::Boolean(false));
        assert_eq!(contains(&[Value::Keyword("b".into()), m2]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn dissoc_removes_key() {
        let m = hash_map(&[Value::Keyword("a".into()), Value::Integer(1)]).unwrap();
        let m2 = dissoc(&[m, Value::Keyword("a".into())]).unwrap();
        assert_eq!(contains(&[Value::Keyword("a".into()), m2]).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn get_missing_key_returns_nil() {
        let m = hash_map(&[]).unwrap();
        assert_eq!(get(&[Value::Keyword("a".into()), m]).unwrap(), Value::Nil);
    }

    #[test]
    fn keys_and_vals_in_insertion_order() {
        let m = hash_map(&[
            Value::Keyword("a".into()),
            Value::Integer(1),
            Value::Keyword("b".into()),
            Value::Integer(2),
        ])
        .unwrap();
        assert_eq!(
            keys(&[m.clone()]).unwrap(),
            Value::list(vec![Value::Keyword("a".into()), Value::Keyword("b".into())])
        );
        assert_eq!(vals(&[m]).unwrap(), Value::list(vec![Value::Integer(1), Value::Integer(2)]));
    }
}
