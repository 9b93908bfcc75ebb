//! Type predicates, plus `type` itself: `list? hash-map? nil? symbol?
//! string? number? int? float? true? false? fn? seq? empty? type`

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::Value;
use std::rc::Rc;

fn one_arg<'a>(args: &'a [Value], name: &str) -> Result<&'a Value, PlpError> {
    match args {
        [v] => Ok(v),
        _ => Err(PlpError::ArgumentCountError(format!("'{}' expects 1 argument", name))),
    }
}

pub fn is_list(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "list?")?, Value::List(_))))
}

pub fn is_hash_map(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "hash-map?")?, Value::HashMap(_))))
}

pub fn is_nil(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "nil?")?, Value::Nil)))
}

pub fn is_symbol(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "symbol?")?, Value::Symbol(_))))
}

pub fn is_string(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "string?")?, Value::String(_))))
}

pub fn is_number(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "number?")?, Value::Integer(_) | Value::Float(_))))
}

pub fn is_int(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "int?")?, Value::Integer(_))))
}

pub fn is_float(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "float?")?, Value::Float(_))))
}

pub fn is_true(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "true?")?, Value::Boolean(true))))
}

pub fn is_false(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "false?")?, Value::Boolean(false))))
}

pub fn is_fn(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "fn?")?, Value::Closure(_) | Value::Builtin(_))))
}

pub fn is_seq(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::Boolean(matches!(one_arg(args, "seq?")?, Value::List(_) | Value::Vector(_))))
}

/// Returns `false` (not an error) on non-sequence/non-map arguments — a
/// quirk of the reference implementation preserved for compatibility.
pub fn is_empty(args: &[Value]) -> Result<Value, PlpError> {
    let v = one_arg(args, "empty?")?;
    let empty = match v {
        Value::List(items) | Value::Vector(items) => items.is_empty(),
        Value::HashMap(m) => m.is_empty(),
        _ => false,
    };
    Ok(Value::Boolean(empty))
}

pub fn type_of(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::String(one_arg(args, "type")?.type_name().to_string()))
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "list?", is_list);
    super::define_builtin(env, "hash-map?", is_hash_map);
    super::define_builtin(env, "nil?", is_nil);
    super::define_builtin(env, "symbol?", is_symbol);
    super::define_builtin(env, "string?", is_string);
    super::define_builtin(env, "number?", is_number);
    super::define_builtin(env, "int?", is_int);
    super::define_builtin(env, "float?", is_float);
    super::define_builtin(env, "true?", is_true);
    super::define_builtin(env, "false?", is_false);
    super::define_builtin(env, "fn?", is_fn);
    super::define_builtin(env, "seq?", is_seq);
    super::define_builtin(env, "empty?", is_empty);
    super::define_builtin(env, "type", type_of);
}
