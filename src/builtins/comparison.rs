//! Comparison operations: `= < <= > >=`
//!
//! `=` is structural equality per the value model's invariants (delegated
//! to `Value`'s `PartialEq`); the ordering operators take exactly two
//! Numbers.

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::Value;
use std::rc::Rc;

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Integer(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    }
}

pub fn eq(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'=' expects 2 arguments".to_string()));
    }
    Ok(Value::Boolean(args[0] == args[1]))
}

fn order(args: &[Value], name: &str, cmp: impl Fn(f64, f64) -> bool) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError(format!("'{}' expects 2 arguments", name)));
    }
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(a), Some(b)) => Ok(Value::Boolean(cmp(a, b))),
        _ => Err(PlpError::TypeError(name.to_string())),
    }
}

pub fn lt(args: &[Value]) -> Result<Value, PlpError> {
    order(args, "<", |a, b| a < b)
}

pub fn le(args: &[Value]) -> Result<Value, PlpError> {
    order(args, "<=", |a, b| a <= b)
}

pub fn gt(args: &[Value]) -> Result<Value, PlpError> {
    order(args, ">", |a, b| a > b)
}

pub fn ge(args: &[Value]) -> Result<Value, PlpError> {
    order(args, ">=", |a, b| a >= b)
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "=", eq);
    super::define_builtin(env, "<", lt);
    super::define_builtin(env, "<=", le);
    super::define_builtin(env, ">", gt);
    super::define_builtin(env, ">=", ge);
}
