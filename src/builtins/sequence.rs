//! Sequence operations: `list vector count first last nth prepend append
//! concat vec take splice`

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::Value;
use std::rc::Rc;

pub fn list(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::list(args.to_vec()))
}

pub fn vector(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::vector(args.to_vec()))
}

/// Length of a List/Vector; 0 for anything else, preserved from the
/// original semantics even though it's debatable for e.g. strings.
pub fn count(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'count' expects 1 argument".to_string()));
    }
    Ok(Value::Integer(args[0].as_sequence().map(|s| s.len()).unwrap_or(0) as i64))
}

pub fn first(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'first' expects 1 argument".to_string()));
    }
    let seq = args[0].as_sequence().ok_or_else(|| PlpError::TypeError("first".to_string()))?;
    Ok(seq.first().cloned().unwrap_or(Value::Nil))
}

pub fn last(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'last' expects 1 argument".to_string()));
    }
    let seq = args[0].as_sequence().ok_or_else(|| PlpError::TypeError("last".to_string()))?;
    Ok(seq.last().cloned().unwrap_or(Value::Nil))
}

/// `(nth -1 (list 10 20 30))` -> `30`; negative indices count from the end.
pub fn nth(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'nth' expects 2 arguments".to_string()));
    }
    let index = match &args[0] {
        Value::Integer(n) => *n,
        _ => return Err(PlpError::TypeError("nth".to_string())),
    };
    let seq = args[1].as_sequence().ok_or_else(|| PlpError::TypeError("nth".to_string()))?;
    let len = seq.len() as i64;
    if index >= len || len + index < 0 {
        return Err(PlpError::ArgumentCountError(format!(
            "can't access sequence at position {} (out of bounds)",
            index
        )));
    }
    let resolved = if index >= 0 { index } else { len + index };
    Ok(seq[resolved as usize].clone())
}

pub fn prepend(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'prepend' expects 2 arguments".to_string()));
    }
    let seq = args[1].as_sequence().ok_or_else(|| PlpError::TypeError("prepend".to_string()))?;
    let mut result = Vec::with_capacity(seq.len() + 1);
    result.push(args[0].clone());
    result.extend_from_slice(seq);
    Ok(Value::list(result))
}

pub fn append(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'append' expects 2 arguments".to_string()));
    }
    let seq = args[1].as_sequence().ok_or_else(|| PlpError::TypeError("append".to_string()))?;
    let mut result = seq.to_vec();
    result.push(args[0].clone());
    Ok(Value::list(result))
}

pub fn concat(args: &[Value]) -> Result<Value, PlpError> {
    let mut result = Vec::new();
    for arg in args {
        let seq = arg.as_sequence().ok_or_else(|| PlpError::TypeError("concat".to_string()))?;
        result.extend_from_slice(seq);
    }
    Ok(Value::list(result))
}

pub fn vec(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'vec' expects 1 argument".to_string()));
    }
    let seq = args[0].as_sequence().ok_or_else(|| PlpError::TypeError("vec".to_string()))?;
    Ok(Value::vector(seq.to_vec()))
}

pub fn take(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'take' expects 2 arguments".to_string()));
    }
    let n = match &args[0] {
        Value::Integer(n) if *n >= 0 => *n as usize,
        _ => return Err(PlpError::TypeError("take".to_string())),
    };
    let seq = args[1].as_sequence().ok_or_else(|| PlpError::TypeError("take".to_string()))?;
    Ok(Value::list(seq.iter().take(n).cloned().collect()))
}

/// `(splice s e seq)`: negative `e` counts from the end. Fails when
/// `s > e_resolved`, `s < 0`, or (`e_resolved >= len` and `e_resolved != 0`)
/// — the zero carve-out keeps `(splice 0 0 seq)` legal even on an empty
/// sequence.
pub fn splice(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 3 {
        return Err(PlpError::ArgumentCountError("'splice' expects 3 arguments".to_string()));
    }
    let start = match &args[0] {
        Value::Integer(n) => *n,
        _ => return Err(PlpError::TypeError("splice".to_string())),
    };
    let end = match &args[1] {
        Value::Integer(n) => *n,
        _ => return Err(PlpError::TypeError("splice".to_string())),
    };
    let seq = args[2].as_sequence().ok_or_else(|| PlpError::TypeError("splice".to_string()))?;
    let len = seq.len() as i64;
    let end_resolved = if end > 0 { end } else { len + end };

    if start > end_resolved || start < 0 || (end_resolved >= len && end_resolved != 0) {
        return Err(PlpError::SyntaxError("can't splice given sequence (out of bounds)".to_string()));
    }
    Ok(Value::list(seq[start as usize..end_resolved as usize].to_vec()))
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "list", list);
    super::define_builtin(env, "vector", vector);
    super::define_builtin(env, "count", count);
    super::define_builtin(env, "first", first);
    super::define_builtin(env, "last", last);
    super::define_builtin(env, "nth", nth);
    super::define_builtin(env, "prepend", prepend);
    super::define_builtin(env, "append", append);
    super::define_builtin(env, "concat", concat);
    super::define_builtin(env, "vec", vec);
    super::define_builtin(env, "take", take);
    super::define_builtin(env, "splice", splice);
}
