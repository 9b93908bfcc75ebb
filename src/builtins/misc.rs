//! Everything that doesn't fit a narrower category: `range floor time
//! slurp read-string eval`

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    /// `eval` needs to reach the root environment, not the (lexically
    /// unrelated) environment it happens to be called from — set once at
    /// startup, mirroring how the reference implementation's `eval`
    /// builtin closes over the interpreter's single global environment.
    static ROOT_ENV: RefCell<Option<Rc<Environment>>> = const { RefCell::new(None) };
}

pub fn set_root_env(env: Rc<Environment>) {
    ROOT_ENV.with(|r| *r.borrow_mut() = Some(env));
}

fn as_int(v: &Value, name: &str) -> Result<i64, PlpError> {
    match v {
        Value::Integer(n) => Ok(*n),
        _ => Err(PlpError::TypeError(name.to_string())),
    }
}

/// `(range -1 4)` -> `(-1 0 1 2 3)`; `(range 3 9 2)` -> `(3 5 7)`; an
/// out-of-order `(start, end)` with a positive step returns an empty list.
pub fn range(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(PlpError::ArgumentCountError("'range' expects 2 or 3 arguments".to_string()));
    }
    let start = as_int(&args[0], "range")?;
    let end = as_int(&args[1], "range")?;
    let step = if args.len() == 3 { as_int(&args[2], "range")? } else { 1 };
    if step == 0 {
        return Err(PlpError::MathError);
    }
    let mut items = Vec::new();
    let mut n = start;
    if step > 0 {
        while n < end {
            items.push(Value::Integer(n));
            n += step;
        }
    } else {
        while n > end {
            items.push(Value::Integer(n));
            n += step;
        }
    }
    Ok(Value::list(items))
}

/// `(floor 8.4231)` -> `8`; `(floor 10)` -> `10`.
pub fn floor(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'floor' expects 1 argument".to_string()));
    }
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => Ok(Value::Integer(n.floor() as i64)),
        _ => Err(PlpError::TypeError("floor".to_string())),
    }
}

/// Nanoseconds since the Unix epoch.
pub fn time(args: &[Value]) -> Result<Value, PlpError> {
    if !args.is_empty() {
        return Err(PlpError::ArgumentCountError("'time' expects 0 arguments".to_string()));
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| PlpError::Generic("system clock is before the Unix epoch".to_string()))?;
    Ok(Value::Integer(elapsed.as_nanos() as i64))
}

/// Reads a file's full contents relative to the configured program root.
pub fn slurp(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'slurp' expects 1 argument".to_string()));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        _ => return Err(PlpError::TypeError("slurp".to_string())),
    };
    super::with_program_root(|root| {
        let root = root.ok_or_else(|| PlpError::Generic("program root is not configured".to_string()))?;
        root.read_to_string(path)
            .map(Value::String)
            .map_err(|e| PlpError::Generic(format!("can't read file \"{}\": {}", path, e)))
    })
}

pub fn read_string(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'read-string' expects 1 argument".to_string()));
    }
    match &args[0] {
        Value::String(s) => crate::reader::read_str(s),
        _ => Err(PlpError::TypeError("read-string".to_string())),
    }
}

/// Evaluates `v` in the root environment, not the environment `eval` was
/// called from.
pub fn eval(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 1 {
        return Err(PlpError::ArgumentCountError("'eval' expects 1 argument".to_string()));
    }
    let root = ROOT_ENV.with(|r| r.borrow().clone());
    let root = root.ok_or_else(|| PlpError::Generic("root environment is not configured".to_string()))?;
    crate::eval::eval(args[0].clone(), root)
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "range", range);
    super::define_builtin(env, "floor", floor);
    super::define_builtin(env, "time", time);
    super::define_builtin(env, "slurp", slurp);
    super::define_builtin(env, "read-string", read_string);
    super::define_builtin(env, "eval", eval);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_defaults_to_step_one() {
        assert_eq!(
            range(&[Value::Integer(-1), Value::Integer(4)]).unwrap(),
            Value::list(vec![
                Value::Integer(-1),
                Value::Integer(0),
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
    }

    #[test]
    fn range_with_explicit_step() {
        assert_eq!(
            range(&[Value::Integer(3), Value::Integer(9), Value::Integer(2)]).unwrap(),
            Value::list(vec![Value::Integer(3), Value::Integer(5), Value::Integer(7)])
        );
    }

    #[test]
    fn range_out_of_order_bounds_is_empty() {
        assert_eq!(range(&[Value::Integer(11), Value::Integer(7)]).unwrap(), Value::list(vec![]));
    }

    #[test]
    fn floor_passes_integers_through() {
        assert_eq!(floor(&[Value::Integer(10)]).unwrap(), Value::Integer(10));
        assert_eq!(floor(&[Value::Float(8.4231)]).unwrap(), Value::Integer(8));
    }

    #[test]
    fn read_string_delegates_to_the_reader() {
        assert_eq!(read_string(&[Value::String("(1 2 3)".into())]).unwrap(), Value::list(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3)
        ]));
    }

    #[test]
    fn eval_runs_in_the_root_environment() {
        let root = Rc::new(Environment::new());
        root.define("x".to_string(), Value::Integer(42));
        set_root_env(root);
        let form = Value::Symbol("x".to_string());
        assert_eq!(eval(&[form]).unwrap(), Value::Integer(42));
    }
}
