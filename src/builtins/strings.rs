//! String and printing operations: `pr-str str prn println split join`

use crate::env::Environment;
use crate::error::PlpError;
use crate::printer::pr_str as printer_pr_str;
use crate::value::Value;
use std::rc::Rc;

/// `(pr-str 1 "a")` -> `"1 \"a\""` — readably, space-separated.
pub fn pr_str(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::String(
        args.iter().map(|v| printer_pr_str(v, true)).collect::<Vec<_>>().join(" "),
    ))
}

/// `(str 1 "a")` -> `"1a"` — not readably, no separator.
pub fn str_fn(args: &[Value]) -> Result<Value, PlpError> {
    Ok(Value::String(
        args.iter().map(|v| printer_pr_str(v, false)).collect::<Vec<_>>().concat(),
    ))
}

pub fn prn(args: &[Value]) -> Result<Value, PlpError> {
    println!("{}", args.iter().map(|v| printer_pr_str(v, true)).collect::<Vec<_>>().join(" "));
    Ok(Value::Nil)
}

pub fn println_fn(args: &[Value]) -> Result<Value, PlpError> {
    println!("{}", args.iter().map(|v| printer_pr_str(v, false)).collect::<Vec<_>>().join(" "));
    Ok(Value::Nil)
}

/// `(split "," "a,b,c")` -> `(list "a" "b" "c")`; `sep = ""` splits into
/// single-character strings.
pub fn split(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'split' expects 2 arguments".to_string()));
    }
    match (&args[0], &args[1]) {
        (Value::String(sep), Value::String(s)) => {
            let parts = if sep.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(|p| Value::String(p.to_string())).collect()
            };
            Ok(Value::list(parts))
        }
        _ => Err(PlpError::TypeError("split".to_string())),
    }
}

/// `(join ", " (list "hello" "foo" "bar"))` -> `"hello, foo, bar"` —
/// concatenates the unreadable rendering of every element, so a mixed
/// sequence like `(join "-" [1 2 3])` works too.
pub fn join(args: &[Value]) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError("'join' expects 2 arguments".to_string()));
    }
    let sep = match &args[0] {
        Value::String(s) => s.as_str(),
        _ => return Err(PlpError::TypeError("join".to_string())),
    };
    let seq = args[1].as_sequence().ok_or_else(|| PlpError::TypeError("join".to_string()))?;
    let pieces: Vec<String> = seq.iter().map(|v| printer_pr_str(v, false)).collect();
    Ok(Value::String(pieces.join(sep)))
}

pub fn register(env: &Rc<Environment>) {
    super::define_builtin(env, "pr-str", pr_str);
    super::define_builtin(env, "str", str_fn);
    super::define_builtin(env, "prn", prn);
    super::define_builtin(env, "println", println_fn);
    super::define_builtin(env, "split", split);
    super::define_builtin(env, "join", join);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_str_quotes_strings_and_joins_with_space() {
        assert_eq!(
            pr_str(&[Value::Integer(1), Value::String("a".into())]).unwrap(),
            Value::String("1 \"a\"".into())
        );
    }

    #[test]
    fn str_concatenates_without_quoting() {
        assert_eq!(
            str_fn(&[Value::Integer(1), Value::String("a".into())]).unwrap(),
            Value::String("1a".into())
        );
    }

    #[test]
    fn split_on_separator() {
        assert_eq!(
            split(&[Value::String(",".into()), Value::String("a,b,c".into())]).unwrap(),
            Value::list(vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String("c".into())
            ])
        );
    }

    #[test]
    fn split_empty_separator_splits_into_characters() {
        assert_eq!(
            split(&[Value::String("".into()), Value::String("ab".into())]).unwrap(),
            Value::list(vec![Value::String("a".into()), Value::String("b".into())])
        );
    }

    #[test]
    fn join_renders_non_strings_unreadably() {
        let seq = Value::list(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(join(&[Value::String("-".into()), seq]).unwrap(), Value::String("1-2-3".into()));
    }
}
