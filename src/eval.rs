// The evaluator: special-form dispatch plus a tail-call rewrite loop that
// keeps iterative and self-recursive-in-tail-position programs from
// growing the host stack.

use crate::env::Environment;
use crate::error::PlpError;
use crate::value::{LambdaData, PlpMap, Value};
use std::rc::Rc;

pub fn eval(ast: Value, env: Rc<Environment>) -> Result<Value, PlpError> {
    let mut ast = ast;
    let mut env = env;

    loop {
        match &ast {
            Value::Integer(_)
            | Value::Float(_)
            | Value::Boolean(_)
            | Value::String(_)
            | Value::Keyword(_)
            | Value::Nil
            | Value::Closure(_)
            | Value::Builtin(_) => return Ok(ast),

            Value::Symbol(name) => {
                return env
                    .get(name)
                    .ok_or_else(|| PlpError::UndefinedSymbol(name.clone()));
            }

            Value::Vector(items) => {
                let evaluated = items
                    .iter()
                    .map(|item| eval(item.clone(), env.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::vector(evaluated));
            }

            Value::HashMap(map) => {
                let mut pairs = Vec::with_capacity(map.len());
                for (key, value) in map.iter() {
                    pairs.push((key.clone(), eval(value.clone(), env.clone())?));
                }
                let rebuilt = PlpMap::from_pairs(pairs).map_err(|k| {
                    PlpError::SyntaxError(format!(
                        "can't initialize hashmap with two or more same keys: '{}'",
                        k
                    ))
                })?;
                return Ok(Value::HashMap(Rc::new(rebuilt)));
            }

            Value::List(items) => {
                if items.is_empty() {
                    return Ok(ast);
                }

                if let Value::Symbol(op) = &items[0] {
                    match op.as_str() {
                        "define" => return eval_define(&items[1..], &env),
                        "let*" => {
                            let (next_ast, next_env) = eval_let_star(&items[1..], &env)?;
                            ast = next_ast;
                            env = next_env;
                            continue;
                        }
                        "do" => {
                            ast = eval_do(&items[1..], &env)?;
                            continue;
                        }
                        "if" => {
                            ast = eval_if(&items[1..], &env)?;
                            continue;
                        }
                        "fn" => return eval_fn(&items[1..], &env),
                        "while" => return eval_while(&items[1..], &env),
                        "quote" => {
                            if items.len() != 2 {
                                return Err(PlpError::ArgumentCountError(
                                    "operator 'quote' expects 1 argument".to_string(),
                                ));
                            }
                            return Ok(items[1].clone());
                        }
                        _ => {}
                    }
                }

                let op = &items[0];
                let callee = eval(op.clone(), env.clone())?;
                let mut args = Vec::with_capacity(items.len() - 1);
                for arg in &items[1..] {
                    args.push(eval(arg.clone(), env.clone())?);
                }

                match callee {
                    Value::Builtin(b) => return (b.func)(&args),
                    Value::Closure(lambda) => {
                        if lambda.params.len() != args.len() {
                            return Err(PlpError::ArgumentCountError(format!(
                                "expected {} argument(s), got {}",
                                lambda.params.len(),
                                args.len()
                            )));
                        }
                        let new_env = Environment::extend(lambda.env.clone(), &lambda.params, &args);
                        ast = lambda.body.clone();
                        env = Rc::new(new_env);
                        continue;
                    }
                    other => {
                        return Err(PlpError::SyntaxError(format!(
                            "'{}' is not a function; can't apply it on given arguments",
                            other.type_name()
                        )))
                    }
                }
            }
        }
    }
}

fn eval_define(args: &[Value], env: &Rc<Environment>) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError(format!(
            "operator 'define' expects 2 arguments (got {})",
            args.len()
        )));
    }
    match &args[0] {
        Value::Symbol(name) => {
            let value = eval(args[1].clone(), env.clone())?;
            Ok(env.define(name.clone(), value))
        }
        Value::Keyword(k) => Err(PlpError::SyntaxError(format!(
            "operator 'define' can't use keyword ':{}'",
            k
        ))),
        other => Err(PlpError::SyntaxError(format!(
            "operator 'define' can't redefine atom '{}'",
            crate::printer::pr_str(other, true)
        ))),
    }
}

fn eval_let_star(args: &[Value], env: &Rc<Environment>) -> Result<(Value, Rc<Environment>), PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError(format!(
            "operator 'let*' expects 2 arguments (got {})",
            args.len()
        )));
    }
    let bindings = args[0].as_sequence().ok_or_else(|| {
        PlpError::SyntaxError("operator 'let*' expects first parameter to be a list for bindings".to_string())
    })?;

    let local_env = Rc::new(Environment::with_parent(env.clone()));
    for pair in bindings.chunks(2) {
        if pair.len() != 2 {
            return Err(PlpError::SyntaxError(
                "operator 'let*' expects an even number of binding forms".to_string(),
            ));
        }
        match &pair[0] {
            Value::Symbol(name) => {
                let value = eval(pair[1].clone(), local_env.clone())?;
                local_env.define(name.clone(), value);
            }
            _ => return Err(PlpError::SyntaxError("operator 'let*' expects odd bindings to be a symbol".to_string())),
        }
    }
    Ok((args[1].clone(), local_env))
}

fn eval_do(args: &[Value], env: &Rc<Environment>) -> Result<Value, PlpError> {
    if args.is_empty() {
        return Err(PlpError::ArgumentCountError(
            "operator 'do' expects at least 1 argument (got 0)".to_string(),
        ));
    }
    for expr in &args[..args.len() - 1] {
        eval(expr.clone(), env.clone())?;
    }
    Ok(args[args.len() - 1].clone())
}

fn eval_if(args: &[Value], env: &Rc<Environment>) -> Result<Value, PlpError> {
    if args.len() != 2 && args.len() != 3 {
        return Err(PlpError::ArgumentCountError(format!(
            "operator 'if' expects either 2 or 3 arguments (got {})",
            args.len()
        )));
    }
    let condition = eval(args[0].clone(), env.clone())?;
    if condition.is_truthy() {
        Ok(args[1].clone())
    } else if args.len() == 3 {
        Ok(args[2].clone())
    } else {
        Ok(Value::Nil)
    }
}

fn eval_fn(args: &[Value], env: &Rc<Environment>) -> Result<Value, PlpError> {
    if args.len() != 2 {
        return Err(PlpError::ArgumentCountError(format!(
            "operator 'fn' expects 2 arguments (got {})",
            args.len()
        )));
    }
    let param_exprs = args[0]
        .as_sequence()
        .ok_or_else(|| PlpError::SyntaxError("operator 'fn' expects parameters to be in a list".to_string()))?;
    let mut params = Vec::with_capacity(param_exprs.len());
    for p in param_exprs {
        match p {
            Value::Symbol(name) => params.push(name.clone()),
            other => {
                return Err(PlpError::SyntaxError(format!(
                    "operator 'fn' expects parameters to not be atoms; found: {}",
                    crate::printer::pr_str(other, true)
                )))
            }
        }
    }
    Ok(Value::Closure(Rc::new(LambdaData {
        params,
        body: args[1].clone(),
        env: env.clone(),
    })))
}

fn eval_while(args: &[Value], env: &Rc<Environment>) -> Result<Value, PlpError> {
    if args.len() < 2 {
        return Err(PlpError::ArgumentCountError(format!(
            "operator 'while' expects at least 2 arguments (got {})",
            args.len()
        )));
    }
    let condition = &args[0];
    let body = &args[1..];
    let loop_env = Rc::new(Environment::with_parent(env.clone()));

    while eval(condition.clone(), loop_env.clone())?.is_truthy() {
        for expr in body {
            eval(expr.clone(), loop_env.clone())?;
        }
    }

    for (name, value) in loop_env.entries() {
        if env.has_local(&name) {
            env.define(name, value);
        }
    }
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use crate::reader::read_str;

    fn new_root() -> Rc<Environment> {
        let env = Rc::new(Environment::new());
        register_builtins(&env);
        env
    }

    fn run(src: &str) -> Value {
        let env = new_root();
        eval(read_str(src).unwrap(), env).unwrap()
    }

    #[test]
    fn self_evaluating_atoms() {
        assert_eq!(run("42"), Value::Integer(42));
        assert_eq!(run("3.5"), Value::Float(3.5));
        assert_eq!(run("true"), Value::Boolean(true));
        assert_eq!(run("nil"), Value::Nil);
        assert_eq!(run(":kw"), Value::Keyword("kw".to_string()));
    }

    #[test]
    fn undefined_symbol_errors() {
        let env = new_root();
        let result = eval(read_str("undefined-name").unwrap(), env);
        assert!(matches!(result, Err(PlpError::UndefinedSymbol(_))));
    }

    #[test]
    fn define_and_lookup() {
        let env = new_root();
        eval(read_str("(define a 10)").unwrap(), env.clone()).unwrap();
        assert_eq!(eval(read_str("a").unwrap(), env).unwrap(), Value::Integer(10));
    }

    #[test]
    fn let_star_sees_earlier_bindings() {
        assert_eq!(run("(let* ((a 1) (b (+ a 2))) (* a b))"), Value::Integer(3));
    }

    #[test]
    fn if_truthy_and_falsy_branches() {
        assert_eq!(run("(if true 1 2)"), Value::Integer(1));
        assert_eq!(run("(if false 1 2)"), Value::Integer(2));
        assert_eq!(run("(if false 1)"), Value::Nil);
        assert_eq!(run("(if 0 1 2)"), Value::Integer(1));
    }

    #[test]
    fn do_evaluates_in_order_and_returns_last() {
        assert_eq!(run("(do (define a 1) (define a (+ a 1)) a)"), Value::Integer(2));
    }

    #[test]
    fn fn_and_application() {
        assert_eq!(run("((fn (x) (* x x)) 5)"), Value::Integer(25));
    }

    #[test]
    fn closures_capture_environment_by_reference() {
        let env = new_root();
        eval(read_str("(define a 1)").unwrap(), env.clone()).unwrap();
        eval(read_str("(define f (fn () a))").unwrap(), env.clone()).unwrap();
        eval(read_str("(define a 2)").unwrap(), env.clone()).unwrap();
        assert_eq!(eval(read_str("(f)").unwrap(), env).unwrap(), Value::Integer(2));
    }

    #[test]
    fn self_recursive_factorial() {
        let env = new_root();
        eval(
            read_str("(define fact (fn (n) (if (<= n 1) 1 (* n (fact (- n 1))))))").unwrap(),
            env.clone(),
        )
        .unwrap();
        assert_eq!(eval(read_str("(fact 5)").unwrap(), env).unwrap(), Value::Integer(120));
    }

    #[test]
    fn while_mutates_outer_binding_and_discards_loop_locals() {
        assert_eq!(
            run("(do (define a 0) (while (< a 3) (define a (+ a 1))) a)"),
            Value::Integer(3)
        );
        let env = new_root();
        eval(
            read_str("(do (define a 0) (while (< a 1) (define a (+ a 1)) (define local 5)))").unwrap(),
            env.clone(),
        )
        .unwrap();
        let result = eval(read_str("local").unwrap(), env);
        assert!(result.is_err());
    }

    #[test]
    fn while_only_propagates_into_the_immediate_enclosing_frame() {
        assert_eq!(
            run("(do (define a 0) (let* ((dummy 1)) (do (while (< a 3) (define a (+ a 1))) a)))"),
            Value::Integer(0)
        );
    }

    #[test]
    fn tail_calls_do_not_overflow_the_stack() {
        let env = new_root();
        eval(
            read_str("(define count-down (fn (n) (if (= n 0) true (count-down (- n 1)))))").unwrap(),
            env.clone(),
        )
        .unwrap();
        assert_eq!(
            eval(read_str("(count-down 100000)").unwrap(), env).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn quote_returns_argument_unevaluated() {
        assert_eq!(
            run("(quote (+ 1 2))"),
            Value::list(vec![Value::Symbol("+".to_string()), Value::Integer(1), Value::Integer(2)])
        );
        assert_eq!(
            run("'(a b)"),
            Value::list(vec![Value::Symbol("a".to_string()), Value::Symbol("b".to_string())])
        );
    }

    #[test]
    fn not_callable_errors() {
        let env = new_root();
        let result = eval(read_str("(1 2 3)").unwrap(), env);
        assert!(result.is_err());
    }

    #[test]
    fn define_rejects_keyword_key() {
        let env = new_root();
        let result = eval(read_str("(define :k 1)").unwrap(), env);
        assert!(matches!(result, Err(PlpError::SyntaxError(_))));
    }
}
