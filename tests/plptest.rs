//! Runs every `.plptest` fixture under `tests/plptest_fixtures/` the way
//! the reference implementation's own test runner does: a form line is
//! followed by either `;err!` (the form must fail), `;<expected>` (the
//! form's `pr-str` must equal `<expected>`), or nothing (run without
//! assertion). Lines starting with `;;` are banners and are skipped.

use plp::builtins::register_builtins;
use plp::env::Environment;
use plp::eval::eval;
use plp::printer::pr_str;
use plp::reader::read_str;
use std::fs;
use std::path::Path;
use std::rc::Rc;

const BOOTSTRAP: &[&str] = &[
    "(define not (fn (a) (if a false true)))",
    "(define time-ms (fn () (floor (/ (time) 1e6))))",
    "(define length (fn (string) (count (split \"\" string))))",
    "(define ** (fn (a b) (if (= b 1) a (if (= b 0) 1 (* a (** a (- b 1)))))))",
    "(define // (fn (a b) (floor (/ a b))))",
];

fn run_form(env: &Rc<Environment>, source: &str) -> Result<String, plp::error::PlpError> {
    let ast = read_str(source)?;
    let value = eval(ast, env.clone())?;
    Ok(pr_str(&value, true))
}

fn run_fixture(path: &Path) {
    let env = Rc::new(Environment::new());
    register_builtins(&env);
    for source in BOOTSTRAP {
        run_form(&env, source).expect("bootstrap definitions must always succeed");
    }

    let contents = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if line.starts_with(";;") || line.is_empty() {
            i += 1;
            continue;
        }
        if line.starts_with(';') {
            // a directive with no preceding form: malformed fixture
            i += 1;
            continue;
        }

        let code = line;
        let directive = lines.get(i + 1).map(|l| l.trim()).unwrap_or("");

        if directive.starts_with(";err!") {
            let result = run_form(&env, code);
            assert!(result.is_err(), "{}:{}: expected `{}` to fail, got {:?}", path.display(), i + 1, code, result);
            i += 2;
        } else if let Some(expected) = directive.strip_prefix(';') {
            let expected = expected.trim();
            let result = run_form(&env, code).unwrap_or_else(|e| panic!("{}:{}: `{}` failed unexpectedly: {}", path.display(), i + 1, code, e));
            assert_eq!(result, expected, "{}:{}: `{}`", path.display(), i + 1, code);
            i += 2;
        } else {
            run_form(&env, code).unwrap_or_else(|e| panic!("{}:{}: `{}` failed unexpectedly: {}", path.display(), i + 1, code, e));
            i += 1;
        }
    }
}

#[test]
fn run_all_plptest_fixtures() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/plptest_fixtures");
    let mut ran_any = false;
    for entry in fs::read_dir(&dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("plptest") {
            ran_any = true;
            run_fixture(&path);
        }
    }
    assert!(ran_any, "no .plptest fixtures found under {}", dir.display());
}
