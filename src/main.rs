mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod printer;
mod reader;
mod value;

use builtins::register_builtins;
use clap::Parser;
use config::{ProgramRoot, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::Environment;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::rc::Rc;

/// A small Lisp-family interpreter with tail-call evaluation and a unified
/// value model.
#[derive(Parser, Debug)]
#[command(name = "plp")]
#[command(version)]
#[command(about = "A small Lisp-family interpreter")]
struct CliArgs {
    /// Source files to execute, in order. With none given, starts the REPL.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

/// Evaluated into the root environment at startup; the external-interface
/// contract every PLP program may rely on.
const BOOTSTRAP: &[&str] = &[
    "(define not (fn (a) (if a false true)))",
    "(define load-file (fn (f) (eval (read-string (str \"(do \" (slurp f) \"\\nnil)\")))))",
    "(define time-ms (fn () (floor (/ (time) 1e6))))",
    "(define length (fn (string) (count (split \"\" string))))",
    "(define ** (fn (a b) (if (= b 1) a (if (= b 0) 1 (* a (** a (- b 1)))))))",
    "(define // (fn (a b) (floor (/ a b))))",
];

fn main() {
    let args = CliArgs::parse();

    let root_env = Rc::new(Environment::new());
    register_builtins(&root_env);
    builtins::misc::set_root_env(root_env.clone());

    let program_root = ProgramRoot::resolve().unwrap_or_else(|e| {
        eprintln!("warning: couldn't resolve program root: {}", e);
        std::process::exit(1);
    });
    let root_path = program_root.path().to_path_buf();
    builtins::set_program_root(program_root);

    for source in BOOTSTRAP {
        if let Err(e) = run_form(source, &root_env) {
            eprintln!("{}", e.labelled());
            std::process::exit(1);
        }
    }

    if args.files.is_empty() {
        repl(&root_env);
    } else {
        batch(&args.files, &root_path, &root_env);
    }
}

fn run_form(source: &str, env: &Rc<Environment>) -> Result<value::Value, error::PlpError> {
    let ast = reader::read_str(source)?;
    eval::eval(ast, env.clone())
}

fn repl(env: &Rc<Environment>) {
    println!("{} - {}", WELCOME_MESSAGE, WELCOME_SUBTITLE);

    let mut rl = DefaultEditor::new().expect("failed to initialize the line editor");

    let history_path = history_file_path();
    let _ = rl.load_history(&history_path);
    let _ = rl.history_mut().set_max_len(1000);

    loop {
        match rl.readline("plp> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                match run_form(&line, env) {
                    Ok(value) => println!("{}", printer::pr_str(&value, true)),
                    Err(e) => eprintln!("{}", e.labelled()),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
}

fn history_file_path() -> PathBuf {
    let mut path = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    path.push(".plp-history");
    path
}

fn batch(files: &[PathBuf], root_path: &std::path::Path, env: &Rc<Environment>) {
    let missing: Vec<&PathBuf> = files.iter().filter(|f| !root_path.join(f).exists()).collect();
    if !missing.is_empty() {
        let list = missing.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
        eprintln!("{}", error::PlpError::Generic(format!("missing file(s): {}", list)).labelled());
        std::process::exit(1);
    }

    for file in files {
        let form = format!("(load-file \"{}\")", file.display());
        if let Err(e) = run_form(&form, env) {
            eprintln!("{}", e.labelled());
            std::process::exit(1);
        }
    }
}
