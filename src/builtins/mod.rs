//! Built-in functions, organized into the categories the language's
//! reference table groups them into.
//!
//! - **arithmetic** (5): `+ - * / %`
//! - **comparison** (5): `= < <= > >=`
//! - **sequence** (11): `list vector count first last nth prepend append concat vec take splice`
//! - **strings** (6): `pr-str str prn println split join`
//! - **maps** (6): `hash-map assoc dissoc get contains? keys vals`
//! - **predicates** (13): type predicates plus `type`
//! - **misc** (5): `range floor time slurp read-string eval`
//!
//! Each category has its own `register(env)` that defines its builtins
//! directly in the environment; there is no auto-registration machinery,
//! since the list of builtins is small and fixed.

use crate::config::ProgramRoot;
use crate::env::Environment;
use std::cell::RefCell;
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod maps;
pub mod misc;
pub mod predicates;
pub mod sequence;
pub mod strings;

thread_local! {
    static PROGRAM_ROOT: RefCell<Option<ProgramRoot>> = const { RefCell::new(None) };
}

/// Stores the resolved program root so `slurp` can open a capability
/// directory scoped to it.
pub fn set_program_root(root: ProgramRoot) {
    PROGRAM_ROOT.with(|r| *r.borrow_mut() = Some(root));
}

pub(crate) fn with_program_root<T>(f: impl FnOnce(Option<&ProgramRoot>) -> T) -> T {
    PROGRAM_ROOT.with(|r| f(r.borrow().as_ref()))
}

/// Helper used by every category's `register` to install a named builtin.
pub(crate) fn define_builtin(env: &Rc<Environment>, name: &'static str, func: crate::value::BuiltinFn) {
    env.define(
        name.to_string(),
        crate::value::Value::Builtin(Rc::new(crate::value::BuiltinData { name, func })),
    );
}

pub fn register_builtins(env: &Rc<Environment>) {
    arithmetic::register(env);
    comparison::register(env);
    sequence::register(env);
    strings::register(env);
    maps::register(env);
    predicates::register(env);
    misc::register(env);
}
