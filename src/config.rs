//! Program root resolution for `slurp` and the bootstrap `load-file`.
//!
//! File arguments given on the command line and to `slurp` are resolved
//! relative to a single root directory, not the process's current working
//! directory. The root is two levels up from the running executable
//! (`<root>/target/debug/plp` -> `<root>`), mirroring how the reference
//! implementation resolves paths relative to its own script location
//! rather than the caller's shell.

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use std::path::PathBuf;

pub const WELCOME_MESSAGE: &str = "plp";
pub const WELCOME_SUBTITLE: &str = "a small Lisp-family interpreter";

/// A capability handle to the directory `slurp` is allowed to read from.
#[derive(Debug)]
pub struct ProgramRoot {
    dir: Dir,
    path: PathBuf,
}

impl ProgramRoot {
    /// Resolves the root as two directories up from the current executable,
    /// then opens it as an ambient-authority capability directory.
    pub fn resolve() -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let path = exe
            .parent()
            .and_then(|p| p.parent())
            .ok_or_else(|| std::io::Error::other("executable has no grandparent directory"))?
            .to_path_buf();
        let dir = Dir::open_ambient_dir(&path, ambient_authority())?;
        Ok(ProgramRoot { dir, path })
    }

    pub fn read_to_string(&self, relative: &str) -> std::io::Result<String> {
        self.dir.read_to_string(relative)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
