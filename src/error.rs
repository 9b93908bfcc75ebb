// A single error taxonomy shared by the reader and the evaluator. Every
// failure unwinds all the way to the top-level read-eval-print loop or the
// batch driver, where it is rendered once with a colored label and kind
// name — there is no in-language recovery.

const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlpError {
    #[error("can't perform operation \"{0}\" on different types")]
    TypeError(String),

    #[error("'{0}' not found")]
    UndefinedSymbol(String),

    #[error("{0}")]
    UndefinedPlpType(String),

    #[error("{0}")]
    ArgumentCountError(String),

    #[error("{0}")]
    SyntaxError(String),

    #[error("you sadly can't divide by zero")]
    MathError,

    #[error("{0}")]
    Unmatched(String),

    #[error("{0}")]
    Generic(String),
}

impl PlpError {
    /// The red-bracketed rendering the REPL and batch driver print to
    /// stderr, one label per taxonomy kind.
    pub fn labelled(&self) -> String {
        let label = match self {
            PlpError::TypeError(_) => "type error",
            PlpError::UndefinedSymbol(_) => "undefined symbol",
            PlpError::UndefinedPlpType(_) => "undefined plp type",
            PlpError::ArgumentCountError(_) => "argument count error",
            PlpError::SyntaxError(_) => "syntax error",
            PlpError::MathError => "math error",
            PlpError::Unmatched(_) => "unmatched",
            PlpError::Generic(_) => "error",
        };
        format!("{RED}[{label}]: {self}{RESET}")
    }
}
