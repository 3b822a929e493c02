/// Failures raised while a parsed program runs.
///
/// Evaluation stops at the first one; nothing after it executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Read of, or assignment to, a name that no enclosing scope declares.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// Line of the failing expression.
        line: usize,
    },
    /// An operation received operands it cannot work with.
    TypeError {
        /// Explanation of the mismatch.
        details: String,
        /// Line of the failing expression.
        line:    usize,
    },
    /// Tried to call something that is not a function or class.
    NotCallable {
        /// Rendering of the offending value.
        value: String,
        /// Line of the failing expression.
        line:  usize,
    },
    /// `new` was applied to something other than a call expression.
    NewWithoutCall {
        /// Rendering of the offending expression.
        expr: String,
        /// Line of the failing expression.
        line: usize,
    },
    /// `++` or `--` was applied to something that cannot be written back.
    InvalidUpdateTarget {
        /// Rendering of the offending expression.
        expr: String,
        /// Line of the failing expression.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// Line of the failing expression.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not defined.")
            },

            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },

            Self::NotCallable { value, line } => {
                write!(f, "Error on line {line}: '{value}' is not callable.")
            },

            Self::NewWithoutCall { expr, line } => write!(f,
                                                          "Error on line {line}: 'new' must be applied to a call, found '{expr}'."),

            Self::InvalidUpdateTarget { expr, line } => write!(f,
                                                               "Error on line {line}: Invalid increment or decrement target '{expr}'."),

            Self::Overflow { line } => {
                write!(f, "Error on line {line}: Integer overflow.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
