/// Failures raised while turning source text into statements.
///
/// Lexing and parsing share this type; both stop at the first problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token that no grammar rule accepts at this point.
    UnexpectedToken {
        /// Description of the offending token.
        token: String,
        /// Line of the failure.
        line:  usize,
    },
    /// The token stream ran out in the middle of a construct.
    UnexpectedEndOfInput {
        /// The line of the last token read.
        line: usize,
    },
    /// A specific token was required but something else was found.
    ExpectedToken {
        /// What the parser was looking for, e.g. `')' after arguments`.
        expected: &'static str,
        /// The token actually found.
        found:    String,
        /// Line of the failure.
        line:     usize,
    },
    /// The left-hand side of an assignment is not a variable or property.
    InvalidAssignmentTarget {
        /// Rendering of the rejected target.
        target: String,
        /// Line of the failure.
        line:   usize,
    },
    /// More than the allowed number of call arguments.
    TooManyArguments {
        /// The allowed maximum.
        limit: usize,
        /// Line of the failure.
        line:  usize,
    },
    /// More than the allowed number of function parameters.
    TooManyParameters {
        /// The allowed maximum.
        limit: usize,
        /// Line of the failure.
        line:  usize,
    },
    /// A string literal is missing its closing quote.
    UnterminatedString {
        /// Line of the failure.
        line: usize,
    },
    /// An integer literal that does not fit in an `i64`.
    LiteralTooLarge {
        /// Line of the failure.
        line: usize,
    },
}

impl ParseError {
    /// Places an end-of-input error on `line`; other errors are unchanged.
    #[must_use]
    pub fn at_end_of(self, line: usize) -> Self {
        match self {
            Self::UnexpectedEndOfInput { .. } => Self::UnexpectedEndOfInput { line },
            other => other,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: unexpected token {token}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: input ended early.")
            },

            Self::ExpectedToken { expected, found, line } => {
                write!(f, "Error on line {line}: Expected {expected}, found {found}.")
            },

            Self::InvalidAssignmentTarget { target, line } => {
                write!(f, "Error on line {line}: Invalid assignment target '{target}'.")
            },

            Self::TooManyArguments { limit, line } => {
                write!(f, "Error on line {line}: Can't have more than {limit} arguments.")
            },

            Self::TooManyParameters { limit, line } => {
                write!(f, "Error on line {line}: Can't have more than {limit} parameters.")
            },

            Self::UnterminatedString { line } => {
                write!(f, "Error on line {line}: Unterminated string.")
            },

            Self::LiteralTooLarge { line } => {
                write!(f, "Error on line {line}: integer literal out of range.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
