use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator, Stmt},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_logical_or, statement::parse_declaration, utils::skip_semicolons},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// What an assignment token turns into once desugared.
enum Assignment {
    Plain,
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

fn token_to_assignment(token: &Token) -> Option<Assignment> {
    let assignment = match token {
        Token::Equals => Assignment::Plain,
        Token::PlusAssign => Assignment::Binary(BinaryOperator::Add),
        Token::MinusAssign => Assignment::Binary(BinaryOperator::Sub),
        Token::StarAssign => Assignment::Binary(BinaryOperator::Mul),
        Token::SlashAssign => Assignment::Binary(BinaryOperator::Div),
        Token::PercentAssign => Assignment::Binary(BinaryOperator::Mod),
        Token::StarStarAssign => Assignment::Binary(BinaryOperator::Pow),
        Token::AmpersandAssign => Assignment::Binary(BinaryOperator::BitAnd),
        Token::PipeAssign => Assignment::Binary(BinaryOperator::BitOr),
        Token::CaretAssign => Assignment::Binary(BinaryOperator::BitXor),
        Token::LessLessAssign => Assignment::Binary(BinaryOperator::Shl),
        Token::GreaterGreaterAssign => Assignment::Binary(BinaryOperator::Shr),
        Token::GreaterGreaterGreaterAssign => Assignment::Binary(BinaryOperator::UShr),
        Token::DoubleAmpersandAssign => Assignment::Logical(LogicalOperator::And),
        Token::DoublePipeAssign => Assignment::Logical(LogicalOperator::Or),
        _ => return None,
    };
    Some(assignment)
}

/// Parses a whole program into its top-level statements.
///
/// Stray semicolons between statements are ignored. Parsing stops at the
/// first error; there is no recovery.
///
/// # Example
/// ```
/// use ecmalite::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("var a = 1; a + 2;").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.len(), 2);
/// assert_eq!(program[0].to_string(), "var a=1;");
/// ```
pub fn parse_program(tokens: &[(Token, usize)]) -> ParseResult<Vec<Stmt>> {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();
    let last_line = tokens.last().map_or(1, |(_, line)| *line);

    loop {
        skip_semicolons(&mut iter);
        if iter.peek().is_none() {
            break;
        }
        let statement = parse_declaration(&mut iter).map_err(|error| error.at_end_of(last_line))?;
        statements.push(statement);
    }

    debug!(count = statements.len(), "parsed program");
    Ok(statements)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, assignment, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := assignment`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_assignment(tokens)
}

/// Parses a right-associative assignment.
///
/// Compound forms are desugared here: `a += b` becomes `a = a + b` and
/// `a ||= b` becomes `a = a || b`. The target must be a variable or a property
/// access; a property target turns the assignment into an `Expr::Set`.
///
/// Grammar: `assignment := logical_or (assign_op assignment)?`
///
/// # Errors
/// `InvalidAssignmentTarget` when the left side is anything else.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_logical_or(tokens)?;

    let (assignment, line) = match tokens.peek() {
        Some((token, line)) => match token_to_assignment(token) {
            Some(assignment) => (assignment, *line),
            None => return Ok(target),
        },
        None => return Ok(target),
    };
    tokens.next();

    if !matches!(target, Expr::Variable { .. } | Expr::Get { .. }) {
        return Err(ParseError::InvalidAssignmentTarget { target: target.to_string(),
                                                         line });
    }

    let right = parse_assignment(tokens)?;
    let value = match assignment {
        Assignment::Plain => right,
        Assignment::Binary(op) => Expr::Binary { left: Box::new(target.clone()),
                                                 op,
                                                 right: Box::new(right),
                                                 line },
        Assignment::Logical(op) => Expr::Logical { left: Box::new(target.clone()),
                                                   op,
                                                   right: Box::new(right),
                                                   line },
    };

    match target {
        Expr::Variable { name, .. } => Ok(Expr::Assign { name,
                                                         value: Box::new(value),
                                                         line }),
        Expr::Get { object, member, .. } => Ok(Expr::Set { object,
                                                           member,
                                                           value: Box::new(value),
                                                           line }),
        other => Err(ParseError::InvalidAssignmentTarget { target: other.to_string(),
                                                           line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn render(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        parse_program(&tokens).unwrap().iter().map(ToString::to_string).collect()
    }

    fn parse_error(source: &str) -> ParseError {
        let tokens = tokenize(source).unwrap();
        parse_program(&tokens).unwrap_err()
    }

    #[test]
    fn program_renders_canonically() {
        assert_eq!(render("{var test = true; class Base { property = 1; method(a) { return 1.0; } } if (1.0) { return test; }}"),
                   "{var test=true;class Base{property=1;method(a){return 1.0;}}if(1.0){return test;}}");
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "var a = [1, 2]; function f(x) { return x * 2; } a[0] = f(a[1]);";
        assert_eq!(render(source), render(source));
    }

    #[test]
    fn compound_assignment_desugars() {
        assert_eq!(render("a += 3;"), "a=a+3;");
        assert_eq!(render("a.b **= 2;"), "a.b=a.b**2;");
        assert_eq!(render("a[0] >>>= 1;"), "a[0]=a[0]>>>1;");
        assert_eq!(render("a ||= b;"), "a=a||b;");
        assert_eq!(render("a &&= b;"), "a=a&&b;");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(render("a = b = 1;"), "a=b=1;");
    }

    #[test]
    fn invalid_assignment_targets_are_rejected() {
        assert!(matches!(parse_error("1 = 2;"), ParseError::InvalidAssignmentTarget { .. }));
        assert!(matches!(parse_error("f() = 2;"), ParseError::InvalidAssignmentTarget { .. }));
        assert!(matches!(parse_error("a + b += 2;"), ParseError::InvalidAssignmentTarget { .. }));
    }

    #[test]
    fn missing_terminators_are_reported() {
        assert!(matches!(parse_error("f(1, 2"), ParseError::UnexpectedEndOfInput { .. }));
        assert_eq!(parse_error("var a = 1;\n\nf(a,\n  2"), ParseError::UnexpectedEndOfInput { line: 4 });
        assert_eq!(parse_error("{\n var a;"), ParseError::UnexpectedEndOfInput { line: 2 });
        assert!(matches!(parse_error("(1 + 2;"), ParseError::ExpectedToken { .. }));
    }
}
