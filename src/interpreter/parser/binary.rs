use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses one left-associative binary precedence level.
///
/// Parses an operand with `operand`, then keeps folding `left op right` while
/// the next token maps to an operator that `accepts` allows.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: impl Fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepts: impl Fn(BinaryOperator) -> bool)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;

    while let Some((token, line)) = tokens.peek() {
        let op = match token_to_binary_operator(token) {
            Some(op) if accepts(op) => op,
            _ => break,
        };

        let line = *line;
        tokens.next(); // consume operator

        let right = operand(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }

    Ok(left)
}

/// Parses one short-circuiting level (`||` or `&&`).
fn parse_logical<'a, I>(tokens: &mut Peekable<I>,
                        operand: impl Fn(&mut Peekable<I>) -> ParseResult<Expr>,
                        token: &Token,
                        op: LogicalOperator)
                        -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;

    while let Some((next, line)) = tokens.peek() {
        if next != token {
            break;
        }
        let line = *line;
        tokens.next();

        let right = operand(tokens)?;
        left = Expr::Logical { left: Box::new(left),
                               op,
                               right: Box::new(right),
                               line };
    }

    Ok(left)
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_logical(tokens, parse_logical_and, &Token::DoublePipe, LogicalOperator::Or)
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := bit_or ("&&" bit_or)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_logical(tokens, parse_bit_or, &Token::DoubleAmpersand, LogicalOperator::And)
}

/// Parses bitwise OR expressions: `bit_or := bit_xor ("|" bit_xor)*`
pub fn parse_bit_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_bit_xor, |op| op == BinaryOperator::BitOr)
}

/// Parses bitwise XOR expressions: `bit_xor := bit_and ("^" bit_and)*`
pub fn parse_bit_xor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_bit_and, |op| op == BinaryOperator::BitXor)
}

/// Parses bitwise AND expressions: `bit_and := equality ("&" equality)*`
pub fn parse_bit_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_equality, |op| op == BinaryOperator::BitAnd)
}

/// Parses loose and strict equality.
///
/// The rule is: `equality := relational (("==" | "!=" | "===" | "!==")
/// relational)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_relational, |op| {
        matches!(op,
                 BinaryOperator::Equal
                 | BinaryOperator::NotEqual
                 | BinaryOperator::StrictEqual
                 | BinaryOperator::StrictNotEqual)
    })
}

/// Parses relational operators `<`, `>`, `<=` and `>=`.
///
/// The rule is: `relational := shift (("<" | "<=" | ">" | ">=") shift)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_shift, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::LessEqual
                 | BinaryOperator::Greater
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses bit shifts: `shift := additive (("<<" | ">>" | ">>>") additive)*`
pub fn parse_shift<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_additive, |op| {
        matches!(op, BinaryOperator::Shl | BinaryOperator::Shr | BinaryOperator::UShr)
    })
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := exponent (("*" | "/" | "%") exponent)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, parse_exponent, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
    })
}

/// Parses exponentiation expressions.
///
/// Exponentiation is right-associative: `a ** b ** c` parses as
/// `a ** (b ** c)`, so the right operand recurses into this level.
///
/// The rule is: `exponent := unary ("**" exponent)?`
pub fn parse_exponent<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_unary(tokens)?;

    match tokens.peek() {
        Some((Token::StarStar, line)) => {
            let line = *line;
            tokens.next();
            let exponent = parse_exponent(tokens)?;
            Ok(Expr::Binary { left: Box::new(base),
                              op: BinaryOperator::Pow,
                              right: Box::new(exponent),
                              line })
        },
        _ => Ok(base),
    }
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `None` for tokens that are not binary operators, including the
/// short-circuiting `&&` and `||`, which are handled separately.
///
/// # Example
/// ```
/// use ecmalite::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::GreaterGreaterGreater), Some(BinaryOperator::UShr));
/// assert_eq!(token_to_binary_operator(&Token::DoublePipe), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    use BinaryOperator::{
        Add, BitAnd, BitOr, BitXor, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
        NotEqual, Pow, Shl, Shr, StrictEqual, StrictNotEqual, Sub, UShr,
    };
    match token {
        Token::Plus => Some(Add),
        Token::Minus => Some(Sub),
        Token::Star => Some(Mul),
        Token::Slash => Some(Div),
        Token::Percent => Some(Mod),
        Token::StarStar => Some(Pow),
        Token::Ampersand => Some(BitAnd),
        Token::Pipe => Some(BitOr),
        Token::Caret => Some(BitXor),
        Token::LessLess => Some(Shl),
        Token::GreaterGreater => Some(Shr),
        Token::GreaterGreaterGreater => Some(UShr),
        Token::EqualEqual => Some(Equal),
        Token::BangEqual => Some(NotEqual),
        Token::EqualEqualEqual => Some(StrictEqual),
        Token::BangEqualEqual => Some(StrictNotEqual),
        Token::Less => Some(Less),
        Token::LessEqual => Some(LessEqual),
        Token::Greater => Some(Greater),
        Token::GreaterEqual => Some(GreaterEqual),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{lexer::tokenize, parser::core::parse_expression};

    fn shape(source: &str) -> String {
        fn group(expr: &crate::ast::Expr) -> String {
            use crate::ast::Expr;
            match expr {
                Expr::Binary { left, op, right, .. } => format!("({}{op}{})", group(left), group(right)),
                Expr::Logical { left, op, right, .. } => format!("({}{op}{})", group(left), group(right)),
                other => other.to_string(),
            }
        }
        let tokens = tokenize(source).unwrap();
        group(&parse_expression(&mut tokens.iter().peekable()).unwrap())
    }

    #[test]
    fn exponent_is_right_associative() {
        assert_eq!(shape("4 ** 2 ** 3"), "(4**(2**3))");
    }

    #[test]
    fn arithmetic_is_left_associative() {
        assert_eq!(shape("1 - 2 - 3"), "((1-2)-3)");
        assert_eq!(shape("8 / 4 % 3"), "((8/4)%3)");
    }

    #[test]
    fn precedence_ladder() {
        assert_eq!(shape("a || b && c | d ^ e & f == g < h << i + j * k"),
                   "(a||(b&&(c|(d^(e&(f==(g<(h<<(i+(j*k))))))))))");
    }
}
