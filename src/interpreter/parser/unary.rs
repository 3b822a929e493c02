use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, LiteralValue, Member, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            statement::{parse_class_body, parse_function_rest},
            utils::{
                MAX_ARGUMENTS, end_of_input, expect, match_token, parse_expression_list,
                parse_identifier,
            },
        },
    },
};

const fn token_to_prefix_operator(token: &Token) -> Option<UnaryOperator> {
    match token {
        Token::Minus => Some(UnaryOperator::Negate),
        Token::Plus => Some(UnaryOperator::Plus),
        Token::Bang => Some(UnaryOperator::Not),
        Token::Tilde => Some(UnaryOperator::BitNot),
        Token::PlusPlus => Some(UnaryOperator::Increment),
        Token::MinusMinus => Some(UnaryOperator::Decrement),
        _ => None,
    }
}

/// Parses prefix unary operators.
///
/// Prefix operators nest to the right, so `- -x` negates twice and `!++x`
/// applies `!` to the incremented value.
///
/// The rule is: `unary := ("-" | "+" | "!" | "~" | "++" | "--") unary |
/// postfix`
pub fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let prefix = match tokens.peek() {
        Some((token, line)) => token_to_prefix_operator(token).map(|op| (op, *line)),
        None => None,
    };

    match prefix {
        Some((op, line)) => {
            tokens.next();
            let operand = parse_unary(tokens)?;
            Ok(Expr::Unary { op,
                             operand: Box::new(operand),
                             line })
        },
        None => parse_postfix(tokens),
    }
}

/// Parses a trailing `++` or `--`.
///
/// The rule is: `postfix := new ("++" | "--")?`
pub fn parse_postfix<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let operand = parse_new(tokens)?;

    let op = match tokens.peek() {
        Some((Token::PlusPlus, line)) => (UnaryOperator::Increment, *line),
        Some((Token::MinusMinus, line)) => (UnaryOperator::Decrement, *line),
        _ => return Ok(operand),
    };
    tokens.next();

    Ok(Expr::Postfix { op:      op.0,
                       operand: Box::new(operand),
                       line:    op.1, })
}

/// Parses an optional `new` prefix.
///
/// Whether the wrapped expression really is a call is checked at runtime.
///
/// The rule is: `new := "new" call | call`
pub fn parse_new<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match match_token(tokens, &Token::New) {
        Some(line) => {
            let call = parse_call(tokens)?;
            Ok(Expr::New { call: Box::new(call),
                           line })
        },
        None => parse_call(tokens),
    }
}

/// Parses calls and member accesses chained onto a primary expression.
///
/// Handles `f(args)`, `object.name` and `object[key]` in any order and
/// number, e.g. `f()[0].x(1)`.
///
/// # Errors
/// `TooManyArguments` when a call passes more than the allowed number of
/// arguments.
pub fn parse_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expr = parse_primary(tokens)?;

    loop {
        let Some((token, line)) = tokens.peek() else {
            break;
        };
        let line = *line;

        expr = match token {
            Token::LParen => {
                tokens.next();
                let arguments = parse_expression_list(tokens, &Token::RParen)?;
                if arguments.len() > MAX_ARGUMENTS {
                    return Err(ParseError::TooManyArguments { limit: MAX_ARGUMENTS,
                                                              line });
                }
                Expr::Call { callee: Box::new(expr),
                             arguments,
                             line }
            },
            Token::Dot => {
                tokens.next();
                let name = parse_identifier(tokens)?;
                Expr::Get { object: Box::new(expr),
                            member: Member::Named(name),
                            line }
            },
            Token::LBracket => {
                tokens.next();
                let key = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket, "']' after index")?;
                Expr::Get { object: Box::new(expr),
                            member: Member::Computed(Box::new(key)),
                            line }
            },
            _ => break,
        };
    }

    Ok(expr)
}

/// Parses a primary expression.
///
/// Primary expressions are literals, identifiers, `this`, parenthesized
/// expressions, array and object literals, and function or class literals.
///
/// # Errors
/// `UnexpectedToken` for anything else, `UnexpectedEndOfInput` at the end of
/// the stream.
pub fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(end_of_input());
    };
    let line = *line;

    let literal = |value: LiteralValue| -> ParseResult<Expr> { Ok(Expr::Literal { value, line }) };

    match token {
        Token::Integer(n) => literal(LiteralValue::Integer(*n)),
        Token::Real(r) => literal(LiteralValue::Real(*r)),
        Token::Str(s) => literal(LiteralValue::Str(s.clone())),
        Token::Bool(b) => literal(LiteralValue::Bool(*b)),
        Token::Null => literal(LiteralValue::Null),
        Token::Identifier(name) => Ok(Expr::Variable { name: name.clone(),
                                                       line }),
        Token::This => Ok(Expr::Variable { name: "this".to_string(),
                                           line }),
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "')' after expression")?;
            Ok(Expr::Grouping { expr: Box::new(expr),
                                line })
        },
        Token::LBracket => {
            let elements = parse_expression_list(tokens, &Token::RBracket)?;
            Ok(Expr::Array { elements, line })
        },
        Token::LBrace => parse_object_literal(tokens, line),
        Token::Function => {
            let name = match tokens.peek() {
                Some((Token::Identifier(_), _)) => Some(parse_identifier(tokens)?),
                _ => None,
            };
            let decl = parse_function_rest(tokens, name, line)?;
            Ok(Expr::Function { decl: Rc::new(decl),
                                line })
        },
        Token::Class => {
            let name = match tokens.peek() {
                Some((Token::Identifier(_), _)) => Some(parse_identifier(tokens)?),
                _ => None,
            };
            let decl = parse_class_body(tokens, name, line)?;
            Ok(Expr::Class { decl: Rc::new(decl),
                             line })
        },
        tok => Err(ParseError::UnexpectedToken { token: tok.to_string(),
                                                 line }),
    }
}

/// Parses the entries of an object literal after its opening `{`.
///
/// Keys are identifiers or string literals; a trailing comma is allowed.
///
/// Grammar: `object := "{" (key ":" expression ("," key ":" expression)*
/// ","?)? "}"`
fn parse_object_literal<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut entries = Vec::new();

    loop {
        if match_token(tokens, &Token::RBrace).is_some() {
            break;
        }

        let key = match tokens.next() {
            Some((Token::Identifier(name) | Token::Str(name), _)) => name.clone(),
            Some((tok, line)) => {
                return Err(ParseError::ExpectedToken { expected: "property name",
                                                       found:    tok.to_string(),
                                                       line:     *line, });
            },
            None => return Err(end_of_input()),
        };
        expect(tokens, &Token::Colon, "':' after property name")?;
        entries.push((key, parse_expression(tokens)?));

        if match_token(tokens, &Token::Comma).is_none() {
            expect(tokens, &Token::RBrace, "'}' after object literal")?;
            break;
        }
    }

    Ok(Expr::Object { entries, line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn parse(source: &str) -> ParseResult<Expr> {
        let tokens = tokenize(source).unwrap();
        parse_expression(&mut tokens.iter().peekable())
    }

    #[test]
    fn member_access_chains_with_calls() {
        let expr = parse("f()[0].x(1, 2)").unwrap();
        assert_eq!(expr.to_string(), "f()[0].x(1,2)");
        assert!(matches!(expr, Expr::Call { .. }));
    }

    #[test]
    fn sparse_arrays_keep_empty_slots() {
        match parse("[,,]").unwrap() {
            Expr::Array { elements, .. } => assert_eq!(elements, vec![None, None]),
            other => panic!("expected array, got {other:?}"),
        }
        assert_eq!(parse("[1,,2]").unwrap().to_string(), "[1,,2]");
    }

    #[test]
    fn object_literals() {
        assert_eq!(parse("{b: 1, 'c': [2],}").unwrap().to_string(), "{b:1,c:[2]}");
        assert_eq!(parse("{}").unwrap().to_string(), "{}");
    }

    #[test]
    fn prefix_and_postfix() {
        assert_eq!(parse("-x").unwrap().to_string(), "-x");
        assert!(matches!(parse("++x").unwrap(), Expr::Unary { op: UnaryOperator::Increment, .. }));
        assert!(matches!(parse("x--").unwrap(), Expr::Postfix { op: UnaryOperator::Decrement, .. }));
        assert_eq!(parse("!~a").unwrap().to_string(), "!~a");
    }

    #[test]
    fn new_wraps_the_call() {
        let expr = parse("new Point(1, 2)").unwrap();
        assert_eq!(expr.to_string(), "new Point(1,2)");
        match expr {
            Expr::New { call, .. } => assert!(matches!(*call, Expr::Call { .. })),
            other => panic!("expected new, got {other:?}"),
        }
    }

    #[test]
    fn function_and_class_literals() {
        assert_eq!(parse("function (a, b) { return a; }").unwrap().to_string(), "function(a,b){return a;}");
        assert_eq!(parse("class { static x = 1; }").unwrap().to_string(), "class{static x=1;}");
    }

    #[test]
    fn too_many_arguments() {
        let source = format!("f({})", vec!["1"; MAX_ARGUMENTS + 1].join(","));
        assert!(matches!(parse(&source), Err(ParseError::TooManyArguments { .. })));
    }

    #[test]
    fn unexpected_token() {
        assert!(matches!(parse(")"), Err(ParseError::UnexpectedToken { .. })));
    }
}
