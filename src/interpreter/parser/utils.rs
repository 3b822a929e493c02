use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
    },
};

/// Upper bound on call arguments and function parameters.
pub const MAX_ARGUMENTS: usize = 255;

/// The error for running out of tokens mid-construct.
///
/// Its line is unknown here; `parse_program` sets it to the line of the last
/// token.
pub(in crate::interpreter::parser) const fn end_of_input() -> ParseError {
    ParseError::UnexpectedEndOfInput { line: 0 }
}

/// Consumes the next token if it equals `expected` and returns its line.
pub(in crate::interpreter::parser) fn match_token<'a, I>(tokens: &mut Peekable<I>,
                                                         expected: &Token)
                                                         -> Option<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.peek() {
        Some((tok, line)) if tok == expected => {
            let line = *line;
            tokens.next();
            Some(line)
        },
        _ => None,
    }
}

/// Returns `true` if the next token equals `expected`, without consuming it.
pub(in crate::interpreter::parser) fn check<'a, I>(tokens: &mut Peekable<I>,
                                                   expected: &Token)
                                                   -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(), Some((tok, _)) if tok == expected)
}

/// Consumes a required token and returns its line.
///
/// # Errors
/// `ExpectedToken` naming `description` when a different token is found, or
/// `UnexpectedEndOfInput` when the stream is exhausted.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    description: &'static str)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, line)) if tok == expected => Ok(*line),
        Some((tok, line)) => Err(ParseError::ExpectedToken { expected: description,
                                                             found:    tok.to_string(),
                                                             line:     *line, }),
        None => Err(end_of_input()),
    }
}

/// Skips any number of stray `;` tokens.
pub(in crate::interpreter::parser) fn skip_semicolons<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while match_token(tokens, &Token::Semicolon).is_some() {}
}

/// Returns the line of the next token, or `0` at the end of input.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().map_or(0, |(_, line)| *line)
}

/// Collects `item ("," item)*` up to and including `closing`.
///
/// Used for parameter lists, where empty slots are not allowed. `()` yields
/// an empty list.
///
/// # Errors
/// Propagates `parse_item` failures. A token other than `,` or `closing`
/// after an item is `UnexpectedToken`; running out of tokens is
/// `UnexpectedEndOfInput`.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> Result<Vec<T>, ParseError>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if match_token(tokens, closing).is_some() {
        return Ok(items);
    }
    loop {
        let item = parse_item(tokens)?;
        items.push(item);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("expected ',' or '{closing}', found '{tok}'"),
                                                         line:  *line, });
            },
            None => return Err(end_of_input()),
        }
    }
    Ok(items)
}

/// Parses a comma-separated expression list that may contain empty slots.
///
/// A comma with no expression before it yields a `None` placeholder, so
/// `[,,]` has two empty slots and `f(1,,2)` passes three arguments. The
/// closing token is consumed.
///
/// # Errors
/// Propagates expression errors; fails on a missing separator or closing
/// token.
pub(in crate::interpreter::parser) fn parse_expression_list<'a, I>(tokens: &mut Peekable<I>,
                                                                   closing: &Token)
                                                                   -> ParseResult<Vec<Option<Expr>>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    loop {
        if match_token(tokens, closing).is_some() {
            return Ok(items);
        }
        if match_token(tokens, &Token::Comma).is_some() {
            items.push(None);
            continue;
        }
        items.push(Some(parse_expression(tokens)?));
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => return Ok(items),
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("expected ',' or '{closing}', found '{tok}'"),
                                                         line:  *line, });
            },
            None => return Err(end_of_input()),
        }
    }
}

/// Consumes an identifier token and returns its name.
///
/// # Errors
/// `ExpectedToken` for any other token, `UnexpectedEndOfInput` when none is
/// left.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(name), _)) => Ok(name.clone()),
        Some((tok, line)) => Err(ParseError::ExpectedToken { expected: "identifier",
                                                             found:    tok.to_string(),
                                                             line:     *line, }),
        None => Err(end_of_input()),
    }
}
