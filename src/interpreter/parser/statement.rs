use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{ClassDecl, ClassMember, Expr, FunctionDecl, LiteralValue, Stmt},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{
                MAX_ARGUMENTS, check, end_of_input, expect, match_token, parse_comma_separated,
                parse_identifier, peek_line, skip_semicolons,
            },
        },
    },
};

/// Parses a declaration or, failing that, a statement.
///
/// `function` and `class` only start a declaration when a name follows;
/// otherwise they begin an expression statement holding a literal.
///
/// The rule is: `declaration := var_decl | function_decl | class_decl |
/// statement`
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut ahead = tokens.clone();
    let named = matches!(ahead.nth(1), Some((Token::Identifier(_), _)));

    match tokens.peek() {
        Some((Token::Var, _)) => {
            let stmt = parse_var_declaration(tokens)?;
            match_token(tokens, &Token::Semicolon);
            Ok(stmt)
        },
        Some((Token::Function, line)) if named => {
            let line = *line;
            tokens.next();
            let name = parse_identifier(tokens)?;
            let decl = parse_function_rest(tokens, Some(name), line)?;
            Ok(Stmt::Function { decl: Rc::new(decl) })
        },
        Some((Token::Class, line)) if named => {
            let line = *line;
            tokens.next();
            let name = parse_identifier(tokens)?;
            let decl = parse_class_body(tokens, Some(name), line)?;
            Ok(Stmt::Class { decl: Rc::new(decl) })
        },
        _ => parse_statement(tokens),
    }
}

/// Parses `var name [= initializer]` without the trailing semicolon.
fn parse_var_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::Var, "'var'")?;
    let name = parse_identifier(tokens)?;
    let initializer = match match_token(tokens, &Token::Equals) {
        Some(_) => Some(parse_expression(tokens)?),
        None => None,
    };

    Ok(Stmt::Var { name,
                   initializer,
                   line })
}

/// Parses a single statement.
///
/// Semicolons after expression statements and `return` are optional, which
/// lets `if (a) { a = true }` parse without one.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.peek() else {
        return Err(end_of_input());
    };
    let line = *line;

    match token {
        Token::LBrace => {
            tokens.next();
            let statements = parse_block(tokens)?;
            Ok(Stmt::Block { statements, line })
        },
        Token::If => {
            tokens.next();
            parse_if(tokens, line)
        },
        Token::While => {
            tokens.next();
            parse_while(tokens, line)
        },
        Token::For => {
            tokens.next();
            parse_for(tokens, line)
        },
        Token::Do => {
            tokens.next();
            parse_do_while(tokens, line)
        },
        Token::Return => {
            tokens.next();
            let value = if check(tokens, &Token::Semicolon) || check(tokens, &Token::RBrace) || tokens.peek().is_none() {
                None
            } else {
                Some(parse_expression(tokens)?)
            };
            match_token(tokens, &Token::Semicolon);
            Ok(Stmt::Return { value, line })
        },
        _ => {
            let expr = parse_expression(tokens)?;
            match_token(tokens, &Token::Semicolon);
            Ok(Stmt::Expression { expr, line })
        },
    }
}

/// Parses declarations up to and including the closing `}`.
///
/// # Errors
/// `UnexpectedEndOfInput` if the block is never closed.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_semicolons(tokens);
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                return Ok(statements);
            },
            Some(_) => statements.push(parse_declaration(tokens)?),
            None => return Err(end_of_input()),
        }
    }
}

/// Parses the parenthesized condition shared by `if`, `while` and
/// `do-while`.
fn parse_condition<'a, I>(tokens: &mut Peekable<I>, keyword: &'static str) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, keyword)?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "')' after condition")?;
    Ok(condition)
}

/// Parses an `if` statement with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if (<condition>) <statement>
///     else <statement>
/// ```
/// Chained `else if` falls out naturally because the else branch is any
/// statement.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_condition(tokens, "'(' after 'if'")?;
    let then_branch = Box::new(parse_statement(tokens)?);
    let else_branch = match match_token(tokens, &Token::Else) {
        Some(_) => Some(Box::new(parse_statement(tokens)?)),
        None => None,
    };

    Ok(Stmt::If { condition,
                  then_branch,
                  else_branch,
                  line })
}

fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_condition(tokens, "'(' after 'while'")?;
    let body = Box::new(parse_statement(tokens)?);

    Ok(Stmt::While { condition,
                     body,
                     line })
}

/// Parses a C-style `for` loop and desugars it.
///
/// `for (init; cond; incr) body` becomes
/// `{ init; while (cond) { body; incr; } }`, with a missing condition
/// replaced by `true`.
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "'(' after 'for'")?;

    let initializer = match tokens.peek() {
        Some((Token::Semicolon, _)) => None,
        Some((Token::Var, _)) => Some(parse_var_declaration(tokens)?),
        _ => {
            let expr = parse_expression(tokens)?;
            Some(Stmt::Expression { line: expr.line(),
                                    expr })
        },
    };
    expect(tokens, &Token::Semicolon, "';' after loop initializer")?;

    let condition = if check(tokens, &Token::Semicolon) {
        Expr::Literal { value: LiteralValue::Bool(true),
                        line }
    } else {
        parse_expression(tokens)?
    };
    expect(tokens, &Token::Semicolon, "';' after loop condition")?;

    let increment = if check(tokens, &Token::RParen) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    expect(tokens, &Token::RParen, "')' after for clauses")?;

    let mut body = parse_statement(tokens)?;
    if let Some(increment) = increment {
        body = Stmt::Block { statements: vec![body,
                                              Stmt::Expression { line: increment.line(),
                                                                 expr: increment, }],
                             line };
    }

    let mut statements: Vec<Stmt> = initializer.into_iter().collect();
    statements.push(Stmt::While { condition,
                                  body: Box::new(body),
                                  line });

    Ok(Stmt::Block { statements, line })
}

/// Parses `do body while (cond)` into `{ body; while (cond) body }`.
fn parse_do_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let body = parse_statement(tokens)?;
    expect(tokens, &Token::While, "'while' after do body")?;
    let condition = parse_condition(tokens, "'(' after 'while'")?;
    match_token(tokens, &Token::Semicolon);

    let repeat = Stmt::While { condition,
                               body: Box::new(body.clone()),
                               line };

    Ok(Stmt::Block { statements: vec![body, repeat],
                     line })
}

/// Parses the parameter list and body of a function whose name (if any) has
/// already been consumed.
///
/// # Errors
/// `TooManyParameters` past the argument limit, plus the usual token
/// errors.
pub fn parse_function_rest<'a, I>(tokens: &mut Peekable<I>,
                                  name: Option<String>,
                                  line: usize)
                                  -> ParseResult<FunctionDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LParen, "'(' before parameters")?;
    let params = parse_comma_separated(tokens, parse_identifier, &Token::RParen)?;
    if params.len() > MAX_ARGUMENTS {
        return Err(ParseError::TooManyParameters { limit: MAX_ARGUMENTS,
                                                   line });
    }

    expect(tokens, &Token::LBrace, "'{' before function body")?;
    let body = parse_block(tokens)?;

    Ok(FunctionDecl { name,
                      params,
                      body,
                      line })
}

/// Parses a class body whose name (if any) has already been consumed.
///
/// Each member may start with `static`. A member whose name is followed by
/// `(` is a method; anything else is a field with an optional initializer.
pub fn parse_class_body<'a, I>(tokens: &mut Peekable<I>,
                               name: Option<String>,
                               line: usize)
                               -> ParseResult<ClassDecl>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect(tokens, &Token::LBrace, "'{' before class body")?;
    let mut members = Vec::new();

    loop {
        skip_semicolons(tokens);
        if match_token(tokens, &Token::RBrace).is_some() {
            break;
        }

        let is_static = match_token(tokens, &Token::Static).is_some();
        let member_line = peek_line(tokens);
        let member_name = parse_identifier(tokens)?;

        if check(tokens, &Token::LParen) {
            let function = parse_function_rest(tokens, Some(member_name), member_line)?;
            members.push(ClassMember::Method { function: Rc::new(function),
                                               is_static });
        } else {
            let initializer = match match_token(tokens, &Token::Equals) {
                Some(_) => Some(parse_expression(tokens)?),
                None => None,
            };
            match_token(tokens, &Token::Semicolon);
            members.push(ClassMember::Field { name: member_name,
                                              initializer,
                                              is_static,
                                              line: member_line });
        }
    }

    Ok(ClassDecl { name,
                   members,
                   line })
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::Stmt,
        error::ParseError,
        interpreter::{lexer::tokenize, parser::core::parse_program},
    };

    fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
        parse_program(&tokenize(source).unwrap())
    }

    fn render(source: &str) -> String {
        parse(source).unwrap().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn var_declarations() {
        assert_eq!(render("var a = 1;"), "var a=1;");
        assert_eq!(render("var a"), "var a;");
    }

    #[test]
    fn if_else_and_optional_semicolons() {
        assert_eq!(render("if (a) { a = true } else { a = false }; a;"),
                   "if(a){a=true;}else{a=false;}a;");
        assert_eq!(render("if (a) b; else if (c) d;"), "if(a)b;else if(c)d;");
    }

    #[test]
    fn for_loops_desugar_into_while() {
        assert_eq!(render("for (var i = 0; i < 3; i++) { x = x + i; }"),
                   "{var i=0;while(i<3){{x=x+i;}i++;}}");
        assert_eq!(render("for (;;) break_me();"), "{while(true)break_me();}");
    }

    #[test]
    fn do_while_runs_body_first() {
        assert_eq!(render("do { i++; } while (i < 3);"), "{{i++;}while(i<3){i++;}}");
    }

    #[test]
    fn declarations_versus_literals() {
        let program = parse("function f(a) { return a; } class C { static n = 1; m() {} }").unwrap();
        assert!(matches!(program[0], Stmt::Function { .. }));
        assert!(matches!(program[1], Stmt::Class { .. }));
        assert_eq!(program[1].to_string(), "class C{static n=1;m(){}}");

        let program = parse("var g = function (x) { return x; };").unwrap();
        assert_eq!(program[0].to_string(), "var g=function(x){return x;};");
    }

    #[test]
    fn return_without_value() {
        assert_eq!(render("function f() { return; }"), "function f(){return;}");
        assert_eq!(render("function f() { return }"), "function f(){return;}");
    }

    #[test]
    fn too_many_parameters() {
        let params: Vec<String> = (0..=super::MAX_ARGUMENTS).map(|i| format!("p{i}")).collect();
        let source = format!("function f({}) {{}}", params.join(","));
        assert!(matches!(parse(&source), Err(ParseError::TooManyParameters { .. })));
    }

    #[test]
    fn unclosed_block() {
        assert!(matches!(parse("{ var a = 1;"), Err(ParseError::UnexpectedEndOfInput { .. })));
    }
}
