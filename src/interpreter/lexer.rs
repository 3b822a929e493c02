use std::fmt;

use logos::{Lexer, Logos, Skip};
use tracing::{debug, warn};

use crate::error::ParseError;

/// Failures raised from inside the lexer callbacks.
///
/// `UnexpectedCharacter` is what logos produces for input no token matches;
/// it is recoverable and the character is skipped. The other kinds abort
/// scanning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    /// No token matches the input at this position.
    #[default]
    UnexpectedCharacter,
    /// A string literal ran to the end of the input.
    UnterminatedString,
    /// An integer literal does not fit in 64 bits.
    IntegerTooLarge,
}

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum Token {
    /// Float literal tokens, such as `3.14` or `2.0`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens delimited by `'` or `"`, holding the raw
    /// contents between the quotes.
    #[token("\"", |lex| string_literal(lex, '"'))]
    #[token("'", |lex| string_literal(lex, '\''))]
    Str(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// `null`
    #[token("null")]
    Null,
    /// `class`
    #[token("class")]
    Class,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `function`
    #[token("function")]
    Function,
    /// `if`
    #[token("if")]
    If,
    /// `return`
    #[token("return")]
    Return,
    /// `super`
    #[token("super")]
    Super,
    /// `this`
    #[token("this")]
    This,
    /// `var`
    #[token("var")]
    Var,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `new`
    #[token("new")]
    New,
    /// `static`
    #[token("static")]
    Static,
    /// Identifier tokens; variable, property or function names such as `x`,
    /// `$el`, `#private` or `变量`.
    #[regex(r"[\p{L}_$#][\p{L}0-9_$#]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `/* Multi line comments. */`
    #[token("/*", block_comment)]
    MultiLineComment,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `?`
    #[token("?")]
    Question,
    /// `+`
    #[token("+")]
    Plus,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-`
    #[token("-")]
    Minus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*`
    #[token("*")]
    Star,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `**`
    #[token("**")]
    StarStar,
    /// `**=`
    #[token("**=")]
    StarStarAssign,
    /// `/`
    #[token("/")]
    Slash,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%`
    #[token("%")]
    Percent,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `===`
    #[token("===")]
    EqualEqualEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `!==`
    #[token("!==")]
    BangEqualEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `<<`
    #[token("<<")]
    LessLess,
    /// `<<=`
    #[token("<<=")]
    LessLessAssign,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `>>`
    #[token(">>")]
    GreaterGreater,
    /// `>>=`
    #[token(">>=")]
    GreaterGreaterAssign,
    /// `>>>`
    #[token(">>>")]
    GreaterGreaterGreater,
    /// `>>>=`
    #[token(">>>=")]
    GreaterGreaterGreaterAssign,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `&&`
    #[token("&&")]
    DoubleAmpersand,
    /// `&=`
    #[token("&=")]
    AmpersandAssign,
    /// `&&=`
    #[token("&&=")]
    DoubleAmpersandAssign,
    /// `|`
    #[token("|")]
    Pipe,
    /// `||`
    #[token("||")]
    DoublePipe,
    /// `|=`
    #[token("|=")]
    PipeAssign,
    /// `||=`
    #[token("||=")]
    DoublePipeAssign,
    /// `^`
    #[token("^")]
    Caret,
    /// `^=`
    #[token("^=")]
    CaretAssign,
    /// `~`
    #[token("~")]
    Tilde,

    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

fn parse_float(lex: &Lexer<Token>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::UnexpectedCharacter)
}

fn parse_integer(lex: &Lexer<Token>) -> Result<i64, LexError> {
    lex.slice().parse().map_err(|_| LexError::IntegerTooLarge)
}

/// Consumes a string body up to the matching `quote`.
///
/// Newlines inside the literal still advance the line counter.
fn string_literal(lex: &mut Lexer<Token>, quote: char) -> Result<String, LexError> {
    let rest = lex.remainder();
    let Some(end) = rest.find(quote) else {
        lex.bump(rest.len());
        return Err(LexError::UnterminatedString);
    };
    let contents = rest[..end].to_string();
    lex.extras.line += contents.matches('\n').count();
    lex.bump(end + quote.len_utf8());
    Ok(contents)
}

/// Skips a block comment; an unclosed one swallows the rest of the input.
fn block_comment(lex: &mut Lexer<Token>) -> Skip {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.extras.line += rest[..len].matches('\n').count();
    lex.bump(len);
    Skip
}

/// Turns source text into `(Token, line)` pairs in source order.
///
/// Characters no token matches are logged and skipped. Scanning stops at the
/// first unterminated string or oversized integer literal.
///
/// # Example
/// ```
/// use ecmalite::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("var a = 1;").unwrap();
/// assert_eq!(tokens[0], (Token::Var, 1));
/// assert_eq!(tokens[3], (Token::Integer(1), 1));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            Ok(tok) => tokens.push((tok, line)),
            Err(LexError::UnexpectedCharacter) => {
                warn!(line, character = lexer.slice(), "skipping unexpected character");
            },
            Err(LexError::UnterminatedString) => return Err(ParseError::UnterminatedString { line }),
            Err(LexError::IntegerTooLarge) => return Err(ParseError::LiteralTooLarge { line }),
        }
    }

    debug!(count = tokens.len(), "scanned tokens");
    Ok(tokens)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Real(r) => return write!(f, "{r:?}"),
            Self::Integer(n) => return write!(f, "{n}"),
            Self::Str(s) => return write!(f, "'{s}'"),
            Self::Bool(b) => return write!(f, "{b}"),
            Self::Identifier(name) => return write!(f, "{name}"),
            Self::Null => "null",
            Self::Class => "class",
            Self::Else => "else",
            Self::For => "for",
            Self::Function => "function",
            Self::If => "if",
            Self::Return => "return",
            Self::Super => "super",
            Self::This => "this",
            Self::Var => "var",
            Self::While => "while",
            Self::Do => "do",
            Self::New => "new",
            Self::Static => "static",
            Self::Comment | Self::MultiLineComment => "comment",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Plus => "+",
            Self::PlusPlus => "++",
            Self::PlusAssign => "+=",
            Self::Minus => "-",
            Self::MinusMinus => "--",
            Self::MinusAssign => "-=",
            Self::Star => "*",
            Self::StarAssign => "*=",
            Self::StarStar => "**",
            Self::StarStarAssign => "**=",
            Self::Slash => "/",
            Self::SlashAssign => "/=",
            Self::Percent => "%",
            Self::PercentAssign => "%=",
            Self::Equals => "=",
            Self::EqualEqual => "==",
            Self::EqualEqualEqual => "===",
            Self::Bang => "!",
            Self::BangEqual => "!=",
            Self::BangEqualEqual => "!==",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::LessLess => "<<",
            Self::LessLessAssign => "<<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::GreaterGreater => ">>",
            Self::GreaterGreaterAssign => ">>=",
            Self::GreaterGreaterGreater => ">>>",
            Self::GreaterGreaterGreaterAssign => ">>>=",
            Self::Ampersand => "&",
            Self::DoubleAmpersand => "&&",
            Self::AmpersandAssign => "&=",
            Self::DoubleAmpersandAssign => "&&=",
            Self::Pipe => "|",
            Self::DoublePipe => "||",
            Self::PipeAssign => "|=",
            Self::DoublePipeAssign => "||=",
            Self::Caret => "^",
            Self::CaretAssign => "^=",
            Self::Tilde => "~",
            Self::NewLine => "newline",
            Self::Ignored => "whitespace",
        };
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(tok, _)| tok).collect()
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(kinds("= == === < << <<= >>>= && &&="),
                   vec![Token::Equals,
                        Token::EqualEqual,
                        Token::EqualEqualEqual,
                        Token::Less,
                        Token::LessLess,
                        Token::LessLessAssign,
                        Token::GreaterGreaterGreaterAssign,
                        Token::DoubleAmpersand,
                        Token::DoubleAmpersandAssign]);
    }

    #[test]
    fn numbers_split_into_integer_and_real() {
        assert_eq!(kinds("12 3.5 7."), vec![Token::Integer(12), Token::Real(3.5), Token::Integer(7), Token::Dot]);
    }

    #[test]
    fn strings_keep_raw_contents() {
        assert_eq!(kinds(r#"'a\n' "b c""#),
                   vec![Token::Str("a\\n".into()), Token::Str("b c".into())]);
    }

    #[test]
    fn unterminated_string_fails() {
        assert_eq!(tokenize("var a = 'oops"), Err(ParseError::UnterminatedString { line: 1 }));
    }

    #[test]
    fn oversized_integer_fails() {
        assert!(matches!(tokenize("99999999999999999999"), Err(ParseError::LiteralTooLarge { .. })));
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("var static $x _y #z 变量 newer"),
                   vec![Token::Var,
                        Token::Static,
                        Token::Identifier("$x".into()),
                        Token::Identifier("_y".into()),
                        Token::Identifier("#z".into()),
                        Token::Identifier("变量".into()),
                        Token::Identifier("newer".into())]);
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let tokens = tokenize("a // one\n/* two\nthree */ b\n'x\ny' c").unwrap();
        assert_eq!(tokens,
                   vec![(Token::Identifier("a".into()), 1),
                        (Token::Identifier("b".into()), 3),
                        (Token::Str("x\ny".into()), 5),
                        (Token::Identifier("c".into()), 5)]);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(kinds("a @ b"), vec![Token::Identifier("a".into()), Token::Identifier("b".into())]);
    }
}
