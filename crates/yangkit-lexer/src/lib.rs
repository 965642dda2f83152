// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for YANG source text.
//!
//! This module provides tokenization of YANG files using logos.
//!
//! # Design
//!
//! - YANG has no reserved words. Statement keywords, identifiers, revision
//!   dates and unquoted argument strings all lex as [`Token::Ident`]; the
//!   parser decides what each one means from its position.
//! - The only structural tokens are `{`, `}`, `;` and `+` (quoted-string
//!   concatenation).
//! - Comments are stripped during lexing (not tokens)
//! - An unclosed quote lexes as [`Token::UnterminatedString`] so the parser
//!   can report it with a span instead of a bare lexer error.
//!
//! # Examples
//!
//! ```
//! # use yangkit_lexer::Token;
//! # use logos::Logos;
//! let source = r#"module example { namespace "urn:example"; }"#;
//! let tokens: Vec<Result<Token, ()>> = Token::lexer(source).collect();
//! ```

use std::rc::Rc;

use logos::Logos;

/// YANG token.
///
/// An unquoted string that is not a delimiter lexes as [`Token::Ident`],
/// whether it is a statement keyword, an identifier, a date or an XPath
/// expression. Quoted strings carry their unescaped content.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")] // Skip /* */ comments
pub enum Token {
    /// Delimiter `{`
    #[token("{")]
    LBrace,

    /// Delimiter `}`
    #[token("}")]
    RBrace,

    /// Delimiter `;`
    #[token(";")]
    Semicolon,

    /// Operator `+`, joining adjacent quoted strings.
    ///
    /// High priority so a lone `+` between strings is not swallowed by the
    /// unquoted-string rule.
    #[token("+", priority = 10)]
    Plus,

    /// Quoted string literal, with surrounding quotes stripped.
    ///
    /// Double-quoted strings process the `\n`, `\t`, `\"` and `\\` escape
    /// sequences; any other escape is a lexer error. Single-quoted strings
    /// are taken verbatim. Both may span multiple lines.
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        // Strip quotes and unescape
        let content = &s[1..s.len() - 1];
        unescape_string(content).map(|s| Rc::from(s.as_str()))
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        Rc::from(&s[1..s.len() - 1])
    })]
    String(Rc<str>),

    /// A quote that is never closed before end of input.
    ///
    /// Tokenizing cannot resume past this point; the parser treats it as
    /// fatal.
    #[regex(r#""([^"\\]|\\.)*"#)]
    #[regex(r"'[^']*")]
    UnterminatedString,

    /// Unquoted string: keyword, identifier, `prefix:name`, date, number,
    /// range or XPath expression.
    ///
    /// Runs until whitespace, a delimiter or a quote. A leading `/` is
    /// permitted (XPath arguments) as long as it does not open a comment.
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r#"(/[^/* \t\r\n;{}"']|[^ \t\r\n;{}"'/])[^ \t\r\n;{}"']*"#, |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Unescape the content of a double-quoted string literal.
///
/// YANG recognizes exactly four escape sequences; anything else is an
/// error, not a literal backslash.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some(_) => {
                    // Unsupported escape sequence
                    return None;
                }
                None => return None, // Trailing backslash
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Plus => write!(f, "+"),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::UnterminatedString => write!(f, "unterminated string"),
            Token::Ident(s) => write!(f, "{}", s),
        }
    }
}
