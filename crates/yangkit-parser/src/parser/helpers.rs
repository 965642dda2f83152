//! Shared statement plumbing: arguments, generic subtree capture, and the
//! small validators used across sections.

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, ErrorKind, Statement, YangError};
use yangkit_lexer::Token;

use super::TokenStream;

/// Fatal diagnostic for a string literal that is never closed.
pub(crate) fn unterminated(span: Span) -> YangError {
    YangError::new(
        ErrorKind::UnexpectedEof,
        span,
        "string literal is never closed".to_string(),
    )
}

/// Read the argument of a statement, if it has one.
///
/// An unquoted string is a single token. Quoted strings may be joined with
/// `+`; the concatenated value is returned with a span covering all parts.
/// Returns `Ok(None)` when the statement has no argument (the next token
/// already ends or opens the statement).
pub(crate) fn read_argument(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
) -> Result<Option<(String, Span)>, YangError> {
    match stream.peek().cloned() {
        Some(Token::Ident(s)) => {
            let span = stream.current_span();
            stream.advance();
            Ok(Some((s.to_string(), span)))
        }
        Some(Token::String(s)) => {
            let mut value = s.to_string();
            let mut span = stream.current_span();
            stream.advance();
            while stream.check(&Token::Plus) {
                match stream.peek_nth(1).cloned() {
                    Some(Token::String(next)) => {
                        stream.advance(); // +
                        span = span.merge(&stream.current_span());
                        stream.advance(); // string
                        value.push_str(&next);
                    }
                    Some(Token::UnterminatedString) => {
                        stream.advance(); // +
                        return Err(unterminated(stream.current_span()));
                    }
                    _ => {
                        stream.advance(); // +
                        diags.push(YangError::new(
                            ErrorKind::Syntax,
                            stream.current_span(),
                            "expected a quoted string after '+'".to_string(),
                        ));
                        break;
                    }
                }
            }
            Ok(Some((value, span)))
        }
        Some(Token::UnterminatedString) => Err(unterminated(stream.current_span())),
        _ => Ok(None),
    }
}

/// Capture one statement and its substatements as a generic [`Statement`]
/// tree, without interpreting any keyword.
///
/// The current token must be the statement's keyword; the caller checks
/// this before dispatching here.
pub(crate) fn capture_statement(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
) -> Result<Statement, YangError> {
    let start = stream.current_pos();
    let kw_span = stream.current_span();
    let word = match stream.advance() {
        Some(Token::Ident(s)) => s.to_string(),
        _ => panic!("BUG: capture_statement called without a keyword token"),
    };

    let (prefix, keyword) = match split_prefix(&word) {
        Some((p, k)) => (Some(p.to_string()), k.to_string()),
        None => (None, word),
    };
    let arg = read_argument(stream, diags)?.map(|(value, _)| value);
    let mut stmt = Statement::new(prefix, keyword, arg, kw_span);

    match stream.peek().cloned() {
        Some(Token::Semicolon) => {
            stream.advance();
        }
        Some(Token::LBrace) => {
            stream.advance();
            stmt.substmts = capture_block(stream, diags)?;
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!(
                    "expected ';' or '{{' after '{}' statement, found '{}'",
                    stmt.keyword, other
                ),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                format!("'{}' statement is not terminated", stmt.keyword),
            ));
        }
    }

    stmt.span = stream.span_from(start);
    Ok(stmt)
}

/// Capture statements up to and including the closing `}` of a block whose
/// `{` has already been consumed.
pub(crate) fn capture_block(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
) -> Result<Vec<Statement>, YangError> {
    let mut stmts = Vec::new();
    loop {
        match stream.peek().cloned() {
            None => {
                return Err(YangError::new(
                    ErrorKind::UnexpectedEof,
                    stream.current_span(),
                    "missing '}' before end of input".to_string(),
                ));
            }
            Some(Token::RBrace) => {
                stream.advance();
                return Ok(stmts);
            }
            Some(Token::Ident(_)) => stmts.push(capture_statement(stream, diags)?),
            Some(Token::UnterminatedString) => return Err(unterminated(stream.current_span())),
            Some(other) => {
                diags.push(YangError::new(
                    ErrorKind::Syntax,
                    stream.current_span(),
                    format!("expected a statement keyword, found '{}'", other),
                ));
                if matches!(other, Token::LBrace) {
                    stream.skip_statement();
                } else {
                    stream.advance();
                }
            }
        }
    }
}

/// Parse a leaf statement: keyword, argument, then `;`.
///
/// Extension substatements are legal under any YANG statement, so a block
/// after the argument is parsed and dropped rather than rejected. Returns
/// the argument, or None when it is missing (already diagnosed).
pub(crate) fn simple_statement(
    kw: &str,
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
) -> Result<Option<(String, Span)>, YangError> {
    let kw_span = stream.current_span();
    stream.advance();
    let arg = read_argument(stream, diags)?;
    if arg.is_none() {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            format!("'{}' statement has no argument", kw),
        ));
    }

    match stream.peek().cloned() {
        Some(Token::Semicolon) => {
            stream.advance();
        }
        Some(Token::LBrace) => {
            stream.advance();
            capture_block(stream, diags)?;
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!("expected ';' after '{}' statement, found '{}'", kw, other),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                format!("'{}' statement is not terminated", kw),
            ));
        }
    }
    Ok(arg)
}

/// The argument of a captured substatement, diagnosing its absence.
pub(crate) fn require_arg(stmt: &Statement, diags: &mut Diagnostics) -> Option<String> {
    match &stmt.arg {
        Some(value) => Some(value.clone()),
        None => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stmt.span,
                format!("'{}' statement has no argument", stmt.keyword),
            ));
            None
        }
    }
}

/// Report a repeated single-instance statement, pointing at the first one.
pub(crate) fn report_duplicate(kw: &str, span: Span, first: Span, diags: &mut Diagnostics) {
    diags.push(
        YangError::new(
            ErrorKind::DuplicateStatement,
            span,
            format!("'{}' statement appears more than once", kw),
        )
        .with_label(first, format!("first '{}' is here", kw)),
    );
}

/// Split `prefix:name`, requiring the prefix part to be a valid identifier.
pub(crate) fn split_prefix(word: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = word.split_once(':')?;
    if rest.is_empty() || !is_valid_identifier(prefix) {
        return None;
    }
    Some((prefix, rest))
}

/// YANG identifier: leading letter or underscore, then letters, digits,
/// `_`, `-` or `.`.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Diagnose an invalid identifier. Returns true when the name is valid.
pub(crate) fn check_identifier(name: &str, span: Span, diags: &mut Diagnostics) -> bool {
    if is_valid_identifier(name) {
        true
    } else {
        diags.push(YangError::new(
            ErrorKind::InvalidName,
            span,
            format!("'{}' is not a valid YANG identifier", name),
        ));
        false
    }
}

/// Validate a `YYYY-MM-DD` revision date.
///
/// A malformed date is an error and returns false. A well-formed date that
/// lies before 1970 or in the future only warns and still returns true.
pub(crate) fn validate_date(date: &str, span: Span, diags: &mut Diagnostics) -> bool {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
    if !well_formed {
        diags.push(YangError::new(
            ErrorKind::InvalidValue,
            span,
            format!("invalid revision date '{}', expected YYYY-MM-DD", date),
        ));
        return false;
    }

    let year: u32 = date[0..4].parse().unwrap_or(0);
    let month: u32 = date[5..7].parse().unwrap_or(0);
    let day: u32 = date[8..10].parse().unwrap_or(0);
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        diags.push(YangError::new(
            ErrorKind::InvalidValue,
            span,
            format!("invalid revision date '{}', month or day out of range", date),
        ));
        return false;
    }

    if year < 1970 {
        diags.push(YangError::warning(
            ErrorKind::OldRevision,
            span,
            format!("revision date '{}' is before 1970", date),
        ));
    } else if date > today().as_str() {
        diags.push(YangError::warning(
            ErrorKind::FutureRevision,
            span,
            format!("revision date '{}' is in the future", date),
        ));
    }
    true
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
