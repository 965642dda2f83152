//! Revision history section.
//!
//! Each valid revision is recorded in declaration order. The newest date
//! seen becomes the record's version, whatever order the statements were
//! written in; a date newer than its predecessor additionally warns, since
//! the history should run newest first.

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, ErrorKind, Module, Revision, YangError};
use yangkit_lexer::Token;

use super::helpers::{
    capture_block, read_argument, report_duplicate, require_arg, validate_date,
};
use super::{TokenStream, kw};

pub(crate) fn parse_revision(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
) -> Result<(), YangError> {
    let start = stream.current_pos();
    let kw_span = stream.current_span();
    stream.advance();

    let Some((date, date_span)) = read_argument(stream, diags)? else {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "revision statement has no date".to_string(),
        ));
        stream.skip_statement();
        return Ok(());
    };

    let mut description: Option<(String, Span)> = None;
    let mut reference: Option<(String, Span)> = None;
    match stream.peek().cloned() {
        Some(Token::Semicolon) => {
            stream.advance();
        }
        Some(Token::LBrace) => {
            stream.advance();
            let stmts = capture_block(stream, diags)?;
            for stmt in &stmts {
                if stmt.prefix.is_some() {
                    continue;
                }
                match stmt.keyword.as_str() {
                    kw::DESCRIPTION => {
                        if let Some((_, first)) = &description {
                            report_duplicate(kw::DESCRIPTION, stmt.span, *first, diags);
                        } else if let Some(value) = require_arg(stmt, diags) {
                            description = Some((value, stmt.span));
                        }
                    }
                    kw::REFERENCE => {
                        if let Some((_, first)) = &reference {
                            report_duplicate(kw::REFERENCE, stmt.span, *first, diags);
                        } else if let Some(value) = require_arg(stmt, diags) {
                            reference = Some((value, stmt.span));
                        }
                    }
                    _ => diags.push(YangError::new(
                        ErrorKind::Syntax,
                        stmt.span,
                        format!("'{}' statement is not valid in revision", stmt.keyword),
                    )),
                }
            }
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!(
                    "expected ';' or '{{' after revision '{}', found '{}'",
                    date, other
                ),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "revision statement is not terminated".to_string(),
            ));
        }
    }

    if !validate_date(&date, date_span, diags) {
        return Ok(());
    }

    if let Some(existing) = module.revisions.iter().find(|r| r.date == date) {
        diags.push(
            YangError::warning(
                ErrorKind::DuplicateStatement,
                date_span,
                format!("revision '{}' is listed more than once", date),
            )
            .with_label(existing.span, "first listed here".to_string()),
        );
        return Ok(());
    }

    if let Some(prev) = module.revisions.last() {
        if date.as_str() > prev.date.as_str() {
            diags.push(YangError::warning(
                ErrorKind::BadRevisionOrder,
                date_span,
                format!(
                    "revision '{}' is newer than the preceding revision '{}'",
                    date, prev.date
                ),
            ));
        }
    }

    let span = stream.span_from(start);
    module.revisions.push(Revision {
        date: date.clone(),
        description: description.map(|(value, _)| value),
        reference: reference.map(|(value, _)| value),
        span,
    });

    // Newest date wins as the record's version
    if module.version.as_deref().is_none_or(|v| date.as_str() > v) {
        module.version = Some(date);
    }
    Ok(())
}
