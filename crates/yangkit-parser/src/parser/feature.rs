//! Feature and identity statements.
//!
//! Both are parsed into dedicated records because the resolver has to
//! follow their references later: if-feature arguments name other
//! features, and an identity's base names another identity. References
//! stay unresolved strings here; binding them is the resolver's first
//! pass.

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, ErrorKind, Feature, Identity, Module, SymbolRef, YangError};
use yangkit_lexer::Token;

use super::helpers::{
    capture_block, check_identifier, is_valid_identifier, read_argument, report_duplicate,
    require_arg,
};
use super::{TokenStream, kw};

pub(crate) fn parse_feature(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
) -> Result<(), YangError> {
    let start = stream.current_pos();
    let kw_span = stream.current_span();
    stream.advance();

    let Some((name, name_span)) = read_argument(stream, diags)? else {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "feature statement has no name".to_string(),
        ));
        stream.skip_statement();
        return Ok(());
    };
    check_identifier(&name, name_span, diags);

    let mut feature = Feature::new(name, kw_span.merge(&name_span));
    let mut description: Option<Span> = None;
    let mut reference: Option<Span> = None;

    match stream.peek().cloned() {
        Some(Token::Semicolon) => {
            stream.advance();
        }
        Some(Token::LBrace) => {
            stream.advance();
            let stmts = capture_block(stream, diags)?;
            for stmt in stmts {
                if stmt.prefix.is_some() {
                    feature.substmts.push(stmt);
                    continue;
                }
                match stmt.keyword.as_str() {
                    kw::IF_FEATURE => {
                        if let Some(expr) = require_arg(&stmt, diags) {
                            collect_feature_refs(&expr, stmt.span, diags, &mut feature.if_features);
                        }
                    }
                    kw::DESCRIPTION => {
                        if let Some(first) = description {
                            report_duplicate(kw::DESCRIPTION, stmt.span, first, diags);
                        } else if let Some(value) = require_arg(&stmt, diags) {
                            description = Some(stmt.span);
                            feature.description = Some(value);
                        }
                    }
                    kw::REFERENCE => {
                        if let Some(first) = reference {
                            report_duplicate(kw::REFERENCE, stmt.span, first, diags);
                        } else if let Some(value) = require_arg(&stmt, diags) {
                            reference = Some(stmt.span);
                            feature.reference = Some(value);
                        }
                    }
                    kw::STATUS => feature.substmts.push(stmt),
                    _ => diags.push(YangError::new(
                        ErrorKind::Syntax,
                        stmt.span,
                        format!("'{}' statement is not valid in feature", stmt.keyword),
                    )),
                }
            }
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!(
                    "expected ';' or '{{' after feature '{}', found '{}'",
                    feature.name, other
                ),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "feature statement is not terminated".to_string(),
            ));
        }
    }

    feature.span = stream.span_from(start);

    if let Some(idx) = module.find_feature(&feature.name) {
        diags.push(
            YangError::new(
                ErrorKind::DuplicateName,
                feature.span,
                format!("duplicate definition of feature '{}'", feature.name),
            )
            .with_label(module.features[idx].span, "first defined here".to_string()),
        );
        return Ok(());
    }
    module.features.push(feature);
    Ok(())
}

pub(crate) fn parse_identity(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
) -> Result<(), YangError> {
    let start = stream.current_pos();
    let kw_span = stream.current_span();
    stream.advance();

    let Some((name, name_span)) = read_argument(stream, diags)? else {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "identity statement has no name".to_string(),
        ));
        stream.skip_statement();
        return Ok(());
    };
    check_identifier(&name, name_span, diags);

    let mut identity = Identity::new(name, kw_span.merge(&name_span));
    let mut base_span: Option<Span> = None;
    let mut description: Option<Span> = None;
    let mut reference: Option<Span> = None;

    match stream.peek().cloned() {
        Some(Token::Semicolon) => {
            stream.advance();
        }
        Some(Token::LBrace) => {
            stream.advance();
            let stmts = capture_block(stream, diags)?;
            for stmt in stmts {
                if stmt.prefix.is_some() {
                    identity.substmts.push(stmt);
                    continue;
                }
                match stmt.keyword.as_str() {
                    kw::BASE => {
                        if let Some(first) = base_span {
                            report_duplicate(kw::BASE, stmt.span, first, diags);
                        } else if let Some(value) = require_arg(&stmt, diags) {
                            base_span = Some(stmt.span);
                            identity.base = symbol_ref(&value, stmt.span, diags);
                        }
                    }
                    kw::DESCRIPTION => {
                        if let Some(first) = description {
                            report_duplicate(kw::DESCRIPTION, stmt.span, first, diags);
                        } else if let Some(value) = require_arg(&stmt, diags) {
                            description = Some(stmt.span);
                            identity.description = Some(value);
                        }
                    }
                    kw::REFERENCE => {
                        if let Some(first) = reference {
                            report_duplicate(kw::REFERENCE, stmt.span, first, diags);
                        } else if let Some(value) = require_arg(&stmt, diags) {
                            reference = Some(stmt.span);
                            identity.reference = Some(value);
                        }
                    }
                    kw::IF_FEATURE | kw::STATUS => identity.substmts.push(stmt),
                    _ => diags.push(YangError::new(
                        ErrorKind::Syntax,
                        stmt.span,
                        format!("'{}' statement is not valid in identity", stmt.keyword),
                    )),
                }
            }
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!(
                    "expected ';' or '{{' after identity '{}', found '{}'",
                    identity.name, other
                ),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "identity statement is not terminated".to_string(),
            ));
        }
    }

    identity.span = stream.span_from(start);

    if let Some(idx) = module.find_identity(&identity.name) {
        diags.push(
            YangError::new(
                ErrorKind::DuplicateName,
                identity.span,
                format!("duplicate definition of identity '{}'", identity.name),
            )
            .with_label(
                module.identities[idx].span,
                "first defined here".to_string(),
            ),
        );
        return Ok(());
    }
    module.identities.push(identity);
    Ok(())
}

/// Parse a single `[prefix:]name` reference.
fn symbol_ref(word: &str, span: Span, diags: &mut Diagnostics) -> Option<SymbolRef> {
    let (prefix, name) = match word.split_once(':') {
        Some((p, n)) => (Some(p), n),
        None => (None, word),
    };
    let valid = prefix.is_none_or(is_valid_identifier) && is_valid_identifier(name);
    if !valid {
        diags.push(YangError::new(
            ErrorKind::InvalidName,
            span,
            format!("'{}' is not a valid identity reference", word),
        ));
        return None;
    }
    Some(SymbolRef {
        prefix: prefix.map(str::to_string),
        name: name.to_string(),
        span,
    })
}

/// Pull every feature name out of an if-feature argument.
///
/// The argument may be a boolean expression over feature names; the
/// operator structure is not kept, only the referenced names, which is
/// what dependency resolution needs.
fn collect_feature_refs(
    expr: &str,
    span: Span,
    diags: &mut Diagnostics,
    out: &mut Vec<SymbolRef>,
) {
    for word in expr
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|w| !w.is_empty())
    {
        if matches!(word, "and" | "or" | "not") {
            continue;
        }
        let (prefix, name) = match word.split_once(':') {
            Some((p, n)) => (Some(p), n),
            None => (None, word),
        };
        let valid = prefix.is_none_or(is_valid_identifier) && is_valid_identifier(name);
        if !valid {
            diags.push(YangError::new(
                ErrorKind::InvalidName,
                span,
                format!("'{}' is not a valid feature reference", word),
            ));
            continue;
        }
        out.push(SymbolRef {
            prefix: prefix.map(str::to_string),
            name: name.to_string(),
            span,
        });
    }
}
