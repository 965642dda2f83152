//! Header section: yang-version, namespace, prefix, belongs-to.

use yangkit_ast::foundation::Span;
use yangkit_ast::{BelongsTo, Diagnostics, ErrorKind, Module, ModuleKind, YangError};
use yangkit_lexer::Token;

use super::helpers::{
    capture_block, check_identifier, read_argument, report_duplicate, require_arg,
    simple_statement,
};
use super::{FrontSeen, TokenStream, kw};

pub(crate) fn parse_yang_version(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    let kw_span = stream.current_span();
    let arg = simple_statement(kw::YANG_VERSION, stream, diags)?;

    if let Some(first) = seen.yang_version {
        report_duplicate(kw::YANG_VERSION, kw_span, first, diags);
        return Ok(());
    }
    seen.yang_version = Some(kw_span);

    if let Some((value, span)) = arg {
        match value.as_str() {
            "1" | "1.1" => module.yang_version = value,
            _ => diags.push(YangError::new(
                ErrorKind::InvalidValue,
                span,
                format!("invalid yang-version '{}', expected '1' or '1.1'", value),
            )),
        }
    }
    Ok(())
}

pub(crate) fn parse_namespace(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    let kw_span = stream.current_span();
    let arg = simple_statement(kw::NAMESPACE, stream, diags)?;

    if module.kind == ModuleKind::Submodule {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "namespace statement is not valid in a submodule".to_string(),
        ));
        return Ok(());
    }
    if let Some(first) = seen.namespace {
        report_duplicate(kw::NAMESPACE, kw_span, first, diags);
        return Ok(());
    }
    seen.namespace = Some(kw_span);
    module.namespace = arg.map(|(value, _)| value);
    Ok(())
}

pub(crate) fn parse_prefix(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    let kw_span = stream.current_span();
    let arg = simple_statement(kw::PREFIX, stream, diags)?;

    if module.kind == ModuleKind::Submodule {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "a submodule declares its prefix inside belongs-to".to_string(),
        ));
        return Ok(());
    }
    if let Some(first) = seen.prefix {
        report_duplicate(kw::PREFIX, kw_span, first, diags);
        return Ok(());
    }
    seen.prefix = Some(kw_span);

    if let Some((value, span)) = arg {
        check_identifier(&value, span, diags);
        module.prefix = Some(value);
    }
    Ok(())
}

/// `belongs-to MODULE { prefix P; }`, submodules only.
pub(crate) fn parse_belongs_to(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    let kw_span = stream.current_span();
    stream.advance();
    let arg = read_argument(stream, diags)?;

    let mut prefix: Option<(String, Span)> = None;
    match stream.peek().cloned() {
        Some(Token::LBrace) => {
            stream.advance();
            let stmts = capture_block(stream, diags)?;
            for stmt in &stmts {
                if stmt.prefix.is_some() {
                    continue;
                }
                if stmt.keyword == kw::PREFIX {
                    if let Some((_, first)) = &prefix {
                        report_duplicate(kw::PREFIX, stmt.span, *first, diags);
                    } else if let Some(value) = require_arg(stmt, diags) {
                        check_identifier(&value, stmt.span, diags);
                        prefix = Some((value, stmt.span));
                    }
                } else {
                    diags.push(YangError::new(
                        ErrorKind::Syntax,
                        stmt.span,
                        format!("'{}' statement is not valid in belongs-to", stmt.keyword),
                    ));
                }
            }
        }
        Some(Token::Semicolon) => {
            // belongs-to without a block cannot carry the mandatory prefix
            stream.advance();
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!("expected '{{' after belongs-to, found '{}'", other),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "belongs-to statement is not terminated".to_string(),
            ));
        }
    }

    if module.kind == ModuleKind::Module {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "belongs-to statement is only valid in a submodule".to_string(),
        ));
        return Ok(());
    }
    if let Some(first) = seen.belongs_to {
        report_duplicate(kw::BELONGS_TO, kw_span, first, diags);
        return Ok(());
    }
    seen.belongs_to = Some(kw_span);

    let Some((parent, parent_span)) = arg else {
        diags.push(YangError::new(
            ErrorKind::Syntax,
            kw_span,
            "belongs-to statement has no module name".to_string(),
        ));
        return Ok(());
    };
    check_identifier(&parent, parent_span, diags);

    let Some((prefix, _)) = prefix else {
        diags.push(YangError::new(
            ErrorKind::MissingStatement,
            kw_span,
            format!("belongs-to '{}' has no prefix statement", parent),
        ));
        return Ok(());
    };

    module.belongs_to = Some(BelongsTo {
        module: parent,
        prefix,
        span: kw_span.merge(&parent_span),
    });
    Ok(())
}
