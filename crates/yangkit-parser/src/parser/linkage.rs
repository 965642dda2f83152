//! Linkage section: import and include statements.
//!
//! The checks that need only this record run here at parse time: a record
//! importing itself, a submodule importing its parent, duplicate imports
//! and prefix collisions. Whether the named module exists is the loader's
//! business.

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, ErrorKind, Import, Include, LoadStatus, Module, YangError};
use yangkit_lexer::Token;

use super::helpers::{
    capture_block, check_identifier, read_argument, report_duplicate, require_arg, validate_date,
};
use super::{TokenStream, kw};

pub(crate) fn parse_import(
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
            "import statement has no module name".to_string(),
        ));
        stream.skip_statement();
        return Ok(());
    };
    check_identifier(&name, name_span, diags);

    let mut prefix: Option<(String, Span)> = None;
    let mut revision: Option<(String, Span)> = None;
    let mut description: Option<(String, Span)> = None;
    let mut reference: Option<(String, Span)> = None;

    match stream.peek().cloned() {
        Some(Token::LBrace) => {
            stream.advance();
            let stmts = capture_block(stream, diags)?;
            for stmt in &stmts {
                if stmt.prefix.is_some() {
                    continue; // extension use, tolerated
                }
                match stmt.keyword.as_str() {
                    kw::PREFIX => {
                        if let Some((_, first)) = &prefix {
                            report_duplicate(kw::PREFIX, stmt.span, *first, diags);
                        } else if let Some(value) = require_arg(stmt, diags) {
                            check_identifier(&value, stmt.span, diags);
                            prefix = Some((value, stmt.span));
                        }
                    }
                    kw::REVISION_DATE => {
                        if let Some((_, first)) = &revision {
                            report_duplicate(kw::REVISION_DATE, stmt.span, *first, diags);
                        } else if let Some(value) = require_arg(stmt, diags) {
                            if validate_date(&value, stmt.span, diags) {
                                revision = Some((value, stmt.span));
                            }
                        }
                    }
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
                        format!("'{}' statement is not valid in import", stmt.keyword),
                    )),
                }
            }
        }
        Some(Token::Semicolon) => {
            // import without a block cannot carry the mandatory prefix
            stream.advance();
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!("expected '{{' after import '{}', found '{}'", name, other),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "import statement is not terminated".to_string(),
            ));
        }
    }

    let span = stream.span_from(start);
    let revision = revision.map(|(value, _)| value);
    let description = description.map(|(value, _)| value);
    let reference = reference.map(|(value, _)| value);

    let Some((prefix, _)) = prefix else {
        diags.push(YangError::new(
            ErrorKind::MissingStatement,
            span,
            format!("import of '{}' has no prefix statement", name),
        ));
        return Ok(());
    };

    // Importing yourself or your own parent is a cycle by construction
    if name == module.name {
        diags.push(YangError::new(
            ErrorKind::ImportCycle,
            span,
            format!("{} '{}' imports itself", module.kind, module.name),
        ));
        return Ok(());
    }
    if let Some(bt) = &module.belongs_to {
        if name == bt.module {
            diags.push(YangError::new(
                ErrorKind::ImportCycle,
                span,
                format!(
                    "submodule '{}' imports its parent module '{}'",
                    module.name, name
                ),
            ));
            return Ok(());
        }
    }

    // Same module, same requested revision: drop the repeat
    if let Some(existing) = module
        .imports
        .iter()
        .find(|i| i.module == name && i.revision == revision)
    {
        diags.push(
            YangError::warning(
                ErrorKind::DuplicateStatement,
                span,
                format!("duplicate import of module '{}'", name),
            )
            .with_label(existing.span, "first imported here".to_string()),
        );
        return Ok(());
    }

    // The prefix must be unique among this record's own prefix and imports
    if module.effective_prefix() == Some(prefix.as_str()) {
        diags.push(YangError::new(
            ErrorKind::DuplicateName,
            span,
            format!(
                "import prefix '{}' collides with the {}'s own prefix",
                prefix, module.kind
            ),
        ));
        return Ok(());
    }
    if let Some(idx) = module.find_import_by_prefix(&prefix) {
        diags.push(
            YangError::new(
                ErrorKind::DuplicateName,
                span,
                format!(
                    "prefix '{}' is already bound to module '{}'",
                    prefix, module.imports[idx].module
                ),
            )
            .with_label(module.imports[idx].span, "first bound here".to_string()),
        );
        return Ok(());
    }

    module.imports.push(Import {
        module: name,
        prefix,
        revision,
        description,
        reference,
        resolved: None,
        status: LoadStatus::Ok,
        used: false,
        span,
    });
    Ok(())
}

pub(crate) fn parse_include(
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
            "include statement has no submodule name".to_string(),
        ));
        stream.skip_statement();
        return Ok(());
    };
    check_identifier(&name, name_span, diags);

    let mut revision: Option<(String, Span)> = None;
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
                    kw::REVISION_DATE => {
                        if let Some((_, first)) = &revision {
                            report_duplicate(kw::REVISION_DATE, stmt.span, *first, diags);
                        } else if let Some(value) = require_arg(stmt, diags) {
                            if validate_date(&value, stmt.span, diags) {
                                revision = Some((value, stmt.span));
                            }
                        }
                    }
                    // Documentation substatements are parsed but not kept
                    kw::DESCRIPTION | kw::REFERENCE => {
                        require_arg(stmt, diags);
                    }
                    _ => diags.push(YangError::new(
                        ErrorKind::Syntax,
                        stmt.span,
                        format!("'{}' statement is not valid in include", stmt.keyword),
                    )),
                }
            }
        }
        Some(other) => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!(
                    "expected ';' or '{{' after include '{}', found '{}'",
                    name, other
                ),
            ));
            stream.skip_statement();
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                stream.current_span(),
                "include statement is not terminated".to_string(),
            ));
        }
    }

    let span = stream.span_from(start);
    let revision = revision.map(|(value, _)| value);

    if name == module.name {
        diags.push(YangError::new(
            ErrorKind::IncludeCycle,
            span,
            format!("{} '{}' includes itself", module.kind, module.name),
        ));
        return Ok(());
    }
    if let Some(bt) = &module.belongs_to {
        if name == bt.module {
            diags.push(YangError::new(
                ErrorKind::IncludeCycle,
                span,
                format!(
                    "submodule '{}' includes its parent module '{}'",
                    module.name, name
                ),
            ));
            return Ok(());
        }
    }
    if let Some(idx) = module.find_include(&name) {
        diags.push(
            YangError::warning(
                ErrorKind::DuplicateStatement,
                span,
                format!("duplicate include of submodule '{}'", name),
            )
            .with_label(module.includes[idx].span, "first included here".to_string()),
        );
        return Ok(());
    }

    module.includes.push(Include {
        submodule: name,
        revision,
        resolved: None,
        status: LoadStatus::Ok,
        span,
    });
    Ok(())
}
