//! Hand-written recursive descent parser for YANG statements.
//!
//! A module is parsed in the five sections YANG prescribes: header,
//! linkage, meta, revision history, body. Problems are recorded in a
//! [`Diagnostics`] collector and parsing continues, so one pass over a
//! file yields every diagnostic it can; the final status of the module is
//! the worst severity seen. Only three situations abort a module outright:
//! unexpected end of input, an unterminated string, and a missing `{`
//! after the module name.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead and statement skipping
//! - `kw`: keyword table and section classification
//! - `helpers`: argument reading, generic subtree capture, validators
//! - `header`, `linkage`, `meta`, `revision`: front-section statements
//! - `feature`: feature and identity statements
//!
//! ## Public API
//!
//! [`parse_module`] runs front and body in one call. The loader instead
//! calls [`parse_front`], decides whether the dependencies need loading
//! first, and later resumes with [`parse_body`] on a stream repositioned
//! with [`TokenStream::seek`].

mod stream;

pub use stream::TokenStream;

pub mod kw;

mod feature;
mod header;
mod helpers;
mod linkage;
mod meta;
mod revision;

use std::ops::Range;
use std::path::Path;

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, ErrorKind, Module, ModuleKind, YangError};
use yangkit_lexer::Token;

use helpers::{capture_statement, check_identifier, read_argument, split_prefix, unterminated};
use kw::Section;

/// Spans of the single-instance front statements seen so far, for
/// duplicate reporting.
#[derive(Default)]
pub(crate) struct FrontSeen {
    pub(crate) yang_version: Option<Span>,
    pub(crate) namespace: Option<Span>,
    pub(crate) prefix: Option<Span>,
    pub(crate) belongs_to: Option<Span>,
    pub(crate) organization: Option<Span>,
    pub(crate) contact: Option<Span>,
    pub(crate) description: Option<Span>,
    pub(crate) reference: Option<Span>,
}

/// Parse a complete module or submodule from a token stream.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs
/// - `file_id`: File identifier for span tracking
/// - `source`: Path the tokens were read from, kept on the record and
///   checked against the declared name
/// - `expect`: Record kind the caller requires, or None to accept either
///
/// # Returns
///
/// The parsed record with its error and warning counters filled in, plus
/// every diagnostic. The record is `None` only when the front could not
/// be parsed at all; a fatal error inside the body still returns the
/// record, carrying error status.
pub fn parse_module(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
    source: &Path,
    expect: Option<ModuleKind>,
) -> (Option<Module>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut stream = TokenStream::new(tokens, file_id);

    let mut module = match parse_front(&mut stream, &mut diags, expect, source) {
        Ok(module) => module,
        Err(fatal) => {
            diags.push(fatal);
            return (None, diags);
        }
    };
    if let Err(fatal) = parse_body(&mut stream, &mut diags, &mut module) {
        diags.push(fatal);
    }

    module.errors = diags.error_count() as u32;
    module.warnings = diags.warning_count() as u32;
    (Some(module), diags)
}

/// Parse the front of a module: the `module`/`submodule` statement and the
/// header, linkage, meta and revision sections.
///
/// On success the stream is positioned at the first body statement (or at
/// the closing brace), so the caller can pause here, load dependencies,
/// and resume with [`parse_body`].
///
/// # Errors
///
/// Returns the fatal diagnostic when no record can be produced: empty
/// input, a first statement that is not `module`/`submodule`, a missing
/// `{` after the name, or an unterminated string.
pub fn parse_front(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    expect: Option<ModuleKind>,
    source: &Path,
) -> Result<Module, YangError> {
    if stream.at_end() {
        return Err(YangError::new(
            ErrorKind::UnexpectedEof,
            Span::zero(stream.file_id()),
            "expected a module or submodule statement".to_string(),
        ));
    }

    let kw_span = stream.current_span();
    let kind = match stream.advance().cloned() {
        Some(Token::Ident(word)) if &*word == kw::MODULE => ModuleKind::Module,
        Some(Token::Ident(word)) if &*word == kw::SUBMODULE => ModuleKind::Submodule,
        Some(token) => {
            return Err(YangError::new(
                ErrorKind::Syntax,
                kw_span,
                format!("expected 'module' or 'submodule', found '{}'", token),
            ));
        }
        None => {
            return Err(YangError::new(
                ErrorKind::UnexpectedEof,
                kw_span,
                "expected a module or submodule statement".to_string(),
            ));
        }
    };

    let (name, name_span) = match read_argument(stream, diags)? {
        Some((name, span)) => {
            check_identifier(&name, span, diags);
            (name, span)
        }
        None => {
            diags.push(YangError::new(
                ErrorKind::Syntax,
                stream.current_span(),
                format!("missing {} name", kind),
            ));
            (String::new(), kw_span)
        }
    };

    if let Some(expected) = expect {
        if expected != kind {
            diags.push(YangError::new(
                ErrorKind::WrongModuleType,
                kw_span,
                format!("expected a {}, found {} '{}'", expected, kind, name),
            ));
        }
    }

    let mut module = Module::new(name, kind, source.to_path_buf(), kw_span.merge(&name_span));
    check_file_name(&module, name_span, diags);

    stream.expect(Token::LBrace)?;

    let mut seen = FrontSeen::default();
    let mut section = Section::Header;
    loop {
        let token = match stream.peek().cloned() {
            None | Some(Token::RBrace) => break,
            Some(t) => t,
        };
        match token {
            Token::Ident(word) => {
                let word = word.to_string();
                if split_prefix(&word).is_some() {
                    // Extension statements may sit between any sections
                    let stmt = capture_statement(stream, diags)?;
                    module.extension_uses.push(stmt);
                    continue;
                }
                match kw::section_of(&word) {
                    Some(Section::Body) => break,
                    Some(s) if s < section => {
                        diags.push(YangError::new(
                            ErrorKind::OutOfOrder,
                            stream.current_span(),
                            format!(
                                "'{}' statement must appear before the {} section",
                                word,
                                section.name()
                            ),
                        ));
                        stream.advance();
                        stream.skip_statement();
                    }
                    Some(s) => {
                        section = s;
                        front_statement(&word, stream, diags, &mut module, &mut seen)?;
                    }
                    None => {
                        diags.push(YangError::new(
                            ErrorKind::Syntax,
                            stream.current_span(),
                            format!("unknown statement '{}'", word),
                        ));
                        stream.advance();
                        stream.skip_statement();
                    }
                }
            }
            Token::UnterminatedString => return Err(unterminated(stream.current_span())),
            other => {
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

    finish_front(&module, diags);
    Ok(module)
}

/// Parse the body section and the closing brace of a record whose front
/// was already parsed.
///
/// # Errors
///
/// Returns the fatal diagnostic when the input ends before the closing
/// brace or a string is unterminated.
pub fn parse_body(
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
) -> Result<(), YangError> {
    loop {
        let token = match stream.peek().cloned() {
            None => {
                return Err(YangError::new(
                    ErrorKind::UnexpectedEof,
                    stream.current_span(),
                    format!("missing '}}' to close {} '{}'", module.kind, module.name),
                ));
            }
            Some(t) => t,
        };
        match token {
            Token::RBrace => {
                stream.advance();
                break;
            }
            Token::Ident(word) => {
                let word = word.to_string();
                if split_prefix(&word).is_some() {
                    let stmt = capture_statement(stream, diags)?;
                    module.extension_uses.push(stmt);
                    continue;
                }
                match word.as_str() {
                    kw::FEATURE => feature::parse_feature(stream, diags, module)?,
                    kw::IDENTITY => feature::parse_identity(stream, diags, module)?,
                    kw::TYPEDEF => {
                        let stmt = capture_statement(stream, diags)?;
                        module.typedefs.push(stmt);
                    }
                    kw::GROUPING => {
                        let stmt = capture_statement(stream, diags)?;
                        module.groupings.push(stmt);
                    }
                    kw::EXTENSION => {
                        let stmt = capture_statement(stream, diags)?;
                        module.extensions.push(stmt);
                    }
                    _ if kw::is_data_def_keyword(&word) => {
                        let stmt = capture_statement(stream, diags)?;
                        module.data_defs.push(stmt);
                    }
                    _ => match kw::section_of(&word) {
                        Some(_) => {
                            diags.push(YangError::new(
                                ErrorKind::OutOfOrder,
                                stream.current_span(),
                                format!("'{}' statement must appear before the body", word),
                            ));
                            stream.advance();
                            stream.skip_statement();
                        }
                        None => {
                            diags.push(YangError::new(
                                ErrorKind::Syntax,
                                stream.current_span(),
                                format!("unknown statement '{}'", word),
                            ));
                            stream.advance();
                            stream.skip_statement();
                        }
                    },
                }
            }
            Token::UnterminatedString => return Err(unterminated(stream.current_span())),
            other => {
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

    if !stream.at_end() {
        diags.push(YangError::new(
            ErrorKind::TrailingInput,
            stream.current_span(),
            format!(
                "input continues after the closing '}}' of {} '{}'",
                module.kind, module.name
            ),
        ));
    }
    Ok(())
}

/// Dispatch one front-section statement (keyword already classified).
fn front_statement(
    word: &str,
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    match word {
        kw::YANG_VERSION => header::parse_yang_version(stream, diags, module, seen),
        kw::NAMESPACE => header::parse_namespace(stream, diags, module, seen),
        kw::PREFIX => header::parse_prefix(stream, diags, module, seen),
        kw::BELONGS_TO => header::parse_belongs_to(stream, diags, module, seen),
        kw::IMPORT => linkage::parse_import(stream, diags, module),
        kw::INCLUDE => linkage::parse_include(stream, diags, module),
        kw::ORGANIZATION | kw::CONTACT | kw::DESCRIPTION | kw::REFERENCE => {
            meta::parse_meta_statement(word, stream, diags, module, seen)
        }
        kw::REVISION => revision::parse_revision(stream, diags, module),
        _ => Ok(()),
    }
}

/// The file stem, minus any `@revision` part, should match the record name.
fn check_file_name(module: &Module, name_span: Span, diags: &mut Diagnostics) {
    if module.name.is_empty() {
        return;
    }
    let Some(stem) = module.source.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    let base = stem.split('@').next().unwrap_or(stem);
    if base != module.name {
        diags.push(YangError::warning(
            ErrorKind::FileMismatch,
            name_span,
            format!(
                "{} '{}' is stored in a file named '{}'",
                module.kind, module.name, stem
            ),
        ));
    }
}

/// Mandatory-statement checks that run once the front is complete.
fn finish_front(module: &Module, diags: &mut Diagnostics) {
    match module.kind {
        ModuleKind::Module => {
            if module.namespace.is_none() {
                diags.push(YangError::new(
                    ErrorKind::MissingStatement,
                    module.span,
                    format!("module '{}' has no namespace statement", module.name),
                ));
            }
            if module.prefix.is_none() {
                diags.push(YangError::new(
                    ErrorKind::MissingStatement,
                    module.span,
                    format!("module '{}' has no prefix statement", module.name),
                ));
            }
        }
        ModuleKind::Submodule => {
            if module.belongs_to.is_none() {
                diags.push(YangError::new(
                    ErrorKind::MissingStatement,
                    module.span,
                    format!("submodule '{}' has no belongs-to statement", module.name),
                ));
            }
        }
    }
    if module.revisions.is_empty() {
        diags.push(YangError::warning(
            ErrorKind::MissingRevision,
            module.span,
            format!("{} '{}' has no revision statement", module.kind, module.name),
        ));
    }
}
