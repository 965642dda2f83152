//! Meta section: organization, contact, description, reference.
//!
//! All four are at-most-once leaf statements; the first value wins and a
//! repeat is diagnosed against it.

use yangkit_ast::foundation::Span;
use yangkit_ast::{Diagnostics, Module, YangError};

use super::helpers::{report_duplicate, simple_statement};
use super::{FrontSeen, TokenStream, kw};

pub(crate) fn parse_meta_statement(
    word: &str,
    stream: &mut TokenStream,
    diags: &mut Diagnostics,
    module: &mut Module,
    seen: &mut FrontSeen,
) -> Result<(), YangError> {
    let kw_span = stream.current_span();
    let arg = simple_statement(word, stream, diags)?;
    let value = arg.map(|(value, _)| value);

    let (slot, first): (&mut Option<String>, &mut Option<Span>) = match word {
        kw::ORGANIZATION => (&mut module.organization, &mut seen.organization),
        kw::CONTACT => (&mut module.contact, &mut seen.contact),
        kw::DESCRIPTION => (&mut module.description, &mut seen.description),
        kw::REFERENCE => (&mut module.reference, &mut seen.reference),
        _ => return Ok(()),
    };

    if let Some(first_span) = *first {
        report_duplicate(word, kw_span, first_span, diags);
    } else {
        *first = Some(kw_span);
        *slot = value;
    }
    Ok(())
}
