//! Statement parser for YANG module files
//!
//! Consumes the token stream produced by `yangkit-lexer` and builds the
//! `Module` records defined in `yangkit-ast`. The parser reads the module
//! front (header, linkage, meta, revision history) statement by statement
//! and captures body definitions as generic statement subtrees, since
//! dependency resolution only inspects features, identities and the
//! front sections.
//!
//! Errors accumulate in a `Diagnostics` collector; parsing stops early
//! only when no further progress is possible.

pub mod parser;

pub use parser::{TokenStream, parse_body, parse_front, parse_module};

// Re-export the token type so callers lex and parse with one import.
pub use yangkit_lexer::Token;
