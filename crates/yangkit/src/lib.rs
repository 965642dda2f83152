//! # yangkit
//!
//! YANG module resolution engine: finds schema module files on a search
//! path, parses them into structured records, and resolves imports,
//! includes, features, and identities across the dependency closure.
//!
//! This crate is a facade that re-exports functionality from:
//! - `yangkit-ast` - record types, spans, diagnostics
//! - `yangkit-lexer` - tokenization
//! - `yangkit-parser` - statement parsing into module records
//! - `yangkit-resolve` - file discovery, dependency loading, resolution
//!
//! ## Architecture
//!
//! ```text
//! yangkit-ast      - records + foundation types
//!     ↓
//! yangkit-lexer    - tokenization (logos)
//!     ↓
//! yangkit-parser   - hand-written statement parser
//!     ↓
//! yangkit-resolve  - locator, loader, registry, resolver
//!     ↓
//! yangkit (facade) - re-exports + load API
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use yangkit::load_module;
//!
//! let outcome = load_module("ietf-interfaces", None);
//! if let Some(module) = &outcome.result.module {
//!     println!("{} revision {:?}", module.name, module.version);
//! }
//! println!("{}", yangkit::format_diagnostics(
//!     &outcome.result.diagnostics,
//!     &outcome.sources,
//! ));
//! ```

// Re-export record and foundation types
pub use yangkit_ast::{self as ast, *};

// Re-export lexer
pub use yangkit_lexer as lexer;
pub use yangkit_lexer::Token;

// Re-export parser
pub use yangkit_parser as parser;
pub use yangkit_parser::{TokenStream, parse_body, parse_front, parse_module};

// Re-export resolver
pub use yangkit_resolve as resolve;
pub use yangkit_resolve::*;

// Keep load module (high-level API)
pub mod load;

pub use load::{LoadResultWithSources, format_diagnostics, load_module, load_module_from};

// Version info
/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
