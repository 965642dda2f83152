// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Record types for the yangkit YANG toolkit.
//!
//! This crate contains the module record model produced by the parser and
//! consumed by the resolver, plus the foundation types shared by every
//! stage: source spans, diagnostics, and the generic statement tree.

pub mod error;
pub mod feature;
pub mod foundation;
pub mod module;
pub mod statement;

// Re-export commonly used types
pub use error::{
    Diagnostics, DiagnosticFormatter, ErrorKind, Label, LoadStatus, Severity, YangError,
};
pub use feature::{CycleMark, Feature, Identity, ResolvedRef, SymbolRef};
pub use foundation::{SourceFile, SourceMap, Span};
pub use module::{BelongsTo, Import, Include, Module, ModuleKind, Revision};
pub use statement::Statement;
