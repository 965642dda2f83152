//! Foundation types shared across the toolkit.

pub mod span;

pub use span::{SourceFile, SourceMap, Span};
