// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Module discovery, dependency loading, and reference resolution.
//!
//! This crate turns a module name into a finished, registered record:
//!
//! - [`SearchPaths`] finds the file for a module name and revision
//! - [`Loader`] drives the dependency traversal with an explicit frame
//!   stack, parsing fronts eagerly and bodies once dependencies settle
//! - [`resolve_unit`](resolve::resolve_unit) binds feature and identity
//!   references across a module and its submodules and hunts reference
//!   loops
//! - [`ModuleRegistry`] keeps the finished `Arc<Module>` records so a
//!   module is loaded at most once per loader
//!
//! The crate is deliberately quiet about failure: everything recoverable
//! lands in a [`Diagnostics`](yangkit_ast::Diagnostics) collector and
//! the load keeps going, so one call reports every problem in the
//! dependency closure rather than the first.

pub mod context;
pub mod loader;
pub mod locate;
pub mod registry;
pub mod resolve;

pub use context::{ChainEntry, LoadOptions, ResolutionContext};
pub use loader::{LoadResult, Loader};
pub use locate::{LocateError, SearchPaths};
pub use registry::ModuleRegistry;
pub use resolve::resolve_unit;
