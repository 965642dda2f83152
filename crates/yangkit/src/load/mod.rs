//! High-level load API.
//!
//! One-shot wrappers over [`Loader`] for callers that want a module
//! loaded and its diagnostics rendered without holding loader state.

use std::path::Path;

use crate::ast::{DiagnosticFormatter, Diagnostics, SourceMap, YangError};
use crate::resolve::{LoadOptions, LoadResult, Loader, SearchPaths};

/// A load result together with the sources read during it.
///
/// Diagnostic spans only mean something next to the source map that
/// produced them; a caller that wants formatted output needs both
/// halves, so the one-shot functions hand them back together.
pub struct LoadResultWithSources {
    pub result: LoadResult,
    pub sources: SourceMap,
}

/// Loads one module and its dependency closure.
///
/// Builds a loader from the process environment, runs a single load
/// with default options, and returns the result with the accumulated
/// sources. Callers that load repeatedly should hold a [`Loader`]
/// instead and keep its registry warm across calls.
pub fn load_module(name: &str, revision: Option<&str>) -> LoadResultWithSources {
    let mut loader = Loader::from_env();
    let result = loader.load(name, revision, &LoadOptions::default());
    LoadResultWithSources {
        result,
        sources: loader.into_sources(),
    }
}

/// Loads one module with the search rooted at a directory.
///
/// The directory stands in for the working directory at the front of
/// the search order; the environment locations are not consulted.
pub fn load_module_from(root: &Path, name: &str, revision: Option<&str>) -> LoadResultWithSources {
    let mut paths = SearchPaths::empty();
    paths.cwd = root.to_path_buf();
    let mut loader = Loader::new(paths);
    let result = loader.load(name, revision, &LoadOptions::default());
    LoadResultWithSources {
        result,
        sources: loader.into_sources(),
    }
}

/// Formats load diagnostics with source context.
pub fn format_diagnostics(diagnostics: &Diagnostics, sources: &SourceMap) -> String {
    let formatter = DiagnosticFormatter::new(sources);
    formatter.format_all(diagnostics.as_slice())
}

/// Formats a single diagnostic with source context.
pub fn format_diagnostic(error: &YangError, sources: &SourceMap) -> String {
    DiagnosticFormatter::new(sources).format(error)
}
