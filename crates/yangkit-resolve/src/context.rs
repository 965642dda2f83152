//! Per-load bookkeeping.
//!
//! One [`ResolutionContext`] lives for the duration of a single
//! [`Loader::load`](crate::Loader::load) call. It carries the two
//! dependency chains used for cycle detection, the completion memo that
//! keeps a module from being loaded twice within one call, the negative
//! cache for dependencies that already failed, and the merged
//! diagnostic report handed back to the caller.

use std::sync::Arc;

use indexmap::IndexMap;
use yangkit_ast::{Diagnostics, ErrorKind, Module, Span};

/// Knobs for a single load request.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Stop after locating and parsing the module header. No
    /// dependencies are loaded and nothing is installed.
    pub search_only: bool,
    /// Load and resolve normally but do not install the results.
    pub parse_only: bool,
    /// Install the requested module even when it finished with errors.
    pub keep_partial: bool,
    /// Descend into subdirectories of the working directory and the
    /// module search path. Library trees always descend.
    pub search_subdirs: bool,
    /// Upper bound on dependency nesting before the load is abandoned.
    pub max_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            search_only: false,
            parse_only: false,
            keep_partial: false,
            search_subdirs: true,
            max_depth: 64,
        }
    }
}

/// One module currently being loaded, as seen by cycle detection.
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub name: String,
    pub revision: Option<String>,
    /// Where the module was requested from, for diagnostics.
    pub span: Span,
}

/// State shared by every frame of one load request.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    /// Modules on the active import path, outermost first.
    pub import_chain: Vec<ChainEntry>,
    /// Submodules on the active include path, outermost first.
    pub include_chain: Vec<ChainEntry>,
    /// Modules finished during this call, errored ones included. This
    /// is a memo, not a cache of good results.
    pub completed: IndexMap<(String, Option<String>), Arc<Module>>,
    /// Dependencies that could not be loaded at all, with the reason.
    pub failed: IndexMap<(String, Option<String>), ErrorKind>,
    /// Everything reported during the call, in load order.
    pub report: Diagnostics,
}

/// Revision compatibility for chain and memo hits.
///
/// Two revisions match when either side leaves the revision open.
pub(crate) fn revisions_compatible(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the named module is already being imported somewhere up
    /// the active chain. A hit means the new request would close a cycle.
    pub fn on_import_chain(&self, name: &str, revision: Option<&str>) -> bool {
        self.import_chain
            .iter()
            .any(|entry| entry.name == name && revisions_compatible(entry.revision.as_deref(), revision))
    }

    /// Include-chain counterpart of [`Self::on_import_chain`].
    pub fn on_include_chain(&self, name: &str, revision: Option<&str>) -> bool {
        self.include_chain
            .iter()
            .any(|entry| entry.name == name && revisions_compatible(entry.revision.as_deref(), revision))
    }

    /// Looks up a module finished earlier in this call.
    ///
    /// With a revision the match is exact; without one the greatest
    /// completed revision of the name wins, mirroring registry lookup.
    pub fn find_completed(&self, name: &str, revision: Option<&str>) -> Option<Arc<Module>> {
        match revision {
            Some(rev) => self
                .completed
                .get(&(name.to_string(), Some(rev.to_string())))
                .cloned(),
            None => self
                .completed
                .iter()
                .filter(|((n, _), _)| n == name)
                .max_by(|((_, a), _), ((_, b), _)| a.cmp(b))
                .map(|(_, module)| module.clone()),
        }
    }

    /// Looks up the recorded failure for a dependency, if any.
    pub fn find_failed(&self, name: &str, revision: Option<&str>) -> Option<ErrorKind> {
        self.failed
            .get(&(name.to_string(), revision.map(str::to_string)))
            .copied()
    }
}
