//! Feature and identity records.
//!
//! Both statement families carry cross-references that cannot be checked
//! while parsing: `if-feature` names other features, `base` names other
//! identities, and either may point across an import. The resolver binds
//! these in a separate pass and runs cycle detection over the result, so
//! the records here keep both the unresolved reference form and the bound
//! form, plus the traversal marker.

use crate::foundation::Span;
use crate::statement::Statement;

/// Unresolved reference to a feature or identity: `[prefix:]name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub prefix: Option<String>,
    pub name: String,
    pub span: Span,
}

impl std::fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{}:{}", p, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A bound reference.
///
/// References within the load unit use indices rather than pointers: the
/// unit's records are still mutable while resolution runs, so a bound
/// edge is (member, index) into the unit. Member 0 is the module itself,
/// members 1.. are its submodules in completion order. References into
/// imported modules are index-by-name into an already frozen record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    /// Definition inside the current load unit
    Unit { member: usize, index: usize },
    /// Definition in an imported (frozen) module
    Imported {
        module: String,
        revision: Option<String>,
        index: usize,
    },
}

/// Traversal marker for definition-loop detection.
///
/// Transitions are monotonic: Unvisited -> InProgress -> Done or OnCycle.
/// A node marked OnCycle belongs to a cycle that has already been
/// reported; later traversals skip it instead of reporting again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleMark {
    #[default]
    Unvisited,
    InProgress,
    Done,
    OnCycle,
}

/// One `feature` definition.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    /// `if-feature` references in declaration order
    pub if_features: Vec<SymbolRef>,
    /// Bound references, filled by the resolver
    pub resolved: Vec<ResolvedRef>,
    pub mark: CycleMark,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// Substatements the engine does not interpret (e.g. `status`)
    pub substmts: Vec<Statement>,
    pub span: Span,
}

impl Feature {
    pub fn new(name: String, span: Span) -> Self {
        Self {
            name,
            if_features: Vec::new(),
            resolved: Vec::new(),
            mark: CycleMark::Unvisited,
            description: None,
            reference: None,
            substmts: Vec::new(),
            span,
        }
    }
}

/// One `identity` definition.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    /// The `base` reference, if any
    pub base: Option<SymbolRef>,
    /// Bound base, filled by the resolver
    pub resolved_base: Option<ResolvedRef>,
    /// Identities in the same unit that derive from this one, as
    /// (member, index) pairs. Derivations in other modules are not
    /// recorded here; installed modules are frozen.
    pub children: Vec<(usize, usize)>,
    pub mark: CycleMark,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// Substatements the engine does not interpret
    pub substmts: Vec<Statement>,
    pub span: Span,
}

impl Identity {
    pub fn new(name: String, span: Span) -> Self {
        Self {
            name,
            base: None,
            resolved_base: None,
            children: Vec::new(),
            mark: CycleMark::Unvisited,
            description: None,
            reference: None,
            substmts: Vec::new(),
            span,
        }
    }
}
