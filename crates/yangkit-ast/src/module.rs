//! Module and submodule records.
//!
//! A `Module` is the unit the parser fills and the resolver finishes. It
//! is mutable only while its load is in progress; once the loader installs
//! it (or hands it back to the caller) it is frozen behind an `Arc` and
//! never touched again.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LoadStatus;
use crate::feature::{Feature, Identity};
use crate::foundation::Span;
use crate::statement::Statement;

/// Whether a record came from a `module` or a `submodule` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Module,
    Submodule,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Module => write!(f, "module"),
            ModuleKind::Submodule => write!(f, "submodule"),
        }
    }
}

/// The `belongs-to` statement of a submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelongsTo {
    /// Name of the owning module
    pub module: String,
    /// Prefix the submodule uses to refer to the owning module
    pub prefix: String,
    pub span: Span,
}

/// One `revision` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Revision date, `YYYY-MM-DD`
    pub date: String,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub span: Span,
}

/// One `import` statement.
///
/// Owned by the importing record. `resolved` is bound by the loader once
/// the imported module has finished loading.
#[derive(Debug, Clone)]
pub struct Import {
    /// Name of the imported module
    pub module: String,
    /// Prefix bound to the import in this record
    pub prefix: String,
    /// Requested revision date, if the import pins one
    pub revision: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// The imported module, once loaded
    pub resolved: Option<Arc<Module>>,
    /// Outcome of loading the imported module
    pub status: LoadStatus,
    /// Set when anything in the record actually references the prefix
    pub used: bool,
    pub span: Span,
}

/// One `include` statement.
#[derive(Debug, Clone)]
pub struct Include {
    /// Name of the included submodule
    pub submodule: String,
    /// Requested revision date, if the include pins one
    pub revision: Option<String>,
    /// The included submodule, frozen after its unit resolved
    pub resolved: Option<Arc<Module>>,
    /// Outcome of loading the included submodule
    pub status: LoadStatus,
    pub span: Span,
}

/// A parsed module or submodule.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name from the `module`/`submodule` statement
    pub name: String,
    pub kind: ModuleKind,
    /// Argument of `yang-version`; "1" when absent
    pub yang_version: String,
    /// XML namespace URI (modules only)
    pub namespace: Option<String>,
    /// The module's own prefix (modules only)
    pub prefix: Option<String>,
    /// Owning module reference (submodules only)
    pub belongs_to: Option<BelongsTo>,

    pub organization: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,

    /// File this record was parsed from
    pub source: PathBuf,
    /// Selected revision: the greatest valid revision date, or None
    pub version: Option<String>,
    /// Full revision history in declaration order
    pub revisions: Vec<Revision>,

    pub imports: Vec<Import>,
    pub includes: Vec<Include>,

    pub features: Vec<Feature>,
    pub identities: Vec<Identity>,

    /// `typedef` definitions, captured without interpretation
    pub typedefs: Vec<Statement>,
    /// `grouping` definitions, captured without interpretation
    pub groupings: Vec<Statement>,
    /// `extension` definitions, captured without interpretation
    pub extensions: Vec<Statement>,
    /// Data definitions, rpcs, notifications, augments, and deviations
    pub data_defs: Vec<Statement>,
    /// Well-formed `prefix:keyword` statements at module level
    pub extension_uses: Vec<Statement>,

    /// Errors charged to this record, submodules included
    pub errors: u32,
    /// Warnings charged to this record, submodules included
    pub warnings: u32,

    /// Span of the `module`/`submodule` keyword and name
    pub span: Span,
}

impl Module {
    /// Creates an empty record for the parser to fill.
    pub fn new(name: String, kind: ModuleKind, source: PathBuf, span: Span) -> Self {
        Self {
            name,
            kind,
            yang_version: "1".to_string(),
            namespace: None,
            prefix: None,
            belongs_to: None,
            organization: None,
            contact: None,
            description: None,
            reference: None,
            source,
            version: None,
            revisions: Vec::new(),
            imports: Vec::new(),
            includes: Vec::new(),
            features: Vec::new(),
            identities: Vec::new(),
            typedefs: Vec::new(),
            groupings: Vec::new(),
            extensions: Vec::new(),
            data_defs: Vec::new(),
            extension_uses: Vec::new(),
            errors: 0,
            warnings: 0,
            span,
        }
    }

    pub fn is_submodule(&self) -> bool {
        self.kind == ModuleKind::Submodule
    }

    /// Final status implied by the charged counters.
    pub fn status(&self) -> LoadStatus {
        if self.errors > 0 {
            LoadStatus::Error
        } else if self.warnings > 0 {
            LoadStatus::Warning
        } else {
            LoadStatus::Ok
        }
    }

    /// The prefix this record uses for its own definitions.
    ///
    /// For a module that is its `prefix` statement; for a submodule the
    /// `belongs-to` prefix, which names the owning module's namespace.
    pub fn effective_prefix(&self) -> Option<&str> {
        match self.kind {
            ModuleKind::Module => self.prefix.as_deref(),
            ModuleKind::Submodule => self.belongs_to.as_ref().map(|b| b.prefix.as_str()),
        }
    }

    /// Index of the feature with the given name.
    pub fn find_feature(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }

    /// Index of the identity with the given name.
    pub fn find_identity(&self, name: &str) -> Option<usize> {
        self.identities.iter().position(|i| i.name == name)
    }

    /// Index of the import bound to the given prefix.
    pub fn find_import_by_prefix(&self, prefix: &str) -> Option<usize> {
        self.imports.iter().position(|i| i.prefix == prefix)
    }

    /// Index of the import of the given module name.
    pub fn find_import(&self, module: &str) -> Option<usize> {
        self.imports.iter().position(|i| i.module == module)
    }

    /// Index of the include of the given submodule name.
    pub fn find_include(&self, submodule: &str) -> Option<usize> {
        self.includes.iter().position(|i| i.submodule == submodule)
    }
}
