//! Statement keywords and section classification.
//!
//! YANG has no reserved words, so keywords arrive from the lexer as plain
//! unquoted strings and are matched by name at each dispatch point. The
//! constants here are the single source of truth for those names.

pub const MODULE: &str = "module";
pub const SUBMODULE: &str = "submodule";

// Header
pub const YANG_VERSION: &str = "yang-version";
pub const NAMESPACE: &str = "namespace";
pub const PREFIX: &str = "prefix";
pub const BELONGS_TO: &str = "belongs-to";

// Linkage
pub const IMPORT: &str = "import";
pub const INCLUDE: &str = "include";
pub const REVISION_DATE: &str = "revision-date";

// Meta
pub const ORGANIZATION: &str = "organization";
pub const CONTACT: &str = "contact";
pub const DESCRIPTION: &str = "description";
pub const REFERENCE: &str = "reference";

// Revision history
pub const REVISION: &str = "revision";

// Body
pub const EXTENSION: &str = "extension";
pub const FEATURE: &str = "feature";
pub const IF_FEATURE: &str = "if-feature";
pub const IDENTITY: &str = "identity";
pub const BASE: &str = "base";
pub const STATUS: &str = "status";
pub const TYPEDEF: &str = "typedef";
pub const GROUPING: &str = "grouping";
pub const CONTAINER: &str = "container";
pub const LEAF: &str = "leaf";
pub const LEAF_LIST: &str = "leaf-list";
pub const LIST: &str = "list";
pub const CHOICE: &str = "choice";
pub const ANYDATA: &str = "anydata";
pub const ANYXML: &str = "anyxml";
pub const USES: &str = "uses";
pub const RPC: &str = "rpc";
pub const NOTIFICATION: &str = "notification";
pub const AUGMENT: &str = "augment";
pub const DEVIATION: &str = "deviation";

/// The five statement sections, in their required order of appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Header,
    Linkage,
    Meta,
    Revision,
    Body,
}

impl Section {
    /// Name used in out-of-order diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Linkage => "linkage",
            Section::Meta => "meta",
            Section::Revision => "revision history",
            Section::Body => "body",
        }
    }
}

/// Section a top-level keyword belongs to, or None for unknown keywords.
pub fn section_of(keyword: &str) -> Option<Section> {
    match keyword {
        YANG_VERSION | NAMESPACE | PREFIX | BELONGS_TO => Some(Section::Header),
        IMPORT | INCLUDE => Some(Section::Linkage),
        ORGANIZATION | CONTACT | DESCRIPTION | REFERENCE => Some(Section::Meta),
        REVISION => Some(Section::Revision),
        _ if is_body_keyword(keyword) => Some(Section::Body),
        _ => None,
    }
}

/// True for every keyword that may open a body statement.
pub fn is_body_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        EXTENSION | FEATURE | IDENTITY | TYPEDEF | GROUPING
    ) || is_data_def_keyword(keyword)
}

/// True for the data definition and schema manipulation keywords whose
/// subtrees are captured without interpretation.
pub fn is_data_def_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        CONTAINER
            | LEAF
            | LEAF_LIST
            | LIST
            | CHOICE
            | ANYDATA
            | ANYXML
            | USES
            | RPC
            | NOTIFICATION
            | AUGMENT
            | DEVIATION
    )
}
