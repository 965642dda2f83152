//! Diagnostics for module loading.
//!
//! The engine never stops at the first problem: recoverable errors and
//! warnings accumulate while parsing continues, and the worst severity
//! seen decides the final status of a module. This module provides the
//! pieces of that scheme:
//!
//! - `YangError` - single diagnostic with primary and optional secondary spans
//! - `ErrorKind` - fixed enumeration of diagnostic categories
//! - `Severity` - info, warning, or error
//! - `Diagnostics` - ordered collector with worst-status accumulation
//! - `DiagnosticFormatter` - renders diagnostics with source snippets
//!
//! # Examples
//!
//! ```
//! # use yangkit_ast::error::*;
//! # use yangkit_ast::foundation::Span;
//! # let span = Span::new(0, 0, 5, 1);
//! let error = YangError::new(
//!     ErrorKind::DuplicateName,
//!     span,
//!     format!("duplicate definition of feature '{}'", "telemetry"),
//! );
//! ```

use std::fmt;

use crate::foundation::{SourceMap, Span};

/// Loading diagnostic with source location and message.
///
/// Each diagnostic has:
/// - Primary span (where the problem was detected)
/// - Error kind (categorizes the diagnostic)
/// - Message (human-readable explanation)
/// - Optional secondary labels (related code locations)
/// - Optional notes (additional context or suggestions)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YangError {
    /// Category of this diagnostic
    pub kind: ErrorKind,
    /// Severity level
    pub severity: Severity,
    /// Primary source location
    pub span: Span,
    /// Primary message
    pub message: String,
    /// Additional labeled spans
    pub labels: Vec<Label>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// Category of loading diagnostic.
///
/// Kinds are grouped by the stage that detects them: statement parsing,
/// file location and loading, linkage and reference resolution, and the
/// advisory checks that only ever warn.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    // Statement parsing
    /// Malformed statement (unexpected token, bad structure)
    Syntax = 0,
    /// Input ended while a statement or block was still open
    UnexpectedEof = 1,
    /// Identifier does not satisfy the YANG name rules
    InvalidName = 2,
    /// Argument value is not acceptable for the statement
    InvalidValue = 3,
    /// Mandatory substatement is absent
    MissingStatement = 4,
    /// Statement that may appear at most once appeared again
    DuplicateStatement = 5,
    /// Statement appeared outside its required section
    OutOfOrder = 6,
    /// Tokens remain after the module's closing brace
    TrailingInput = 7,

    // Location and loading
    /// No file for the requested module on the search path
    ModuleNotFound = 8,
    /// Import resolved to a submodule, or include to a module
    WrongModuleType = 9,
    /// Selected revision does not match the requested one
    RevisionMismatch = 10,
    /// Located file is in a format this build does not parse
    UnsupportedFormat = 11,
    /// File could not be read
    Io = 12,

    // Linkage and resolution
    /// Import chain returned to a module currently being loaded
    ImportCycle = 13,
    /// Include chain returned to a submodule currently being loaded
    IncludeCycle = 14,
    /// Feature or identity reference chain loops back on itself
    DefinitionLoop = 15,
    /// Reference to a feature, identity, or prefix that does not exist
    UndefinedName = 16,
    /// Duplicate definition or prefix binding
    DuplicateName = 17,
    /// Imported or included module finished loading with errors
    DependencyErrors = 18,

    // Advisory
    /// Module name differs from the file name stem
    FileMismatch = 19,
    /// Revision statements are not in reverse chronological order
    BadRevisionOrder = 20,
    /// Module has no revision statement
    MissingRevision = 21,
    /// Imported module is never referenced
    UnusedImport = 22,
    /// Revision date predates 1970
    OldRevision = 23,
    /// Revision date lies in the future
    FutureRevision = 24,

    // Generic
    /// Broken engine invariant (bug in the loader)
    Internal = 25,
}

/// Human-readable names for error kinds.
///
/// Index matches ErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "syntax error",             // 0: Syntax
    "unexpected end of input",  // 1: UnexpectedEof
    "invalid name",             // 2: InvalidName
    "invalid value",            // 3: InvalidValue
    "missing statement",        // 4: MissingStatement
    "duplicate statement",      // 5: DuplicateStatement
    "statement out of order",   // 6: OutOfOrder
    "extra input",              // 7: TrailingInput
    "module not found",         // 8: ModuleNotFound
    "wrong module type",        // 9: WrongModuleType
    "revision mismatch",        // 10: RevisionMismatch
    "unsupported format",       // 11: UnsupportedFormat
    "read error",               // 12: Io
    "import cycle",             // 13: ImportCycle
    "include cycle",            // 14: IncludeCycle
    "definition loop",          // 15: DefinitionLoop
    "undefined name",           // 16: UndefinedName
    "duplicate name",           // 17: DuplicateName
    "errors in dependency",     // 18: DependencyErrors
    "file name mismatch",       // 19: FileMismatch
    "misordered revisions",     // 20: BadRevisionOrder
    "missing revision",         // 21: MissingRevision
    "unused import",            // 22: UnusedImport
    "old revision date",        // 23: OldRevision
    "future revision date",     // 24: FutureRevision
    "internal error",           // 25: Internal
];

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note
    Info,
    /// Warning (module is usable but suspicious)
    Warning,
    /// Error (module cannot be installed)
    Error,
}

/// Final status of a load, derived from the worst severity encountered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadStatus {
    /// No diagnostics above info level
    #[default]
    Ok,
    /// Warnings only
    Warning,
    /// At least one error
    Error,
}

/// Secondary labeled span in a diagnostic.
///
/// Used to point to related code locations (e.g. "first imported here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Source location
    pub span: Span,
    /// Label text
    pub message: String,
}

impl YangError {
    /// Creates a new error diagnostic.
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Error, span, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Warning, span, message)
    }

    /// Creates a new informational diagnostic.
    pub fn info(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::with_severity(kind, Severity::Info, span, message)
    }

    /// Internal constructor with explicit severity.
    fn with_severity(kind: ErrorKind, severity: Severity, span: Span, message: String) -> Self {
        Self {
            kind,
            severity,
            span,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a secondary labeled span. Returns self for chaining.
    pub fn with_label(mut self, span: Span, message: String) -> Self {
        self.labels.push(Label { span, message });
        self
    }

    /// Adds a note or hint. Returns self for chaining.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    /// True when this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl ErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }

    /// True for the kinds that abort the current module outright.
    ///
    /// Everything else is recorded and parsing continues.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::UnexpectedEof | ErrorKind::Io | ErrorKind::Internal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Ok => write!(f, "ok"),
            LoadStatus::Warning => write!(f, "warning"),
            LoadStatus::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for YangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity,
            self.kind.name(),
            self.message
        )
    }
}

impl std::error::Error for YangError {}

/// Ordered diagnostic collector.
///
/// Statement parsers and the resolver push into one of these instead of
/// returning early; the collector keeps declaration order and answers the
/// "worst status wins" questions at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<YangError>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Records a diagnostic.
    pub fn push(&mut self, error: YangError) {
        self.items.push(error);
    }

    /// Moves every diagnostic out of `other` into this collector.
    pub fn merge(&mut self, other: Diagnostics) {
        let mut other = other;
        self.items.append(&mut other.items);
    }

    /// The worst severity recorded, or None when empty.
    pub fn worst(&self) -> Option<Severity> {
        self.items.iter().map(|e| e.severity).max()
    }

    /// Final status implied by the recorded diagnostics.
    pub fn status(&self) -> LoadStatus {
        match self.worst() {
            Some(Severity::Error) => LoadStatus::Error,
            Some(Severity::Warning) => LoadStatus::Warning,
            _ => LoadStatus::Ok,
        }
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|e| e.is_error()).count()
    }

    /// Number of warning-severity diagnostics.
    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|e| e.severity == Severity::Warning)
            .count()
    }

    /// True when at least one error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|e| e.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YangError> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[YangError] {
        &self.items
    }

    /// Consumes the collector, yielding the diagnostics in order.
    pub fn into_vec(self) -> Vec<YangError> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = YangError;
    type IntoIter = std::vec::IntoIter<YangError>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a YangError;
    type IntoIter = std::slice::Iter<'a, YangError>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Formats diagnostics with source code context.
///
/// Produces rich messages with:
/// - File path and line/column location
/// - Source code snippet
/// - Visual indicators (^^^) under diagnostic spans
/// - Secondary labels
/// - Notes and hints
///
/// # Examples
///
/// ```
/// # use yangkit_ast::error::*;
/// # use yangkit_ast::foundation::{Span, SourceMap};
/// # use std::path::PathBuf;
/// let mut sources = SourceMap::new();
/// let file_id = sources.add_file(
///     PathBuf::from("a.yang"),
///     "module a {\n  import missing { prefix m; }\n}\n".to_string(),
/// );
/// let span = Span::new(file_id, 20, 27, 2);
///
/// let error = YangError::new(
///     ErrorKind::ModuleNotFound,
///     span,
///     "module 'missing' not found".to_string(),
/// );
///
/// let formatter = DiagnosticFormatter::new(&sources);
/// let formatted = formatter.format(&error);
/// ```
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    /// Creates a new diagnostic formatter over a source map.
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Formats a diagnostic as a string with source context.
    pub fn format(&self, error: &YangError) -> String {
        let mut output = String::new();

        // Header: severity and message
        output.push_str(&format!(
            "{}: {}: {}\n",
            error.severity,
            error.kind.name(),
            error.message
        ));

        // A diagnostic produced before any file was read carries a span
        // that points at no registered file. Stop after the header then.
        if error.span.file_id as usize >= self.sources.file_count() {
            for note in &error.notes {
                output.push_str(&format!("   = help: {}\n", note));
            }
            return output;
        }

        // Location and snippet
        let file_path = self.sources.file_path(&error.span);
        let (line, col) = self.sources.line_col(&error.span);
        output.push_str(&format!("  --> {}:{}:{}\n", file_path.display(), line, col));

        // Source line
        let file = self.sources.file(&error.span);
        if let Some(source_line) = file.line_text(line) {
            let source_line = source_line.trim_end_matches('\n');
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, source_line));

            // Underline
            let start_col = col as usize;
            let span_len = (error.span.end - error.span.start) as usize;
            let end_col = (start_col + span_len).min(source_line.len() + 1);
            let underline = " ".repeat(start_col.saturating_sub(1))
                + &"^".repeat(end_col.saturating_sub(start_col).max(1));
            output.push_str(&format!("   | {}\n", underline));
        }

        // Secondary labels
        for label in &error.labels {
            output.push_str(&format!("   = note: {}\n", label.message));

            let (label_line, label_col) = self.sources.line_col(&label.span);
            let label_path = self.sources.file_path(&label.span);
            output.push_str(&format!(
                "     at {}:{}:{}\n",
                label_path.display(),
                label_line,
                label_col
            ));
        }

        // Notes
        for note in &error.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Formats multiple diagnostics separated by blank lines.
    pub fn format_all(&self, errors: &[YangError]) -> String {
        errors
            .iter()
            .map(|e| self.format(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
