//! Source location tracking for diagnostics.
//!
//! Every diagnostic the engine emits points back into a module file. The
//! types here keep that cheap: a `Span` is a compact byte range tagged with
//! a file id, and the `SourceMap` owns the file table that turns offsets
//! into line/column pairs and source snippets.
//!
//! The source map is owned by the loader and lives for the whole process,
//! so file ids stay stable across loads and a diagnostic collected during
//! one load can still be formatted later.
//!
//! # Examples
//!
//! ```
//! # use yangkit_ast::foundation::span::*;
//! # use std::path::PathBuf;
//! let mut map = SourceMap::new();
//! let file_id = map.add_file(
//!     PathBuf::from("example.yang"),
//!     "module example {\n  namespace \"urn:example\";\n}\n".to_string(),
//! );
//! let span = Span::new(file_id, 7, 14, 1);
//!
//! assert_eq!(map.snippet(&span), "example");
//! assert_eq!(map.line_col(&span), (1, 8));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Compact source location reference.
///
/// Points to a byte range in a source file with a cached line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Index into SourceMap.files
    pub file_id: u16,
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
    /// Cached line number (1-based) for the start position.
    ///
    /// Zero when the producer did not compute it; the source map is the
    /// authority either way.
    pub start_line: u16,
}

/// Collection of all source files seen by a loader.
///
/// Provides lookup operations for converting spans into human-readable
/// locations and snippets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// A single source file with line indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute or relative path to this file
    pub path: PathBuf,
    /// Original source text
    pub source: String,
    /// Byte offsets of each line start
    ///
    /// line_starts[0] is always 0. The final entry is an EOF sentinel, so
    /// line_starts.len() == number of lines + 1.
    pub line_starts: Vec<u32>,
}

impl Span {
    /// Create a new span.
    pub fn new(file_id: u16, start: u32, end: u32, start_line: u16) -> Self {
        Self {
            file_id,
            start,
            end,
            start_line,
        }
    }

    /// Create a zero-length span at the start of a file.
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0, 1)
    }

    /// Check if this span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the length of this span in bytes.
    ///
    /// # Panics
    /// Panics if end < start (malformed span).
    pub fn len(&self) -> u32 {
        assert!(
            self.end >= self.start,
            "malformed span: end ({}) < start ({})",
            self.end,
            self.start
        );
        self.end - self.start
    }

    /// Merge two spans (returns a span covering both).
    ///
    /// Panics if the spans are from different files.
    pub fn merge(&self, other: &Span) -> Span {
        assert_eq!(
            self.file_id, other.file_id,
            "cannot merge spans from different files"
        );
        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            start_line: self.start_line.min(other.start_line),
        }
    }
}

impl SourceMap {
    /// Create an empty source map.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a source file and return its ID.
    ///
    /// The line index is computed up front.
    pub fn add_file(&mut self, path: PathBuf, source: String) -> u16 {
        let file_id = self.files.len();
        assert!(file_id < u16::MAX as usize, "too many source files");

        self.files.push(SourceFile::new(path, source));
        file_id as u16
    }

    /// Get the source file for a span.
    pub fn file(&self, span: &Span) -> &SourceFile {
        &self.files[span.file_id as usize]
    }

    /// Get the file path for a span.
    pub fn file_path(&self, span: &Span) -> &Path {
        &self.files[span.file_id as usize].path
    }

    /// Get the source snippet for a span.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = &self.files[span.file_id as usize];
        &file.source[span.start as usize..span.end as usize]
    }

    /// Get the (line, column) position for a span's start.
    ///
    /// Both line and column are 1-based.
    pub fn line_col(&self, span: &Span) -> (u32, u32) {
        let file = &self.files[span.file_id as usize];
        file.line_col(span.start)
    }

    /// Get the number of files in this map.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceFile {
    /// Create a new source file with a precomputed line index.
    pub fn new(path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            path,
            source,
            line_starts,
        }
    }

    /// Get (line, column) for a byte offset.
    ///
    /// Both line and column are 1-based.
    ///
    /// # Panics
    /// Panics if the offset is beyond EOF.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        assert!(
            offset <= self.source.len() as u32,
            "offset {} is beyond EOF (len = {})",
            offset,
            self.source.len()
        );

        // Binary search to find the line
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,             // Exact match (start of line)
            Err(idx) => idx.max(1) - 1, // Falls within line idx-1
        };

        let line = (line_idx + 1) as u32;
        let col = (offset - self.line_starts[line_idx]) + 1;

        (line, col)
    }

    /// Get the byte range for a given line number (1-based).
    ///
    /// Returns None if the line number is out of bounds.
    pub fn line_range(&self, line: u32) -> Option<(u32, u32)> {
        // Valid lines are 1..=(line_starts.len() - 1); the last entry is
        // the EOF sentinel.
        if line == 0 || line as usize >= self.line_starts.len() {
            return None;
        }

        let line_idx = (line - 1) as usize;
        let start = self.line_starts[line_idx];
        let end = self.line_starts[line_idx + 1];

        Some((start, end))
    }

    /// Get the text of a specific line (1-based).
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let (start, end) = self.line_range(line)?;
        Some(&self.source[start as usize..end as usize])
    }

    /// Get the number of lines in this file.
    pub fn line_count(&self) -> usize {
        assert!(
            !self.line_starts.is_empty(),
            "line_starts invariant violated: empty array"
        );
        self.line_starts.len() - 1
    }
}

/// Compute byte offsets of line starts in source text.
///
/// Returns a Vec where line_starts[i] is the start of line i+1 and the
/// final entry is the EOF offset (sentinel for the last line's end).
fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut line_starts = vec![0];

    for (idx, ch) in source.char_indices() {
        if ch == '\n' {
            line_starts.push((idx + 1) as u32);
        }
    }

    if line_starts.last() != Some(&(source.len() as u32)) {
        line_starts.push(source.len() as u32);
    }

    line_starts
}
