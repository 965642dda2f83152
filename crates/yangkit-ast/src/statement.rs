//! Generic captured statement tree.
//!
//! Body statements the engine stores but does not interpret (typedefs,
//! groupings, data definitions, extension uses) are kept as raw statement
//! trees. Downstream compilers re-walk these with full semantics; this
//! engine only needs the shape and the prefixes they reference.

use crate::foundation::Span;

/// One captured statement: `[prefix:]keyword [argument] (";" | "{" ... "}")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Extension prefix, for statements written as `prefix:keyword`
    pub prefix: Option<String>,
    /// Statement keyword without the prefix
    pub keyword: String,
    /// Argument string, unescaped and concatenated
    pub arg: Option<String>,
    /// Nested substatements in declaration order
    pub substmts: Vec<Statement>,
    /// Span covering the keyword and argument
    pub span: Span,
}

impl Statement {
    /// Creates a leaf statement with no substatements.
    pub fn new(prefix: Option<String>, keyword: String, arg: Option<String>, span: Span) -> Self {
        Self {
            prefix,
            keyword,
            arg,
            substmts: Vec::new(),
            span,
        }
    }

    /// Finds the first direct substatement with the given keyword.
    pub fn find(&self, keyword: &str) -> Option<&Statement> {
        self.substmts
            .iter()
            .find(|s| s.prefix.is_none() && s.keyword == keyword)
    }

    /// Visits this statement and every nested substatement, depth first.
    pub fn walk(&self, visit: &mut impl FnMut(&Statement)) {
        visit(self);
        for sub in &self.substmts {
            sub.walk(visit);
        }
    }

    /// Collects the extension prefixes and `prefix:name` argument prefixes
    /// used anywhere in this tree.
    ///
    /// This is deliberately conservative: any `p:` shape in an argument
    /// counts as a use of prefix `p`. The unused-import check accepts
    /// false positives (an import stays "used") over false negatives.
    pub fn collect_prefixes(&self, out: &mut Vec<String>) {
        self.walk(&mut |stmt| {
            if let Some(prefix) = &stmt.prefix {
                out.push(prefix.clone());
            }
            if let Some(arg) = &stmt.arg {
                collect_arg_prefixes(arg, out);
            }
        });
    }
}

/// Scans an argument string for `prefix:name` shapes.
///
/// A prefix is a YANG identifier immediately followed by a colon that is
/// itself followed by an identifier character. This skips URLs
/// ("http://...") because '/' is not an identifier character.
fn collect_arg_prefixes(arg: &str, out: &mut Vec<String>) {
    let bytes = arg.as_bytes();
    let mut start = None;

    for (i, &b) in bytes.iter().enumerate() {
        let is_ident = b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.';
        match (start, is_ident) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                if b == b':'
                    && i + 1 < bytes.len()
                    && (bytes[i + 1].is_ascii_alphanumeric() || bytes[i + 1] == b'_')
                {
                    out.push(arg[s..i].to_string());
                }
                start = None;
            }
            _ => {}
        }
    }
}
