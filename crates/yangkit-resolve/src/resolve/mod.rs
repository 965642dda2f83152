//! Reference resolution within one load unit.
//!
//! A load unit is a module together with every submodule it includes,
//! directly or transitively. Resolution runs once per unit, after all
//! members have parsed and all imports have loaded:
//!
//! 1. Bind `if-feature` references on feature definitions
//! 2. Bind `base` references on identity definitions and record the
//!    derivation edges on the base
//! 3. Detect reference loops among features, then among identities
//! 4. Flag imports whose prefix is never referenced
//!
//! Binding never follows references transitively. A reference into an
//! imported module resolves against that module's definitions as
//! frozen at its own load time; only unit-internal references take part
//! in loop detection, since frozen imports cannot point back into a
//! unit that did not exist when they resolved.

mod features;
mod identities;

use tracing::debug;
use yangkit_ast::{
    CycleMark, Diagnostics, ErrorKind, Module, ResolvedRef, Span, SymbolRef, YangError,
};

use features::bind_features;
use identities::bind_identities;

/// Namespace selector for name lookup and loop detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameKind {
    Feature,
    Identity,
}

impl NameKind {
    fn describe(self) -> &'static str {
        match self {
            NameKind::Feature => "feature",
            NameKind::Identity => "identity",
        }
    }

    fn find(self, module: &Module, name: &str) -> Option<usize> {
        match self {
            NameKind::Feature => module.find_feature(name),
            NameKind::Identity => module.find_identity(name),
        }
    }

    fn count(self, module: &Module) -> usize {
        match self {
            NameKind::Feature => module.features.len(),
            NameKind::Identity => module.identities.len(),
        }
    }

    fn mark(self, module: &Module, index: usize) -> CycleMark {
        match self {
            NameKind::Feature => module.features[index].mark,
            NameKind::Identity => module.identities[index].mark,
        }
    }

    fn set_mark(self, module: &mut Module, index: usize, mark: CycleMark) {
        match self {
            NameKind::Feature => module.features[index].mark = mark,
            NameKind::Identity => module.identities[index].mark = mark,
        }
    }

    fn name(self, module: &Module, index: usize) -> &str {
        match self {
            NameKind::Feature => &module.features[index].name,
            NameKind::Identity => &module.identities[index].name,
        }
    }

    fn span(self, module: &Module, index: usize) -> Span {
        match self {
            NameKind::Feature => module.features[index].span,
            NameKind::Identity => module.identities[index].span,
        }
    }

    /// The `edge`-th unit-internal reference leaving a definition.
    ///
    /// Imported references are skipped; they are terminal for loop
    /// detection. Features fan out over their bound `if-feature` list,
    /// identities have at most the one `base` edge.
    fn nth_unit_edge(self, module: &Module, index: usize, edge: usize) -> Option<(usize, usize)> {
        match self {
            NameKind::Feature => module.features[index]
                .resolved
                .iter()
                .filter_map(|r| match r {
                    ResolvedRef::Unit { member, index } => Some((*member, *index)),
                    ResolvedRef::Imported { .. } => None,
                })
                .nth(edge),
            NameKind::Identity => match (edge, &module.identities[index].resolved_base) {
                (0, Some(ResolvedRef::Unit { member, index })) => Some((*member, *index)),
                _ => None,
            },
        }
    }
}

/// Resolves all references in one unit and flags unused imports.
///
/// `members[0]` is the module; the rest are its submodules in
/// completion order. Diagnostics carry the definition site of the
/// failing reference or loop.
pub fn resolve_unit(members: &mut [Module], diags: &mut Diagnostics) {
    debug!(
        unit = %members[0].name,
        members = members.len(),
        "resolving unit references"
    );
    bind_features(members, diags);
    bind_identities(members, diags);
    check_loops(members, NameKind::Feature, diags);
    check_loops(members, NameKind::Identity, diags);
    check_imports_used(members, diags);
}

/// Resolves one symbol reference from a member of the unit.
///
/// Returns the binding, if any, and the index of the import record in
/// the origin member that the reference went through. The import index
/// comes back even when the name was missing on the far side, so the
/// caller can still mark the import as used.
pub(crate) fn lookup(
    members: &[Module],
    origin: usize,
    reference: &SymbolRef,
    kind: NameKind,
    diags: &mut Diagnostics,
) -> (Option<ResolvedRef>, Option<usize>) {
    let unit_prefix = members[0].effective_prefix();
    let own_prefix = members[origin].effective_prefix();

    // The unit's own prefix is legal in references to local names.
    let foreign = match reference.prefix.as_deref() {
        None => None,
        Some(p) if Some(p) == own_prefix || Some(p) == unit_prefix => None,
        Some(p) => Some(p),
    };

    let Some(prefix) = foreign else {
        // Member order puts the module first, so a module definition
        // shadows a same-named submodule definition.
        for (member, candidate) in members.iter().enumerate() {
            if let Some(index) = kind.find(candidate, &reference.name) {
                return (Some(ResolvedRef::Unit { member, index }), None);
            }
        }
        diags.push(YangError::new(
            ErrorKind::UndefinedName,
            reference.span,
            format!("undefined {} '{}'", kind.describe(), reference.name),
        ));
        return (None, None);
    };

    let Some(slot) = members[origin].find_import_by_prefix(prefix) else {
        diags.push(YangError::new(
            ErrorKind::UndefinedName,
            reference.span,
            format!("undefined prefix '{}' in reference '{}'", prefix, reference),
        ));
        return (None, None);
    };

    let import = &members[origin].imports[slot];
    let Some(target) = &import.resolved else {
        // The import failed to load and that failure is already on
        // record; a second error here would only repeat it.
        return (None, Some(slot));
    };

    match kind.find(target, &reference.name) {
        Some(index) => (
            Some(ResolvedRef::Imported {
                module: target.name.clone(),
                revision: target.version.clone(),
                index,
            }),
            Some(slot),
        ),
        None => {
            diags.push(YangError::new(
                ErrorKind::UndefinedName,
                reference.span,
                format!(
                    "module '{}' has no {} named '{}'",
                    target.name,
                    kind.describe(),
                    reference.name
                ),
            ));
            (None, Some(slot))
        }
    }
}

/// Finds reference loops among the unit's definitions of one kind.
///
/// Depth-first search over the bound unit-internal edges, with the
/// marks stored on the definitions themselves. Each loop is reported
/// exactly once, at the definition where the walk re-entered it, and
/// every definition on the loop ends up marked [`CycleMark::OnCycle`].
fn check_loops(members: &mut [Module], kind: NameKind, diags: &mut Diagnostics) {
    for m in 0..members.len() {
        for i in 0..kind.count(&members[m]) {
            if kind.mark(&members[m], i) == CycleMark::Unvisited {
                walk_from(members, kind, (m, i), diags);
            }
        }
    }
}

/// One DFS pass rooted at an unvisited definition.
///
/// The stack holds `(node, next_edge)` pairs; recursion is unrolled so
/// deep if-feature chains cannot overflow the call stack.
fn walk_from(
    members: &mut [Module],
    kind: NameKind,
    root: (usize, usize),
    diags: &mut Diagnostics,
) {
    let mut stack: Vec<((usize, usize), usize)> = Vec::new();
    kind.set_mark(&mut members[root.0], root.1, CycleMark::InProgress);
    stack.push((root, 0));

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;
        let edge = frame.1;
        frame.1 += 1;

        match kind.nth_unit_edge(&members[node.0], node.1, edge) {
            Some(target) => match kind.mark(&members[target.0], target.1) {
                CycleMark::Unvisited => {
                    kind.set_mark(&mut members[target.0], target.1, CycleMark::InProgress);
                    stack.push((target, 0));
                }
                CycleMark::InProgress => {
                    // Back edge into the active path closes a loop.
                    report_loop(members, kind, &stack, target, diags);
                }
                CycleMark::Done | CycleMark::OnCycle => {}
            },
            None => {
                stack.pop();
                // Loop members keep OnCycle through the pop.
                if kind.mark(&members[node.0], node.1) == CycleMark::InProgress {
                    kind.set_mark(&mut members[node.0], node.1, CycleMark::Done);
                }
            }
        }
    }
}

fn report_loop(
    members: &mut [Module],
    kind: NameKind,
    stack: &[((usize, usize), usize)],
    target: (usize, usize),
    diags: &mut Diagnostics,
) {
    let start = stack
        .iter()
        .position(|(node, _)| *node == target)
        .unwrap_or(0);
    let cycle: Vec<(usize, usize)> = stack[start..].iter().map(|(node, _)| *node).collect();

    let names: Vec<String> = cycle
        .iter()
        .map(|&(m, i)| kind.name(&members[m], i).to_string())
        .collect();
    diags.push(
        YangError::new(
            ErrorKind::DefinitionLoop,
            kind.span(&members[target.0], target.1),
            format!(
                "{} '{}' depends on itself: {} → {}",
                kind.describe(),
                names[0],
                names.join(" → "),
                names[0]
            ),
        )
        .with_note(format!(
            "every {} on this chain is unusable until the loop is broken",
            kind.describe()
        )),
    );

    for (m, i) in cycle {
        kind.set_mark(&mut members[m], i, CycleMark::OnCycle);
    }
}

/// Warns about imports whose prefix never appears in the member.
///
/// Binding marks the imports it goes through; the remaining candidates
/// are checked against a conservative prefix scan over the captured
/// statement bodies, so a prefix used only inside an unresolved body
/// still counts as a use.
fn check_imports_used(members: &mut [Module], diags: &mut Diagnostics) {
    for member in members.iter_mut() {
        if member.imports.iter().all(|import| import.used) {
            continue;
        }

        let mut prefixes: Vec<String> = Vec::new();
        for stmt in member
            .typedefs
            .iter()
            .chain(&member.groupings)
            .chain(&member.extensions)
            .chain(&member.data_defs)
            .chain(&member.extension_uses)
        {
            stmt.collect_prefixes(&mut prefixes);
        }
        for feature in &member.features {
            for stmt in &feature.substmts {
                stmt.collect_prefixes(&mut prefixes);
            }
        }
        for identity in &member.identities {
            for stmt in &identity.substmts {
                stmt.collect_prefixes(&mut prefixes);
            }
        }

        for import in &mut member.imports {
            if import.used {
                continue;
            }
            if prefixes.iter().any(|p| *p == import.prefix) {
                import.used = true;
                continue;
            }
            diags.push(YangError::warning(
                ErrorKind::UnusedImport,
                import.span,
                format!("imported module '{}' is never referenced", import.module),
            ));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{feature, identity, module};
    use super::*;
    use yangkit_ast::LoadStatus;

    fn marks(module: &Module, kind: NameKind) -> Vec<CycleMark> {
        (0..kind.count(module)).map(|i| kind.mark(module, i)).collect()
    }

    #[test]
    fn test_acyclic_chain_is_clean() {
        let mut unit = module("test", "t");
        unit.features.push(feature("a", &["b"]));
        unit.features.push(feature("b", &["c"]));
        unit.features.push(feature("c", &[]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert!(diags.is_empty());
        assert_eq!(
            marks(&members[0], NameKind::Feature),
            vec![CycleMark::Done; 3]
        );
    }

    #[test]
    fn test_self_reference_reports_once() {
        let mut unit = module("test", "t");
        unit.features.push(feature("loop", &["loop"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        let error = diags.iter().next().unwrap();
        assert_eq!(error.kind, ErrorKind::DefinitionLoop);
        assert!(error.message.contains("loop → loop"));
        assert_eq!(members[0].features[0].mark, CycleMark::OnCycle);
    }

    #[test]
    fn test_prefixed_self_reference_is_still_local() {
        let mut unit = module("test", "t");
        unit.features.push(feature("loop", &["t:loop"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        assert_eq!(members[0].features[0].mark, CycleMark::OnCycle);
    }

    #[test]
    fn test_three_feature_loop_marks_all_members() {
        let mut unit = module("test", "t");
        unit.features.push(feature("a", &["b"]));
        unit.features.push(feature("b", &["c"]));
        unit.features.push(feature("c", &["a"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        // One report for the whole loop, all three marked.
        assert_eq!(diags.error_count(), 1);
        assert_eq!(
            marks(&members[0], NameKind::Feature),
            vec![CycleMark::OnCycle; 3]
        );
        let error = diags.iter().next().unwrap();
        assert!(error.message.contains("a → b → c → a"));
    }

    #[test]
    fn test_diamond_is_not_a_loop() {
        let mut unit = module("test", "t");
        unit.features.push(feature("top", &["left", "right"]));
        unit.features.push(feature("left", &["bottom"]));
        unit.features.push(feature("right", &["bottom"]));
        unit.features.push(feature("bottom", &[]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert!(diags.is_empty());
        assert_eq!(
            marks(&members[0], NameKind::Feature),
            vec![CycleMark::Done; 4]
        );
    }

    #[test]
    fn test_branch_into_loop_keeps_clean_nodes_clean() {
        let mut unit = module("test", "t");
        unit.features.push(feature("entry", &["a"]));
        unit.features.push(feature("a", &["b"]));
        unit.features.push(feature("b", &["a"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        let marks = marks(&members[0], NameKind::Feature);
        assert_eq!(marks[0], CycleMark::Done);
        assert_eq!(marks[1], CycleMark::OnCycle);
        assert_eq!(marks[2], CycleMark::OnCycle);
    }

    #[test]
    fn test_identity_base_loop() {
        let mut unit = module("test", "t");
        unit.identities.push(identity("a", Some("b")));
        unit.identities.push(identity("b", Some("a")));
        unit.identities.push(identity("root", None));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        let marks = marks(&members[0], NameKind::Identity);
        assert_eq!(marks[0], CycleMark::OnCycle);
        assert_eq!(marks[1], CycleMark::OnCycle);
        assert_eq!(marks[2], CycleMark::Done);
    }

    #[test]
    fn test_undefined_reference() {
        let mut unit = module("test", "t");
        unit.features.push(feature("a", &["ghost"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        let error = diags.iter().next().unwrap();
        assert_eq!(error.kind, ErrorKind::UndefinedName);
        assert!(error.message.contains("ghost"));
        // The unbound reference leaves no edge, so no loop either.
        assert_eq!(members[0].features[0].mark, CycleMark::Done);
    }

    #[test]
    fn test_undefined_prefix() {
        let mut unit = module("test", "t");
        unit.features.push(feature("a", &["nowhere:thing"]));
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.error_count(), 1);
        let error = diags.iter().next().unwrap();
        assert_eq!(error.kind, ErrorKind::UndefinedName);
        assert!(error.message.contains("'nowhere'"));
    }

    #[test]
    fn test_unused_import_warning() {
        let mut unit = module("test", "t");
        unit.imports.push(yangkit_ast::Import {
            module: "ietf-inet-types".to_string(),
            prefix: "inet".to_string(),
            revision: None,
            description: None,
            reference: None,
            resolved: None,
            status: LoadStatus::Ok,
            used: false,
            span: Span::zero(0),
        });
        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert_eq!(diags.warning_count(), 1);
        let warning = diags.iter().next().unwrap();
        assert_eq!(warning.kind, ErrorKind::UnusedImport);
        assert!(warning.message.contains("ietf-inet-types"));
    }

    #[test]
    fn test_import_prefix_in_body_counts_as_use() {
        let mut unit = module("test", "t");
        unit.imports.push(yangkit_ast::Import {
            module: "ietf-inet-types".to_string(),
            prefix: "inet".to_string(),
            revision: None,
            description: None,
            reference: None,
            resolved: None,
            status: LoadStatus::Ok,
            used: false,
            span: Span::zero(0),
        });
        let mut leaf = yangkit_ast::Statement {
            prefix: None,
            keyword: "leaf".to_string(),
            arg: Some("address".to_string()),
            substmts: Vec::new(),
            span: Span::zero(0),
        };
        leaf.substmts.push(yangkit_ast::Statement {
            prefix: None,
            keyword: "type".to_string(),
            arg: Some("inet:ipv4-address".to_string()),
            substmts: Vec::new(),
            span: Span::zero(0),
        });
        let mut container = yangkit_ast::Statement {
            prefix: None,
            keyword: "container".to_string(),
            arg: Some("host".to_string()),
            substmts: Vec::new(),
            span: Span::zero(0),
        };
        container.substmts.push(leaf);
        unit.data_defs.push(container);

        let mut members = vec![unit];
        let mut diags = Diagnostics::default();

        resolve_unit(&mut members, &mut diags);

        assert!(diags.is_empty());
        assert!(members[0].imports[0].used);
    }
}
