//! Feature reference binding.

use tracing::trace;
use yangkit_ast::{Diagnostics, Module, ResolvedRef};

use super::{NameKind, lookup};

/// Binds every `if-feature` reference in the unit.
///
/// Lookup runs over an immutable view of the members and the bindings
/// are written back afterwards, so a reference in one member can land
/// on a definition in any other member of the same unit. Unresolvable
/// references are reported and simply left out of the bound list; loop
/// detection then never sees them.
pub(super) fn bind_features(members: &mut [Module], diags: &mut Diagnostics) {
    let mut bound: Vec<(usize, usize, Vec<ResolvedRef>)> = Vec::new();
    let mut used: Vec<(usize, usize)> = Vec::new();

    for (m, member) in members.iter().enumerate() {
        for (f, feature) in member.features.iter().enumerate() {
            if feature.if_features.is_empty() {
                continue;
            }
            let mut resolved = Vec::new();
            for reference in &feature.if_features {
                let (binding, import) = lookup(members, m, reference, NameKind::Feature, diags);
                if let Some(slot) = import {
                    used.push((m, slot));
                }
                if let Some(binding) = binding {
                    resolved.push(binding);
                }
            }
            trace!(
                feature = %feature.name,
                bound = resolved.len(),
                of = feature.if_features.len(),
                "bound if-feature references"
            );
            bound.push((m, f, resolved));
        }
    }

    for (m, f, resolved) in bound {
        members[m].features[f].resolved = resolved;
    }
    for (m, slot) in used {
        members[m].imports[slot].used = true;
    }
}
