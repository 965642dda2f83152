//! Identity base binding.

use tracing::trace;
use yangkit_ast::{Diagnostics, Module, ResolvedRef};

use super::{NameKind, lookup};

/// Binds every `base` reference in the unit.
///
/// Same snapshot scheme as feature binding. A base bound inside the
/// unit additionally gains the reverse edge: the base identity records
/// the deriving identity in its `children` list, which is what answers
/// "all identities derived from X" queries later. Imported bases stay
/// one-directional; the frozen module is not writable.
pub(super) fn bind_identities(members: &mut [Module], diags: &mut Diagnostics) {
    let mut bound: Vec<(usize, usize, ResolvedRef)> = Vec::new();
    let mut used: Vec<(usize, usize)> = Vec::new();

    for (m, member) in members.iter().enumerate() {
        for (i, identity) in member.identities.iter().enumerate() {
            let Some(reference) = &identity.base else {
                continue;
            };
            let (binding, import) = lookup(members, m, reference, NameKind::Identity, diags);
            if let Some(slot) = import {
                used.push((m, slot));
            }
            if let Some(binding) = binding {
                trace!(identity = %identity.name, base = %reference, "bound identity base");
                bound.push((m, i, binding));
            }
        }
    }

    for (m, i, binding) in bound {
        if let ResolvedRef::Unit { member, index } = &binding {
            members[*member].identities[*index].children.push((m, i));
        }
        members[m].identities[i].resolved_base = Some(binding);
    }
    for (m, slot) in used {
        members[m].imports[slot].used = true;
    }
}
