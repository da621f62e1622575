//! Enum diff: constants are matched by name; the wire value
//! that matters is each constant's *effective* value, explicit or implicit.

use rustc_hash::{FxHashMap, FxHashSet};

use bond_ast::{EnumConstant, EnumDecl};

use crate::{ChangeCategory::{BreakingWire, Compatible}, SchemaChange};

pub(crate) fn diff(old: &EnumDecl, new: &EnumDecl, name: &str) -> Vec<SchemaChange> {
    let mut changes = Vec::new();
    let new_by_name: FxHashMap<&str, &EnumConstant> = new.constants.iter().map(|c| (c.name.as_str(), c)).collect();
    let mut seen = FxHashSet::default();
    let old_len = old.constants.len();

    for oc in &old.constants {
        let loc = format!("{name}.{}", oc.name);
        match new_by_name.get(oc.name.as_str()) {
            None => changes.push(SchemaChange::new(BreakingWire, format!("enum constant `{}` removed", oc.name), loc)),
            Some(nc) => {
                seen.insert(oc.name.as_str());
                if oc.effective_value != nc.effective_value {
                    changes.push(SchemaChange::new(
                        BreakingWire,
                        format!("enum constant `{}` effective value changed from {} to {}", oc.name, oc.effective_value, nc.effective_value),
                        loc,
                    ));
                }
            }
        }
    }

    for (i, nc) in new.constants.iter().enumerate() {
        if seen.contains(nc.name.as_str()) {
            continue;
        }
        let shifts_existing_values = i < old_len && nc.explicit_value.is_none();
        let cat = if shifts_existing_values { BreakingWire } else { Compatible };
        changes.push(SchemaChange::new(cat, format!("enum constant `{}` added", nc.name), format!("{name}.{}", nc.name)));
    }

    changes
}
