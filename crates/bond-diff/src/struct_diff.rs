//! Struct diff: fields are matched by ordinal, the wire
//! identity, never by name.

use bond_ast::{DeclArena, Field, Modifier, StructDecl};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{classify, ChangeCategory::{BreakingText, BreakingWire, Compatible}, SchemaChange};

pub(crate) fn diff(old: &StructDecl, old_arena: &DeclArena, new: &StructDecl, new_arena: &DeclArena, name: &str) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    let base_changed = match (&old.base, &new.base) {
        (None, None) => false,
        (Some(a), Some(b)) => !classify::structurally_equal(a, old_arena, b, new_arena),
        _ => true,
    };
    if base_changed {
        changes.push(SchemaChange::new(BreakingWire, "inheritance hierarchy changed", name));
    }

    let new_by_ord: FxHashMap<u16, &Field> = new.fields.iter().map(|f| (f.ordinal, f)).collect();
    let mut seen = FxHashSet::default();

    for of in &old.fields {
        let loc = format!("{name}.{}", of.name);
        match new_by_ord.get(&of.ordinal) {
            None => {
                let cat = if of.modifier == Modifier::Required { BreakingWire } else { Compatible };
                changes.push(SchemaChange::new(cat, format!("field `{}` (ordinal {}) removed", of.name, of.ordinal), loc));
            }
            Some(nf) => {
                seen.insert(of.ordinal);
                diff_field(&mut changes, of, nf, old_arena, new_arena, name);
            }
        }
    }

    for nf in &new.fields {
        if !seen.contains(&nf.ordinal) {
            let cat = if nf.modifier == Modifier::Required { BreakingWire } else { Compatible };
            changes.push(SchemaChange::new(cat, format!("field `{}` (ordinal {}) added", nf.name, nf.ordinal), format!("{name}.{}", nf.name)));
        }
    }

    changes
}

fn diff_field(changes: &mut Vec<SchemaChange>, of: &Field, nf: &Field, old_arena: &DeclArena, new_arena: &DeclArena, struct_name: &str) {
    let loc = format!("{struct_name}.{}", of.name);

    if of.name != nf.name {
        changes.push(SchemaChange::new(
            BreakingText,
            format!("field ordinal {} renamed from `{}` to `{}`", of.ordinal, of.name, nf.name),
            loc.clone(),
        ));
    }

    if of.modifier != nf.modifier {
        let direct_flip = matches!(
            (of.modifier, nf.modifier),
            (Modifier::Optional, Modifier::Required) | (Modifier::Required, Modifier::Optional)
        );
        if direct_flip {
            changes.push(SchemaChange::new(BreakingWire, format!("field `{}` modifier changed directly between optional and required", of.name), loc.clone()));
        } else {
            changes.push(
                SchemaChange::new(Compatible, format!("field `{}` modifier changed through required_optional", of.name), loc.clone())
                    .with_recommendation("migrate in two steps through required_optional rather than flipping directly"),
            );
        }
    }

    let (cat, rec) = classify::classify_type_change(&of.ty, old_arena, &nf.ty, new_arena);
    if cat != Compatible {
        let mut c = SchemaChange::new(cat, format!("field `{}` type changed", of.name), loc.clone());
        if let Some(r) = rec {
            c = c.with_recommendation(r);
        }
        changes.push(c);
    }

    if of.default != nf.default {
        changes.push(SchemaChange::new(BreakingWire, format!("field `{}` default value changed", of.name), loc));
    }
}
