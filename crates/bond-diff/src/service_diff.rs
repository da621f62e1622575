//! Service diff: methods matched by name; a signature change of any
//! kind is breaking -- unlike field types, there is no lenient
//! type-change classification path for method input/result types.

use rustc_hash::{FxHashMap, FxHashSet};

use bond_ast::{DeclArena, Method, MethodKind, MethodType, ServiceDecl};

use crate::{classify, ChangeCategory::{BreakingWire, Compatible}, SchemaChange};

fn method_type_equal(a: &MethodType, arena_a: &DeclArena, b: &MethodType, arena_b: &DeclArena) -> bool {
    match (a, b) {
        (MethodType::Void, MethodType::Void) => true,
        (MethodType::Unary(x), MethodType::Unary(y)) => classify::structurally_equal(x, arena_a, y, arena_b),
        (MethodType::Streaming(x), MethodType::Streaming(y)) => classify::structurally_equal(x, arena_a, y, arena_b),
        _ => false,
    }
}

fn method_kind_equal(a: &MethodKind, arena_a: &DeclArena, b: &MethodKind, arena_b: &DeclArena) -> bool {
    match (a, b) {
        (MethodKind::Function { result: r1, input: i1 }, MethodKind::Function { result: r2, input: i2 }) => {
            method_type_equal(r1, arena_a, r2, arena_b) && method_type_equal(i1, arena_a, i2, arena_b)
        }
        (MethodKind::Event { input: i1 }, MethodKind::Event { input: i2 }) => method_type_equal(i1, arena_a, i2, arena_b),
        _ => false,
    }
}

pub(crate) fn diff(old: &ServiceDecl, old_arena: &DeclArena, new: &ServiceDecl, new_arena: &DeclArena, name: &str) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    let base_changed = match (&old.base, &new.base) {
        (None, None) => false,
        (Some(a), Some(b)) => !classify::structurally_equal(a, old_arena, b, new_arena),
        _ => true,
    };
    if base_changed {
        changes.push(SchemaChange::new(BreakingWire, "service base type changed", name));
    }

    let new_by_name: FxHashMap<&str, &Method> = new.methods.iter().map(|m| (m.name.as_str(), m)).collect();
    let mut seen = FxHashSet::default();

    for om in &old.methods {
        let loc = format!("{name}.{}", om.name);
        match new_by_name.get(om.name.as_str()) {
            None => changes.push(SchemaChange::new(BreakingWire, format!("method `{}` removed", om.name), loc)),
            Some(nm) => {
                seen.insert(om.name.as_str());
                if !method_kind_equal(&om.kind, old_arena, &nm.kind, new_arena) {
                    changes.push(SchemaChange::new(BreakingWire, format!("method `{}` signature changed", om.name), loc));
                }
            }
        }
    }

    for nm in &new.methods {
        if !seen.contains(nm.name.as_str()) {
            changes.push(SchemaChange::new(Compatible, format!("method `{}` added", nm.name), format!("{name}.{}", nm.name)));
        }
    }

    changes
}
