//! Declaration-level diff: declarations are matched across
//! the two compilations by qualified name, then delegated to a
//! kind-specific diff once both sides agree on kind.

use rustc_hash::{FxHashMap, FxHashSet};

use bond_ast::{DeclArena, Declaration};

use crate::{classify, enum_diff, service_diff, struct_diff, ChangeCategory, SchemaChange};

pub(crate) fn diff_declarations(
    old: &[&Declaration],
    old_arena: &DeclArena,
    new: &[&Declaration],
    new_arena: &DeclArena,
) -> Vec<SchemaChange> {
    let mut changes = Vec::new();
    let new_by_name: FxHashMap<String, &Declaration> = new.iter().map(|d| (d.qualified_name(), **d)).collect();
    let mut seen_new = FxHashSet::default();

    for old_decl in old {
        let name = old_decl.qualified_name();
        match new_by_name.get(&name) {
            None => changes.push(SchemaChange::new(ChangeCategory::BreakingWire, format!("declaration `{name}` was removed"), name.clone())),
            Some(new_decl) => {
                seen_new.insert(name.clone());
                if old_decl.kind_name() != new_decl.kind_name() {
                    changes.push(SchemaChange::new(
                        ChangeCategory::BreakingWire,
                        format!("declaration `{name}` changed kind from {} to {}", old_decl.kind_name(), new_decl.kind_name()),
                        name.clone(),
                    ));
                    continue;
                }
                match (*old_decl, *new_decl) {
                    (Declaration::Struct(o), Declaration::Struct(n)) => {
                        changes.extend(struct_diff::diff(o, old_arena, n, new_arena, &name))
                    }
                    (Declaration::Enum(o), Declaration::Enum(n)) => changes.extend(enum_diff::diff(o, n, &name)),
                    (Declaration::Service(o), Declaration::Service(n)) => {
                        changes.extend(service_diff::diff(o, old_arena, n, new_arena, &name))
                    }
                    (Declaration::Alias(o), Declaration::Alias(n)) => {
                        let (cat, rec) = classify::classify_type_change(&o.target, old_arena, &n.target, new_arena);
                        if cat != ChangeCategory::Compatible {
                            let mut c = SchemaChange::new(cat, format!("alias `{name}` target type changed"), name.clone());
                            if let Some(r) = rec {
                                c = c.with_recommendation(r);
                            }
                            changes.push(c);
                        }
                    }
                    _ => unreachable!("kind_name already matched above"),
                }
            }
        }
    }

    for new_decl in new {
        let name = new_decl.qualified_name();
        if !seen_new.contains(&name) {
            changes.push(SchemaChange::new(ChangeCategory::Compatible, format!("declaration `{name}` was added"), name));
        }
    }

    changes
}
