//! Schema compatibility checker: diffs two
//! resolved ASTs and classifies every change as wire-compatible or
//! breaking for one of Bond's two protocol families.

mod classify;
mod decl_diff;
mod enum_diff;
mod service_diff;
mod struct_diff;

pub use classify::classify_type_change;

use bond_ast::{DeclArena, Declaration};

/// How a change affects the two protocol families Bond schemas serve.
/// Wire protocols (Compact/Fast Binary) key fields and enum values by
/// ordinal; text protocols (SimpleJSON/SimpleXML) key by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ChangeCategory {
    Compatible,
    BreakingWire,
    BreakingText,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SchemaChange {
    pub category: ChangeCategory,
    pub description: String,
    /// Qualified name of the declaration (and, where applicable, member)
    /// the change concerns.
    pub location: String,
    pub recommendation: Option<String>,
}

impl SchemaChange {
    pub fn new(category: ChangeCategory, description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
            location: location.into(),
            recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Compare every declaration reachable in `old` against `new`, producing
/// an unordered set of [`SchemaChange`]s. Deterministic given identical
/// inputs, but the result's ordering is not part of the contract --
/// callers sort if they need a stable rendering.
///
/// Declarations are matched across the two arenas by qualified name,
/// independent of which file in either compilation they came
/// from. Synthesized and source-written forward declarations are
/// structural plumbing, not part of a schema's visible surface, and are
/// excluded from the comparison; the struct they name is compared instead.
pub fn check_compatibility(old_arena: &DeclArena, new_arena: &DeclArena) -> Vec<SchemaChange> {
    let diffable = |d: &&Declaration| !matches!(d, Declaration::Forward(_));
    let old: Vec<&Declaration> = old_arena.iter().map(|(_, d)| d).filter(diffable).collect();
    let new: Vec<&Declaration> = new_arena.iter().map(|(_, d)| d).filter(diffable).collect();
    decl_diff::diff_declarations(&old, old_arena, &new, new_arena)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_common::import::NullImportResolver;

    fn arena(src: &str) -> DeclArena {
        let result = bond_sema::analyze(src, None, &NullImportResolver, false, None);
        assert!(result.success(), "{:?}", result.errors);
        result.arena
    }

    fn only(changes: &[SchemaChange], category: ChangeCategory) -> Vec<&SchemaChange> {
        changes.iter().filter(|c| c.category == category).collect()
    }

    #[test]
    fn removed_field_required_is_breaking_wire() {
        let old = arena("namespace ns\nstruct A { 1: required int32 x; }\n");
        let new = arena("namespace ns\nstruct A {}\n");
        let changes = check_compatibility(&old, &new);
        assert_eq!(only(&changes, ChangeCategory::BreakingWire).len(), 1);
    }

    #[test]
    fn removed_field_optional_is_compatible() {
        let old = arena("namespace ns\nstruct A { 1: optional int32 x; }\n");
        let new = arena("namespace ns\nstruct A {}\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.iter().all(|c| c.category == ChangeCategory::Compatible));
    }

    #[test]
    fn renamed_field_is_breaking_text_only() {
        let old = arena("namespace ns\nstruct A { 1: optional int32 x; }\n");
        let new = arena("namespace ns\nstruct A { 1: optional int32 y; }\n");
        let changes = check_compatibility(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].category, ChangeCategory::BreakingText);
    }

    #[test]
    fn widening_int_is_compatible() {
        let old = arena("namespace ns\nstruct A { 1: optional int8 x; }\n");
        let new = arena("namespace ns\nstruct A { 1: optional int32 x; }\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn vector_to_list_is_compatible() {
        let old = arena("namespace ns\nstruct A { 1: optional vector<int32> x; }\n");
        let new = arena("namespace ns\nstruct A { 1: optional list<int32> x; }\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn enum_constant_inserted_midway_without_value_is_breaking() {
        let old = arena("namespace ns\nenum Color { Red, Green, Blue }\n");
        let new = arena("namespace ns\nenum Color { Red, Yellow, Green, Blue }\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::BreakingWire));
    }

    #[test]
    fn enum_constant_appended_is_compatible() {
        let old = arena("namespace ns\nenum Color { Red, Green }\n");
        let new = arena("namespace ns\nenum Color { Red, Green, Blue }\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.iter().all(|c| c.category == ChangeCategory::Compatible));
    }

    #[test]
    fn service_method_removed_is_breaking() {
        let old = arena("namespace ns\nstruct P {}\nservice S { P m(P); }\n");
        let new = arena("namespace ns\nstruct P {}\nservice S {}\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.iter().any(|c| c.category == ChangeCategory::BreakingWire && c.location.ends_with(".m")));
    }

    #[test]
    fn new_declaration_is_compatible() {
        let old = arena("namespace ns\nstruct A {}\n");
        let new = arena("namespace ns\nstruct A {}\nstruct B {}\n");
        let changes = check_compatibility(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].category, ChangeCategory::Compatible);
    }

    #[test]
    fn removed_declaration_is_breaking() {
        let old = arena("namespace ns\nstruct A {}\nstruct B {}\n");
        let new = arena("namespace ns\nstruct A {}\n");
        let changes = check_compatibility(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].category, ChangeCategory::BreakingWire);
    }

    #[test]
    fn required_optional_two_step_migration_is_compatible() {
        let old = arena("namespace ns\nstruct A { 1: required int32 x; }\n");
        let new = arena("namespace ns\nstruct A { 1: required_optional int32 x; }\n");
        let changes = check_compatibility(&old, &new);
        assert!(changes.iter().all(|c| c.category == ChangeCategory::Compatible));
    }
}
